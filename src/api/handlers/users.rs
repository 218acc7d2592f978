//! User handlers: register, list, get.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use validator::Validate;

use crate::api::dto::{CreateUserRequest, ListParams, UserDto};
use crate::app_state::AppState;
use crate::domain::UserId;
use crate::error::{CourierError, ErrorResponse};

/// `POST /users` — Register a new user.
///
/// # Errors
///
/// Returns [`CourierError`] on a malformed or already-registered email.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    summary = "Register a new user",
    description = "Creates a user with a unique email address. The server assigns the ID and registration timestamp.",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserDto),
        (status = 400, description = "Invalid or already-registered email", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, CourierError> {
    req.validate()
        .map_err(|e| CourierError::InvalidRequest(e.to_string()))?;

    let user = state.directory.register(&req.email, &req.name).await?;

    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

/// `GET /users` — List users with offset pagination.
///
/// # Errors
///
/// Returns [`CourierError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    summary = "List users",
    description = "Returns registered users in registration order. Supports skip/limit pagination.",
    params(ListParams),
    responses(
        (status = 200, description = "User list", body = Vec<UserDto>),
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, CourierError> {
    let params = params.clamped();
    let users = state.directory.list(params.skip, params.limit).await?;
    let data: Vec<UserDto> = users.into_iter().map(UserDto::from).collect();
    Ok(Json(data))
}

/// `GET /users/:user_id` — Get a single user.
///
/// # Errors
///
/// Returns [`CourierError::UserNotFound`] if the user does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    summary = "Get user details",
    params(
        ("user_id" = uuid::Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 200, description = "User details", body = UserDto),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CourierError> {
    let user = state.directory.get(UserId::from_uuid(user_id)).await?;
    Ok(Json(UserDto::from(user)))
}

/// User management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{user_id}", get(get_user))
}
