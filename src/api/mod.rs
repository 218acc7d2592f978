//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All resource endpoints are mounted under `/api/v1`; system endpoints
//! (health) live at the root.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document covering every endpoint the service exposes.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(
        handlers::users::create_user,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::messages::send_message,
        handlers::messages::get_message,
        handlers::messages::mark_read,
        handlers::messages::message_recipients,
        handlers::messages::sent_messages,
        handlers::messages::inbox,
        handlers::messages::inbox_unread,
        handlers::system::health_handler,
    ),
    tags(
        (name = "Users", description = "User registration and lookup"),
        (name = "Messages", description = "Sending and reading messages"),
        (name = "Mailboxes", description = "Per-user sent and inbox views"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// Swagger UI serving `/docs` backed by `/api-docs/openapi.json`.
#[cfg(feature = "swagger-ui")]
#[must_use]
pub fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    utoipa_swagger_ui::SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
