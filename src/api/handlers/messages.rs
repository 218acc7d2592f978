//! Message handlers: send, read, receipts, and per-user mailboxes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use validator::Validate;

use crate::api::dto::{
    DeliveryStatusDto, InboxItemDto, MessageDto, ReceiptDto, SendMessageRequest,
};
use crate::app_state::AppState;
use crate::domain::{MessageId, ReceiptId, UserId};
use crate::error::{CourierError, ErrorResponse};

/// `POST /messages` — Send a message to one or more recipients.
///
/// # Errors
///
/// Returns [`CourierError`] when the sender or any recipient is unknown,
/// or when the recipient list is empty.
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    tag = "Messages",
    summary = "Send a message",
    description = "Stores a message and one delivery receipt per recipient. The send is atomic: an unknown recipient aborts the whole operation.",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = MessageDto),
        (status = 400, description = "Empty recipient list or invalid body", body = ErrorResponse),
        (status = 404, description = "Sender or recipient not found", body = ErrorResponse),
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, CourierError> {
    req.validate()
        .map_err(|e| CourierError::InvalidRequest(e.to_string()))?;

    let message = state
        .mailbox
        .send(
            req.sender_id,
            &req.recipient_ids,
            req.subject.as_deref(),
            &req.content,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(MessageDto::from(message))))
}

/// `GET /messages/:message_id` — Get a single message.
///
/// # Errors
///
/// Returns [`CourierError::MessageNotFound`] if the message does not
/// exist.
#[utoipa::path(
    get,
    path = "/api/v1/messages/{message_id}",
    tag = "Messages",
    summary = "Get message details",
    params(
        ("message_id" = uuid::Uuid, Path, description = "Message UUID"),
    ),
    responses(
        (status = 200, description = "Message details", body = MessageDto),
        (status = 404, description = "Message not found", body = ErrorResponse),
    )
)]
pub async fn get_message(
    State(state): State<AppState>,
    Path(message_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CourierError> {
    let message = state
        .mailbox
        .message(MessageId::from_uuid(message_id))
        .await?;
    Ok(Json(MessageDto::from(message)))
}

/// `PATCH /messages/recipients/:receipt_id/read` — Mark a delivered
/// message as read.
///
/// Idempotent: repeated calls return the receipt with its original
/// `read_at`.
///
/// # Errors
///
/// Returns [`CourierError::ReceiptNotFound`] if the receipt does not
/// exist.
#[utoipa::path(
    patch,
    path = "/api/v1/messages/recipients/{receipt_id}/read",
    tag = "Messages",
    summary = "Mark a message as read",
    params(
        ("receipt_id" = uuid::Uuid, Path, description = "Delivery receipt UUID"),
    ),
    responses(
        (status = 200, description = "Updated receipt", body = ReceiptDto),
        (status = 404, description = "Receipt not found", body = ErrorResponse),
    )
)]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(receipt_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CourierError> {
    let receipt = state
        .mailbox
        .mark_read(ReceiptId::from_uuid(receipt_id))
        .await?;
    Ok(Json(ReceiptDto::from(receipt)))
}

/// `GET /messages/:message_id/recipients` — Delivery status per
/// recipient.
///
/// # Errors
///
/// Returns [`CourierError::MessageNotFound`] if the message does not
/// exist.
#[utoipa::path(
    get,
    path = "/api/v1/messages/{message_id}/recipients",
    tag = "Messages",
    summary = "List message recipients and their read status",
    params(
        ("message_id" = uuid::Uuid, Path, description = "Message UUID"),
    ),
    responses(
        (status = 200, description = "Delivery status list", body = Vec<DeliveryStatusDto>),
        (status = 404, description = "Message not found", body = ErrorResponse),
    )
)]
pub async fn message_recipients(
    State(state): State<AppState>,
    Path(message_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CourierError> {
    let statuses = state
        .mailbox
        .delivery_status(MessageId::from_uuid(message_id))
        .await?;
    let data: Vec<DeliveryStatusDto> =
        statuses.into_iter().map(DeliveryStatusDto::from).collect();
    Ok(Json(data))
}

/// `GET /users/:user_id/sent_messages` — Messages sent by a user.
///
/// # Errors
///
/// Returns [`CourierError::UserNotFound`] if the user does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/sent_messages",
    tag = "Mailboxes",
    summary = "List messages sent by a user",
    params(
        ("user_id" = uuid::Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 200, description = "Sent messages", body = Vec<MessageDto>),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn sent_messages(
    State(state): State<AppState>,
    Path(user_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CourierError> {
    let messages = state.mailbox.sent(UserId::from_uuid(user_id)).await?;
    let data: Vec<MessageDto> = messages.into_iter().map(MessageDto::from).collect();
    Ok(Json(data))
}

/// `GET /users/:user_id/inbox` — A user's full inbox.
///
/// # Errors
///
/// Returns [`CourierError::UserNotFound`] if the user does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/inbox",
    tag = "Mailboxes",
    summary = "List a user's inbox",
    description = "Returns read and unread messages delivered to the user, each with its receipt state and the sender's identity.",
    params(
        ("user_id" = uuid::Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 200, description = "Inbox items", body = Vec<InboxItemDto>),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn inbox(
    State(state): State<AppState>,
    Path(user_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CourierError> {
    let entries = state
        .mailbox
        .inbox(UserId::from_uuid(user_id), false)
        .await?;
    let data: Vec<InboxItemDto> = entries.into_iter().map(InboxItemDto::from).collect();
    Ok(Json(data))
}

/// `GET /users/:user_id/inbox/unread` — Unread inbox items only.
///
/// # Errors
///
/// Returns [`CourierError::UserNotFound`] if the user does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/inbox/unread",
    tag = "Mailboxes",
    summary = "List a user's unread inbox",
    params(
        ("user_id" = uuid::Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 200, description = "Unread inbox items", body = Vec<InboxItemDto>),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn inbox_unread(
    State(state): State<AppState>,
    Path(user_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, CourierError> {
    let entries = state
        .mailbox
        .inbox(UserId::from_uuid(user_id), true)
        .await?;
    let data: Vec<InboxItemDto> = entries.into_iter().map(InboxItemDto::from).collect();
    Ok(Json(data))
}

/// Message and mailbox routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/messages", post(send_message))
        .route("/messages/{message_id}", get(get_message))
        .route("/messages/recipients/{receipt_id}/read", patch(mark_read))
        .route("/messages/{message_id}/recipients", get(message_recipients))
        .route("/users/{user_id}/sent_messages", get(sent_messages))
        .route("/users/{user_id}/inbox", get(inbox))
        .route("/users/{user_id}/inbox/unread", get(inbox_unread))
}
