//! Service error types with HTTP status code mapping.
//!
//! [`CourierError`] is the central error type for the service. Each
//! variant maps to a specific HTTP status code and structured JSON error
//! response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "user not found: 7f6c…",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`CourierError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request           |
/// | 2000–2999 | Not Found       | 404 Not Found             |
/// | 3000–3999 | Server          | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum CourierError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A user with the given email already exists.
    #[error("email already registered: {0}")]
    EmailTaken(String),

    /// A message must name at least one recipient.
    #[error("message must have at least one recipient")]
    NoRecipients,

    /// User with the given ID was not found.
    #[error("user not found: {0}")]
    UserNotFound(uuid::Uuid),

    /// Message sender was not found.
    #[error("sender not found: {0}")]
    SenderNotFound(uuid::Uuid),

    /// A named recipient was not found.
    #[error("recipient not found: {0}")]
    RecipientNotFound(uuid::Uuid),

    /// Message with the given ID was not found.
    #[error("message not found: {0}")]
    MessageNotFound(uuid::Uuid),

    /// Delivery receipt with the given ID was not found.
    #[error("receipt not found: {0}")]
    ReceiptNotFound(uuid::Uuid),

    /// Database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CourierError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::EmailTaken(_) => 1002,
            Self::NoRecipients => 1003,
            Self::UserNotFound(_) => 2001,
            Self::SenderNotFound(_) => 2002,
            Self::RecipientNotFound(_) => 2003,
            Self::MessageNotFound(_) => 2004,
            Self::ReceiptNotFound(_) => 2005,
            Self::Database(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::EmailTaken(_) | Self::NoRecipients => {
                StatusCode::BAD_REQUEST
            }
            Self::UserNotFound(_)
            | Self::SenderNotFound(_)
            | Self::RecipientNotFound(_)
            | Self::MessageNotFound(_)
            | Self::ReceiptNotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CourierError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_400() {
        assert_eq!(
            CourierError::EmailTaken("a@b.example".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CourierError::NoRecipients.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn not_found_errors_map_to_404() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(
            CourierError::UserNotFound(id).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CourierError::ReceiptNotFound(id).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn codes_follow_declared_ranges() {
        let id = uuid::Uuid::new_v4();
        assert!((1000..2000).contains(&CourierError::NoRecipients.error_code()));
        assert!((2000..3000).contains(&CourierError::MessageNotFound(id).error_code()));
        assert!((3000..4000).contains(
            &CourierError::Internal("boom".to_string()).error_code()
        ));
    }

    #[test]
    fn error_body_serializes_without_null_details() {
        let body = ErrorResponse {
            error: ErrorBody {
                code: 1003,
                message: "message must have at least one recipient".to_string(),
                details: None,
            },
        };
        let Ok(json) = serde_json::to_value(&body) else {
            panic!("serialization failed");
        };
        assert_eq!(json.pointer("/error/code").and_then(|v| v.as_u64()), Some(1003));
        assert!(json.pointer("/error/details").is_none());
    }
}
