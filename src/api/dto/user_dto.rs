//! User-related DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::UserId;
use crate::persistence::models::UserRecord;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Email address; must be syntactically valid and not yet registered.
    #[validate(email)]
    pub email: String,
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

/// A registered user as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserDto {
    /// Unique user identifier.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserDto {
    fn from(record: UserRecord) -> Self {
        Self {
            id: UserId::from_uuid(record.id),
            email: record.email,
            name: record.name,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_email() {
        let req = CreateUserRequest {
            email: "not-an-email".to_string(),
            name: "Somebody".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn accepts_well_formed_request() {
        let req = CreateUserRequest {
            email: "somebody@example.com".to_string(),
            name: "Somebody".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn rejects_empty_name() {
        let req = CreateUserRequest {
            email: "somebody@example.com".to_string(),
            name: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
