//! User directory: registration and lookup.

use crate::domain::UserId;
use crate::error::CourierError;
use crate::persistence::PostgresStore;
use crate::persistence::models::UserRecord;

/// Business logic for the user resource.
///
/// Thin coordinator over [`PostgresStore`]: enforces email uniqueness on
/// registration and translates missing rows into typed errors.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    store: PostgresStore,
}

impl UserDirectory {
    /// Creates a new `UserDirectory`.
    #[must_use]
    pub fn new(store: PostgresStore) -> Self {
        Self { store }
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::EmailTaken`] when the email is already
    /// registered, or [`CourierError::Database`] on storage failure.
    pub async fn register(&self, email: &str, name: &str) -> Result<UserRecord, CourierError> {
        if self.store.user_by_email(email).await?.is_some() {
            return Err(CourierError::EmailTaken(email.to_string()));
        }

        let user_id = UserId::new();
        let user = self
            .store
            .insert_user(*user_id.as_uuid(), email, name)
            .await?;

        tracing::info!(%user_id, "user registered");
        Ok(user)
    }

    /// Fetches a user by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::UserNotFound`] when no such user exists.
    pub async fn get(&self, user_id: UserId) -> Result<UserRecord, CourierError> {
        self.store
            .user_by_id(*user_id.as_uuid())
            .await?
            .ok_or(CourierError::UserNotFound(*user_id.as_uuid()))
    }

    /// Lists users in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::Database`] on storage failure.
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<UserRecord>, CourierError> {
        self.store.list_users(skip, limit).await
    }
}
