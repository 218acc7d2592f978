//! PostgreSQL implementation of the storage layer.

use sqlx::PgPool;
use uuid::Uuid;

use super::models::{
    DeliveryStatusRecord, InboxEntryRecord, MessageRecord, ReceiptRecord, UserRecord,
};
use crate::error::CourierError;

/// PostgreSQL error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts a new user and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::EmailTaken`] when the email collides with
    /// an existing user, or [`CourierError::Database`] on other failures.
    pub async fn insert_user(
        &self,
        id: Uuid,
        email: &str,
        name: &str,
    ) -> Result<UserRecord, CourierError> {
        sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, email, name) VALUES ($1, $2, $3) \
             RETURNING id, email, name, created_at",
        )
        .bind(id)
        .bind(email)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let unique_violation = e
                .as_database_error()
                .and_then(|d| d.code())
                .is_some_and(|code| code == UNIQUE_VIOLATION);
            if unique_violation {
                CourierError::EmailTaken(email.to_string())
            } else {
                CourierError::Database(e)
            }
        })
    }

    /// Looks up a user by email.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::Database`] on database failure.
    pub async fn user_by_email(&self, email: &str) -> Result<Option<UserRecord>, CourierError> {
        let row = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, name, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Looks up a user by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::Database`] on database failure.
    pub async fn user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, CourierError> {
        let row = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, name, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Returns whether a user with the given ID exists.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::Database`] on database failure.
    pub async fn user_exists(&self, id: Uuid) -> Result<bool, CourierError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Lists users in registration order with offset pagination.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::Database`] on database failure.
    pub async fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<UserRecord>, CourierError> {
        let rows = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, name, created_at FROM users \
             ORDER BY created_at, id OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Inserts a message and one delivery receipt per recipient in a
    /// single transaction.
    ///
    /// Every recipient is checked inside the transaction; an unknown
    /// recipient rolls back the whole send, so a message is never stored
    /// with a partial receipt set.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::RecipientNotFound`] naming the first
    /// unknown recipient, or [`CourierError::Database`] on database
    /// failure.
    pub async fn insert_message(
        &self,
        id: Uuid,
        sender_id: Uuid,
        subject: Option<&str>,
        content: &str,
        recipient_ids: &[Uuid],
    ) -> Result<MessageRecord, CourierError> {
        let mut tx = self.pool.begin().await?;

        let message = sqlx::query_as::<_, MessageRecord>(
            "INSERT INTO messages (id, sender_id, subject, content) VALUES ($1, $2, $3, $4) \
             RETURNING id, sender_id, subject, content, sent_at",
        )
        .bind(id)
        .bind(sender_id)
        .bind(subject)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        for &recipient_id in recipient_ids {
            let exists =
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                    .bind(recipient_id)
                    .fetch_one(&mut *tx)
                    .await?;
            if !exists {
                // Dropping the transaction rolls everything back.
                return Err(CourierError::RecipientNotFound(recipient_id));
            }

            sqlx::query(
                "INSERT INTO message_recipients (id, message_id, recipient_id) \
                 VALUES ($1, $2, $3)",
            )
            .bind(Uuid::new_v4())
            .bind(id)
            .bind(recipient_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(message)
    }

    /// Looks up a message by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::Database`] on database failure.
    pub async fn message_by_id(&self, id: Uuid) -> Result<Option<MessageRecord>, CourierError> {
        let row = sqlx::query_as::<_, MessageRecord>(
            "SELECT id, sender_id, subject, content, sent_at FROM messages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Returns whether a message with the given ID exists.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::Database`] on database failure.
    pub async fn message_exists(&self, id: Uuid) -> Result<bool, CourierError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM messages WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Marks a receipt read, stamping `read_at` only on the first
    /// transition. Returns the updated row, or `None` when the receipt
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::Database`] on database failure.
    pub async fn mark_receipt_read(
        &self,
        receipt_id: Uuid,
    ) -> Result<Option<ReceiptRecord>, CourierError> {
        let row = sqlx::query_as::<_, ReceiptRecord>(
            "UPDATE message_recipients \
             SET read = TRUE, read_at = COALESCE(read_at, now()) \
             WHERE id = $1 \
             RETURNING id, message_id, recipient_id, read, read_at",
        )
        .bind(receipt_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Lists all messages sent by the given user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::Database`] on database failure.
    pub async fn sent_by(&self, sender_id: Uuid) -> Result<Vec<MessageRecord>, CourierError> {
        let rows = sqlx::query_as::<_, MessageRecord>(
            "SELECT id, sender_id, subject, content, sent_at FROM messages \
             WHERE sender_id = $1 ORDER BY sent_at, id",
        )
        .bind(sender_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Lists the inbox of the given user: every message delivered to
    /// them, joined with their receipt and the sender's identity.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::Database`] on database failure.
    pub async fn inbox_for(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
    ) -> Result<Vec<InboxEntryRecord>, CourierError> {
        let rows = sqlx::query_as::<_, InboxEntryRecord>(
            "SELECT m.id AS message_id, m.sender_id, m.subject, m.content, m.sent_at, \
                    r.id AS receipt_id, r.read, r.read_at, \
                    u.email AS sender_email, u.name AS sender_name, \
                    u.created_at AS sender_created_at \
             FROM message_recipients r \
             JOIN messages m ON m.id = r.message_id \
             JOIN users u ON u.id = m.sender_id \
             WHERE r.recipient_id = $1 AND (NOT $2 OR NOT r.read) \
             ORDER BY m.sent_at, m.id",
        )
        .bind(recipient_id)
        .bind(unread_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Lists the delivery status of every recipient of a message.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::Database`] on database failure.
    pub async fn delivery_status(
        &self,
        message_id: Uuid,
    ) -> Result<Vec<DeliveryStatusRecord>, CourierError> {
        let rows = sqlx::query_as::<_, DeliveryStatusRecord>(
            "SELECT r.id AS receipt_id, r.recipient_id, \
                    u.name AS recipient_name, u.email AS recipient_email, \
                    r.read, r.read_at \
             FROM message_recipients r \
             JOIN users u ON u.id = r.recipient_id \
             WHERE r.message_id = $1 \
             ORDER BY u.created_at, u.id",
        )
        .bind(message_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
