//! Database row structs.
//!
//! One struct per query shape, mapped by column name via `sqlx::FromRow`.
//! Join rows (inbox, delivery status) flatten their columns with SQL
//! aliases rather than nesting.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    /// Primary key.
    pub id: Uuid,
    /// Unique email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow)]
pub struct MessageRecord {
    /// Primary key.
    pub id: Uuid,
    /// Sending user.
    pub sender_id: Uuid,
    /// Optional subject line.
    pub subject: Option<String>,
    /// Message body.
    pub content: String,
    /// Server-side send timestamp.
    pub sent_at: DateTime<Utc>,
}

/// A row from the `message_recipients` table.
#[derive(Debug, Clone, FromRow)]
pub struct ReceiptRecord {
    /// Primary key.
    pub id: Uuid,
    /// Message this receipt belongs to.
    pub message_id: Uuid,
    /// Receiving user.
    pub recipient_id: Uuid,
    /// Whether the recipient has read the message.
    pub read: bool,
    /// When the message was first marked read, if ever.
    pub read_at: Option<DateTime<Utc>>,
}

/// Inbox join row: a message, the recipient's receipt, and the sender.
#[derive(Debug, Clone, FromRow)]
pub struct InboxEntryRecord {
    /// Message primary key.
    pub message_id: Uuid,
    /// Sending user.
    pub sender_id: Uuid,
    /// Optional subject line.
    pub subject: Option<String>,
    /// Message body.
    pub content: String,
    /// Server-side send timestamp.
    pub sent_at: DateTime<Utc>,
    /// Receipt primary key for this recipient.
    pub receipt_id: Uuid,
    /// Read flag on the receipt.
    pub read: bool,
    /// When the message was first marked read, if ever.
    pub read_at: Option<DateTime<Utc>>,
    /// Sender's email address.
    pub sender_email: String,
    /// Sender's display name.
    pub sender_name: String,
    /// Sender's registration timestamp.
    pub sender_created_at: DateTime<Utc>,
}

/// Delivery status join row: a receipt plus its recipient's identity.
#[derive(Debug, Clone, FromRow)]
pub struct DeliveryStatusRecord {
    /// Receipt primary key.
    pub receipt_id: Uuid,
    /// Receiving user.
    pub recipient_id: Uuid,
    /// Recipient's display name.
    pub recipient_name: String,
    /// Recipient's email address.
    pub recipient_email: String,
    /// Read flag on the receipt.
    pub read: bool,
    /// When the message was first marked read, if ever.
    pub read_at: Option<DateTime<Utc>>,
}
