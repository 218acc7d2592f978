//! Message, receipt, and mailbox DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::user_dto::UserDto;
use crate::domain::{MessageId, ReceiptId, UserId};
use crate::persistence::models::{
    DeliveryStatusRecord, InboxEntryRecord, MessageRecord, ReceiptRecord,
};

/// Request body for `POST /messages`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    /// Sending user.
    pub sender_id: UserId,
    /// One or more recipients.
    pub recipient_ids: Vec<UserId>,
    /// Optional subject line.
    #[serde(default)]
    pub subject: Option<String>,
    /// Message body.
    #[validate(length(min = 1))]
    pub content: String,
}

/// A message as returned by the API.
///
/// The send time is exposed as `timestamp` on the wire.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageDto {
    /// Unique message identifier.
    pub id: MessageId,
    /// Sending user.
    pub sender_id: UserId,
    /// Optional subject line.
    pub subject: Option<String>,
    /// Message body.
    pub content: String,
    /// Server-side send timestamp.
    pub timestamp: DateTime<Utc>,
}

impl From<MessageRecord> for MessageDto {
    fn from(record: MessageRecord) -> Self {
        Self {
            id: MessageId::from_uuid(record.id),
            sender_id: UserId::from_uuid(record.sender_id),
            subject: record.subject,
            content: record.content,
            timestamp: record.sent_at,
        }
    }
}

/// A delivery receipt as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReceiptDto {
    /// Unique receipt identifier.
    pub id: ReceiptId,
    /// Message this receipt belongs to.
    pub message_id: MessageId,
    /// Receiving user.
    pub recipient_id: UserId,
    /// Whether the recipient has read the message.
    pub read: bool,
    /// When the message was first marked read, if ever.
    pub read_at: Option<DateTime<Utc>>,
}

impl From<ReceiptRecord> for ReceiptDto {
    fn from(record: ReceiptRecord) -> Self {
        Self {
            id: ReceiptId::from_uuid(record.id),
            message_id: MessageId::from_uuid(record.message_id),
            recipient_id: UserId::from_uuid(record.recipient_id),
            read: record.read,
            read_at: record.read_at,
        }
    }
}

/// One entry in a user's inbox: the message plus this recipient's read
/// state and the sender's identity.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InboxItemDto {
    /// Unique message identifier.
    pub id: MessageId,
    /// Sending user.
    pub sender_id: UserId,
    /// Optional subject line.
    pub subject: Option<String>,
    /// Message body.
    pub content: String,
    /// Server-side send timestamp.
    pub timestamp: DateTime<Utc>,
    /// Receipt identifier for this recipient; the target of the
    /// mark-as-read endpoint.
    pub recipient_entry_id: ReceiptId,
    /// Whether this recipient has read the message.
    pub read: bool,
    /// When this recipient first read the message, if ever.
    pub read_at: Option<DateTime<Utc>>,
    /// The sender's user record.
    pub sender: UserDto,
}

impl From<InboxEntryRecord> for InboxItemDto {
    fn from(record: InboxEntryRecord) -> Self {
        Self {
            id: MessageId::from_uuid(record.message_id),
            sender_id: UserId::from_uuid(record.sender_id),
            subject: record.subject,
            content: record.content,
            timestamp: record.sent_at,
            recipient_entry_id: ReceiptId::from_uuid(record.receipt_id),
            read: record.read,
            read_at: record.read_at,
            sender: UserDto {
                id: UserId::from_uuid(record.sender_id),
                email: record.sender_email,
                name: record.sender_name,
                created_at: record.sender_created_at,
            },
        }
    }
}

/// Per-recipient delivery status for a message.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeliveryStatusDto {
    /// Receipt identifier.
    pub recipient_entry_id: ReceiptId,
    /// Receiving user.
    pub recipient_id: UserId,
    /// Recipient's display name.
    pub recipient_name: String,
    /// Recipient's email address.
    pub recipient_email: String,
    /// Whether the recipient has read the message.
    pub read: bool,
    /// When the message was first marked read, if ever.
    pub read_at: Option<DateTime<Utc>>,
}

impl From<DeliveryStatusRecord> for DeliveryStatusDto {
    fn from(record: DeliveryStatusRecord) -> Self {
        Self {
            recipient_entry_id: ReceiptId::from_uuid(record.receipt_id),
            recipient_id: UserId::from_uuid(record.recipient_id),
            recipient_name: record.recipient_name,
            recipient_email: record.recipient_email,
            read: record.read,
            read_at: record.read_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn sample_inbox_record() -> InboxEntryRecord {
        InboxEntryRecord {
            message_id: uuid::Uuid::new_v4(),
            sender_id: uuid::Uuid::new_v4(),
            subject: Some("hello".to_string()),
            content: "body".to_string(),
            sent_at: Utc::now(),
            receipt_id: uuid::Uuid::new_v4(),
            read: false,
            read_at: None,
            sender_email: "sender@example.com".to_string(),
            sender_name: "Sender".to_string(),
            sender_created_at: Utc::now(),
        }
    }

    #[test]
    fn message_dto_exposes_sent_at_as_timestamp() {
        let record = MessageRecord {
            id: uuid::Uuid::new_v4(),
            sender_id: uuid::Uuid::new_v4(),
            subject: None,
            content: "body".to_string(),
            sent_at: Utc::now(),
        };
        let dto = MessageDto::from(record);
        let Ok(json) = serde_json::to_value(&dto) else {
            panic!("serialization failed");
        };
        assert!(json.get("timestamp").is_some());
        assert!(json.get("sent_at").is_none());
    }

    #[test]
    fn inbox_item_embeds_sender_and_receipt_state() {
        let record = sample_inbox_record();
        let sender_id = record.sender_id;
        let receipt_id = record.receipt_id;

        let dto = InboxItemDto::from(record);
        assert_eq!(dto.sender.id, UserId::from_uuid(sender_id));
        assert_eq!(dto.sender_id, UserId::from_uuid(sender_id));
        assert_eq!(dto.recipient_entry_id, ReceiptId::from_uuid(receipt_id));
        assert!(!dto.read);
        assert!(dto.read_at.is_none());
    }

    #[test]
    fn send_request_rejects_empty_content() {
        let req = SendMessageRequest {
            sender_id: UserId::new(),
            recipient_ids: vec![UserId::new()],
            subject: None,
            content: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
