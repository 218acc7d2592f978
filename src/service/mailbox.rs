//! Mailbox service: message flow and read receipts.

use crate::domain::{MessageId, ReceiptId, UserId};
use crate::error::CourierError;
use crate::persistence::PostgresStore;
use crate::persistence::models::{
    DeliveryStatusRecord, InboxEntryRecord, MessageRecord, ReceiptRecord,
};

/// Business logic for sending messages and reading mailboxes.
///
/// Every mutation validates its participants before touching storage;
/// the multi-row send itself is transactional inside
/// [`PostgresStore::insert_message`].
#[derive(Debug, Clone)]
pub struct MailboxService {
    store: PostgresStore,
}

impl MailboxService {
    /// Creates a new `MailboxService`.
    #[must_use]
    pub fn new(store: PostgresStore) -> Self {
        Self { store }
    }

    /// Sends a message from `sender` to one or more recipients, creating
    /// a delivery receipt per recipient.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::NoRecipients`] on an empty recipient list,
    /// [`CourierError::SenderNotFound`] when the sender is unknown, and
    /// [`CourierError::RecipientNotFound`] when any recipient is unknown
    /// (in which case nothing is stored).
    pub async fn send(
        &self,
        sender: UserId,
        recipients: &[UserId],
        subject: Option<&str>,
        content: &str,
    ) -> Result<MessageRecord, CourierError> {
        if recipients.is_empty() {
            return Err(CourierError::NoRecipients);
        }
        if !self.store.user_exists(*sender.as_uuid()).await? {
            return Err(CourierError::SenderNotFound(*sender.as_uuid()));
        }

        let message_id = MessageId::new();
        let recipient_uuids: Vec<uuid::Uuid> =
            recipients.iter().map(|r| *r.as_uuid()).collect();

        let message = self
            .store
            .insert_message(
                *message_id.as_uuid(),
                *sender.as_uuid(),
                subject,
                content,
                &recipient_uuids,
            )
            .await?;

        tracing::info!(
            %message_id,
            %sender,
            recipients = recipients.len(),
            "message sent"
        );
        Ok(message)
    }

    /// Fetches a message by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::MessageNotFound`] when no such message
    /// exists.
    pub async fn message(&self, message_id: MessageId) -> Result<MessageRecord, CourierError> {
        self.store
            .message_by_id(*message_id.as_uuid())
            .await?
            .ok_or(CourierError::MessageNotFound(*message_id.as_uuid()))
    }

    /// Marks the receipt as read. Idempotent: `read_at` is stamped on the
    /// first call and preserved on repeats.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::ReceiptNotFound`] when no such receipt
    /// exists.
    pub async fn mark_read(&self, receipt_id: ReceiptId) -> Result<ReceiptRecord, CourierError> {
        let receipt = self
            .store
            .mark_receipt_read(*receipt_id.as_uuid())
            .await?
            .ok_or(CourierError::ReceiptNotFound(*receipt_id.as_uuid()))?;

        tracing::debug!(%receipt_id, "receipt marked read");
        Ok(receipt)
    }

    /// Lists messages sent by the given user.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::UserNotFound`] when the user is unknown.
    pub async fn sent(&self, user_id: UserId) -> Result<Vec<MessageRecord>, CourierError> {
        self.require_user(user_id).await?;
        self.store.sent_by(*user_id.as_uuid()).await
    }

    /// Lists the user's inbox, optionally restricted to unread messages.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::UserNotFound`] when the user is unknown.
    pub async fn inbox(
        &self,
        user_id: UserId,
        unread_only: bool,
    ) -> Result<Vec<InboxEntryRecord>, CourierError> {
        self.require_user(user_id).await?;
        self.store.inbox_for(*user_id.as_uuid(), unread_only).await
    }

    /// Lists the delivery status of every recipient of a message.
    ///
    /// # Errors
    ///
    /// Returns [`CourierError::MessageNotFound`] when the message is
    /// unknown.
    pub async fn delivery_status(
        &self,
        message_id: MessageId,
    ) -> Result<Vec<DeliveryStatusRecord>, CourierError> {
        if !self.store.message_exists(*message_id.as_uuid()).await? {
            return Err(CourierError::MessageNotFound(*message_id.as_uuid()));
        }
        self.store.delivery_status(*message_id.as_uuid()).await
    }

    async fn require_user(&self, user_id: UserId) -> Result<(), CourierError> {
        if self.store.user_exists(*user_id.as_uuid()).await? {
            Ok(())
        } else {
            Err(CourierError::UserNotFound(*user_id.as_uuid()))
        }
    }
}
