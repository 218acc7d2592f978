//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::service::{MailboxService, UserDirectory};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// User registration and lookup.
    pub directory: Arc<UserDirectory>,
    /// Message flow and mailboxes.
    pub mailbox: Arc<MailboxService>,
    /// Connection pool, used directly by the health probe.
    pub db: PgPool,
}
