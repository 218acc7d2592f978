//! Service layer: business logic orchestration.
//!
//! [`UserDirectory`] owns user registration and lookup;
//! [`MailboxService`] owns message flow — sending, read receipts, and
//! mailbox queries. Both validate against the store before mutating and
//! log through `tracing`.

pub mod directory;
pub mod mailbox;

pub use directory::UserDirectory;
pub use mailbox::MailboxService;
