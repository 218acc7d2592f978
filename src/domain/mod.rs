//! Domain layer: typed identifiers for the messaging model.
//!
//! Users, messages, and delivery receipts are all identified by UUIDs in
//! the database; the newtypes here keep the three identifier spaces from
//! being confused with one another at compile time.

pub mod ids;

pub use ids::{MessageId, ReceiptId, UserId};
