//! Persistence layer: PostgreSQL storage for users, messages, and
//! delivery receipts.
//!
//! All SQL lives in [`postgres::PostgresStore`], which wraps a
//! `sqlx::PgPool`. Schema changes are applied through the sqlx migrator
//! from the `migrations/` directory at startup, after the readiness gate
//! has opened.

pub mod models;
pub mod postgres;

pub use postgres::PostgresStore;
