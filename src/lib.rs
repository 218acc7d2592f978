//! # courier-api
//!
//! REST API for user-to-user messaging backed by PostgreSQL.
//!
//! This crate provides an HTTP interface for registering users, sending
//! messages to one or more recipients, and reading mailboxes. All durable
//! state lives in PostgreSQL — this service is a coordination layer over
//! the database.
//!
//! Startup is sequenced: the server refuses to bind its listener until the
//! database readiness gate (see [`readiness`]) has observed a successful
//! health probe, so requests can never race a database that is still
//! initializing.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── UserDirectory / MailboxService (service/)
//!     │
//!     ├── PostgresStore (persistence/)
//!     │
//!     └── PostgreSQL  ◄── ReadinessGate (readiness/) gates startup
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod readiness;
pub mod service;
