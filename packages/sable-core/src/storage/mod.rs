//! # Storage Module
//!
//! Local persistence for Sable message envelopes.
//!
//! ```text
//! ┌─────────────────┐
//! │   Application   │
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐   High-level API: insert / lookup / list
//! │    Database     │
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐   SQLite (rusqlite)
//! │   messages.db   │   In-memory for tests, file for production
//! └─────────────────┘
//! ```
//!
//! Only ciphertext reaches this layer; envelopes are stored exactly as
//! they travel on the wire.

mod database;
mod schema;

pub use database::{Database, MessageRecord};
pub use schema::SCHEMA_VERSION;
