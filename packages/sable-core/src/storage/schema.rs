//! # Database Schema
//!
//! SQL schema definitions for the Sable message store.
//!
//! ## Schema Overview
//!
//! ```text
//! ┌─────────────────┐      ┌─────────────────┐
//! │    messages     │      │ schema_version  │
//! ├─────────────────┤      ├─────────────────┤
//! │ id              │      │ version         │
//! │ sender_id       │      └─────────────────┘
//! │ receiver_id     │
//! │ timestamp       │
//! │ encrypted_text  │
//! └─────────────────┘
//! ```

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL to create all tables
pub const CREATE_TABLES: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Messages table
-- Stores encrypted envelopes; plaintext never reaches the database
CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    -- Sender identifier
    sender_id TEXT NOT NULL,
    -- Receiver identifier
    receiver_id TEXT NOT NULL,
    -- Unix timestamp (milliseconds)
    timestamp INTEGER NOT NULL,
    -- Base64 of the IV-prefixed ciphertext
    encrypted_text TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_messages_peers ON messages(sender_id, receiver_id);
CREATE INDEX IF NOT EXISTS idx_messages_timestamp ON messages(timestamp);
"#;
