//! # Database
//!
//! SQLite-backed persistence for message envelopes.
//!
//! The database stores ciphertext only: envelopes arrive already
//! encrypted, and nothing here touches key material. An in-memory
//! database (path `None`) backs the tests.

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::sync::Arc;

use super::schema;
use crate::error::{Error, Result};
use crate::message::Message;

/// The main database handle
///
/// This wraps a SQLite connection and provides high-level methods for
/// storing and retrieving message envelopes.
pub struct Database {
    /// The underlying SQLite connection
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create a database
    ///
    /// If path is None, creates an in-memory database (useful for testing).
    pub fn open(path: Option<&str>) -> Result<Self> {
        let conn = match path {
            Some(p) => Connection::open(p)
                .map_err(|e| Error::Database(format!("Failed to open database: {}", e)))?,
            None => Connection::open_in_memory()
                .map_err(|e| Error::Database(format!("Failed to create in-memory database: {}", e)))?,
        };

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.init_schema()?;

        Ok(db)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock();

        // Check current schema version
        let version: Option<i32> = conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .ok();

        match version {
            None => {
                // Fresh database, create all tables
                conn.execute_batch(schema::CREATE_TABLES)
                    .map_err(|e| Error::Database(format!("Failed to create tables: {}", e)))?;

                conn.execute(
                    "INSERT INTO schema_version (version) VALUES (?)",
                    params![schema::SCHEMA_VERSION],
                )
                .map_err(|e| Error::Database(format!("Failed to set schema version: {}", e)))?;

                tracing::info!("Database schema created (version {})", schema::SCHEMA_VERSION);
            }
            Some(v) if v < schema::SCHEMA_VERSION => {
                // No destructive migrations yet: re-running the idempotent
                // schema brings older databases forward
                conn.execute_batch(schema::CREATE_TABLES)
                    .map_err(|e| Error::Database(format!("Failed to migrate tables: {}", e)))?;

                conn.execute(
                    "UPDATE schema_version SET version = ?",
                    params![schema::SCHEMA_VERSION],
                )
                .map_err(|e| Error::Database(format!("Failed to update schema version: {}", e)))?;

                tracing::info!(
                    "Database schema migrated from version {} to {}",
                    v,
                    schema::SCHEMA_VERSION
                );
            }
            Some(_) => {}
        }

        Ok(())
    }

    /// Store a message envelope, returning its row id
    pub fn insert_message(&self, message: &Message) -> Result<i64> {
        let conn = self.conn.lock();

        conn.execute(
            "INSERT INTO messages (sender_id, receiver_id, timestamp, encrypted_text)
             VALUES (?, ?, ?, ?)",
            params![
                message.sender_id,
                message.receiver_id,
                message.timestamp.timestamp_millis(),
                message.encrypted_text,
            ],
        )
        .map_err(|e| Error::Database(format!("Failed to insert message: {}", e)))?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a single message by row id
    pub fn message(&self, id: i64) -> Result<Option<MessageRecord>> {
        let conn = self.conn.lock();

        let result = conn.query_row(
            "SELECT id, sender_id, receiver_id, timestamp, encrypted_text
             FROM messages WHERE id = ?",
            params![id],
            |row| {
                Ok(MessageRecord {
                    id: row.get(0)?,
                    sender_id: row.get(1)?,
                    receiver_id: row.get(2)?,
                    timestamp: row.get(3)?,
                    encrypted_text: row.get(4)?,
                })
            },
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Error::Database(format!("Failed to get message: {}", e))),
        }
    }

    /// Get all messages exchanged between a sender and a receiver,
    /// oldest first
    pub fn messages_between(&self, sender_id: &str, receiver_id: &str) -> Result<Vec<MessageRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, sender_id, receiver_id, timestamp, encrypted_text
                 FROM messages WHERE sender_id = ? AND receiver_id = ?
                 ORDER BY timestamp ASC",
            )
            .map_err(|e| Error::Database(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![sender_id, receiver_id], |row| {
                Ok(MessageRecord {
                    id: row.get(0)?,
                    sender_id: row.get(1)?,
                    receiver_id: row.get(2)?,
                    timestamp: row.get(3)?,
                    encrypted_text: row.get(4)?,
                })
            })
            .map_err(|e| Error::Database(format!("Failed to query messages: {}", e)))?;

        let mut messages = Vec::new();
        for row in rows {
            messages
                .push(row.map_err(|e| Error::Database(format!("Failed to read message: {}", e)))?);
        }

        Ok(messages)
    }

    /// Count all stored messages
    pub fn message_count(&self) -> Result<u64> {
        let conn = self.conn.lock();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))
            .map_err(|e| Error::Database(format!("Failed to count messages: {}", e)))?;

        Ok(count as u64)
    }
}

/// A stored message row
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRecord {
    /// Row id
    pub id: i64,
    /// Sender identifier
    pub sender_id: String,
    /// Receiver identifier
    pub receiver_id: String,
    /// Unix timestamp (milliseconds)
    pub timestamp: i64,
    /// Base64 of the IV-prefixed ciphertext
    pub encrypted_text: String,
}

impl MessageRecord {
    /// Convert the row back into a message envelope
    pub fn into_message(self) -> Result<Message> {
        let timestamp: DateTime<Utc> = Utc
            .timestamp_millis_opt(self.timestamp)
            .single()
            .ok_or_else(|| {
                Error::Database(format!("stored timestamp {} is out of range", self.timestamp))
            })?;

        Ok(Message {
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            timestamp,
            encrypted_text: self.encrypted_text,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
