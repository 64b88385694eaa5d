//! # Message Envelope
//!
//! The data-transfer object carrying an encrypted payload between two
//! parties, with JSON as the interchange format.
//!
//! ## Wire Protocol
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      MESSAGE ENVELOPE FORMAT                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Message (JSON serialized)                                              │
//! │  ─────────────────────────                                              │
//! │  {                                                                      │
//! │    "sender_id": "alice",              // Sender identifier              │
//! │    "receiver_id": "bob",              // Receiver identifier            │
//! │    "timestamp": "2026-…T…Z",          // RFC 3339 UTC timestamp         │
//! │    "encrypted_text": "base64…"        // IV-prefixed ciphertext         │
//! │  }                                                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The envelope treats the cipher output as an opaque blob: the base64
//! encoding keeps it string-safe for JSON regardless of the raw bytes.
//! Construction validates all required fields up front and fails fast,
//! replacing step-by-step builder mutation with a single checked
//! constructor.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A message envelope carrying an encrypted payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Sender identifier
    pub sender_id: String,
    /// Receiver identifier
    pub receiver_id: String,
    /// When the message was created (UTC)
    pub timestamp: DateTime<Utc>,
    /// Base64 encoding of the IV-prefixed ciphertext
    pub encrypted_text: String,
}

impl Message {
    /// Create an envelope stamped with the current time
    ///
    /// ## Errors
    ///
    /// Returns [`Error::IncompleteMessage`] if either identifier or the
    /// ciphertext is empty.
    pub fn new(
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        ciphertext: &[u8],
    ) -> Result<Self> {
        Self::with_timestamp(sender_id, receiver_id, ciphertext, Utc::now())
    }

    /// Create an envelope with an explicit timestamp
    ///
    /// Same validation as [`Message::new`]; the timestamp is the only
    /// optional input in envelope construction.
    pub fn with_timestamp(
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        ciphertext: &[u8],
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        let sender_id = sender_id.into();
        let receiver_id = receiver_id.into();

        if sender_id.is_empty() {
            return Err(Error::IncompleteMessage("sender_id"));
        }
        if receiver_id.is_empty() {
            return Err(Error::IncompleteMessage("receiver_id"));
        }
        if ciphertext.is_empty() {
            return Err(Error::IncompleteMessage("encrypted_text"));
        }

        Ok(Self {
            sender_id,
            receiver_id,
            timestamp,
            encrypted_text: BASE64.encode(ciphertext),
        })
    }

    /// Decode the payload back to raw ciphertext bytes
    ///
    /// ## Errors
    ///
    /// Returns [`Error::InvalidMessageContent`] if the payload is not
    /// valid base64 (e.g. a corrupted or hand-edited envelope).
    pub fn ciphertext(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(&self.encrypted_text)
            .map_err(|e| Error::InvalidMessageContent(format!("payload is not valid base64: {}", e)))
    }

    /// Serialize to the JSON interchange format
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from the JSON interchange format
    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|e| Error::Deserialization(e.to_string()))
    }
}

// ============================================================================
// TESTS
// ============================================================================
