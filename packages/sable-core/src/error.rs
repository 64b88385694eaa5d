//! # Error Handling
//!
//! This module provides the error types for Sable Core.
//!
//! All operations return explicit failure results; nothing is retried
//! internally. The only conditions a caller might reasonably retry are the
//! randomness-exhaustion variants, which [`Error::is_recoverable`] marks.
//! A [`Error::SecretMismatch`] is the opposite: it signals a protocol or
//! implementation defect and must be treated as fatal.

use thiserror::Error;

/// Result type alias for Sable Core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Sable Core
///
/// All errors are categorized by module/domain to make error handling
/// clearer and to provide meaningful error messages to users.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Key Agreement Errors
    // ========================================================================

    /// The secure random source could not supply entropy for a private scalar
    #[error("Key generation failed: the system random source could not supply entropy.")]
    KeyGeneration,

    /// Peer public key is malformed, off-curve, or the identity point
    ///
    /// Security-critical: this must never be ignored. Proceeding with an
    /// unvalidated point permits invalid-curve attacks that leak private
    /// scalar bits.
    #[error("Invalid peer public key: {0}")]
    InvalidPeerKey(String),

    /// Own key material is malformed (wrong length or out-of-range scalar)
    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    /// Two independently computed shared secrets disagree
    ///
    /// Indicates a protocol or implementation defect, never a transient
    /// condition. Do not retry.
    #[error("Shared secrets do not match; key agreement is broken.")]
    SecretMismatch,

    // ========================================================================
    // Key Derivation Errors
    // ========================================================================

    /// Requested derived-key length is not a supported cipher strength
    #[error("Unsupported key length: {0} bytes (expected 16, 24, or 32)")]
    UnsupportedKeyLength(usize),

    // ========================================================================
    // Cipher Errors
    // ========================================================================

    /// Symmetric key is not 16, 24, or 32 bytes
    #[error("Invalid key size: {0} bytes (expected 16, 24, or 32)")]
    InvalidKeySize(usize),

    /// The secure random source could not supply entropy for an IV
    #[error("IV generation failed: the system random source could not supply entropy.")]
    IvGeneration,

    /// Ciphertext too small to contain a full IV
    #[error("Ciphertext is too short: {0} bytes (needs at least 16 bytes for the IV)")]
    ShortCiphertext(usize),

    // ========================================================================
    // Message Envelope Errors
    // ========================================================================

    /// A required envelope field was empty at construction
    #[error("Message is incomplete: {0} must not be empty")]
    IncompleteMessage(&'static str),

    /// Envelope payload could not be decoded back to ciphertext bytes
    #[error("Invalid message content: {0}")]
    InvalidMessageContent(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================

    /// Environment-supplied configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Storage Errors
    // ========================================================================

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    // ========================================================================
    // Serialization Errors
    // ========================================================================

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl Error {
    /// Check if this error is recoverable
    ///
    /// Recoverable errors can potentially be resolved by retrying. Only the
    /// randomness-exhaustion conditions qualify: the OS entropy pool may be
    /// temporarily unavailable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::KeyGeneration | Error::IvGeneration)
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(Error::KeyGeneration.is_recoverable());
        assert!(Error::IvGeneration.is_recoverable());
        assert!(!Error::SecretMismatch.is_recoverable());
        assert!(!Error::InvalidPeerKey("off curve".into()).is_recoverable());
        assert!(!Error::InvalidKeySize(15).is_recoverable());
    }

    #[test]
    fn test_error_messages_name_the_offending_size() {
        assert!(Error::InvalidKeySize(17).to_string().contains("17"));
        assert!(Error::UnsupportedKeyLength(64).to_string().contains("64"));
        assert!(Error::ShortCiphertext(10).to_string().contains("10"));
    }
}
