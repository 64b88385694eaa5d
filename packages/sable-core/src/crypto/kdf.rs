//! # Key Derivation
//!
//! Reduces a variable-length ECDH shared secret to a fixed-length symmetric
//! key via a one-way hash.
//!
//! ## Process
//!
//! ```text
//! Shared Secret (32 bytes, x coordinate)
//!       │
//!       ▼
//! SHA-256 digest (32 bytes)
//!       │
//!       ▼
//! Truncate to target length ──► SymmetricKey (16, 24, or 32 bytes)
//! ```
//!
//! The derivation is a pure function: same secret, same target length,
//! same key — every time, with no internal state and no randomness. The
//! raw Diffie-Hellman output must never key a cipher directly; this step
//! is mandatory in the pipeline.

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::crypto::cipher::SymmetricKey;
use crate::crypto::keys::SharedSecret;
use crate::error::{Error, Result};

/// Supported derived-key lengths in bytes (AES-128/192/256 strengths)
pub const SUPPORTED_KEY_LENGTHS: [usize; 3] = [16, 24, 32];

/// Derive a fixed-length symmetric key from an ECDH shared secret
///
/// Hashes the secret with SHA-256 and truncates the digest to
/// `target_len` bytes, selecting among the supported cipher strengths.
///
/// ## Errors
///
/// Returns [`Error::UnsupportedKeyLength`] if `target_len` is not 16, 24,
/// or 32.
pub fn derive_key(secret: &SharedSecret, target_len: usize) -> Result<SymmetricKey> {
    if !SUPPORTED_KEY_LENGTHS.contains(&target_len) {
        return Err(Error::UnsupportedKeyLength(target_len));
    }

    let mut digest = Zeroizing::new([0u8; 32]);
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    digest.copy_from_slice(&hasher.finalize());

    SymmetricKey::from_bytes(digest[..target_len].to_vec())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let secret = SharedSecret::from_bytes([42u8; 32]);

        let key1 = derive_key(&secret, 32).unwrap();
        let key2 = derive_key(&secret, 32).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_secrets_yield_different_keys() {
        let a = SharedSecret::from_bytes([1u8; 32]);
        let b = SharedSecret::from_bytes([2u8; 32]);

        let key_a = derive_key(&a, 32).unwrap();
        let key_b = derive_key(&b, 32).unwrap();

        assert_ne!(key_a.as_bytes(), key_b.as_bytes());
    }

    #[test]
    fn test_all_supported_lengths() {
        let secret = SharedSecret::from_bytes([7u8; 32]);

        for len in SUPPORTED_KEY_LENGTHS {
            let key = derive_key(&secret, len).unwrap();
            assert_eq!(key.as_bytes().len(), len);
        }
    }

    #[test]
    fn test_shorter_keys_are_prefixes_of_the_digest() {
        // Truncation means the 16-byte key is a prefix of the 32-byte one
        let secret = SharedSecret::from_bytes([9u8; 32]);

        let short = derive_key(&secret, 16).unwrap();
        let long = derive_key(&secret, 32).unwrap();

        assert_eq!(short.as_bytes(), &long.as_bytes()[..16]);
    }

    #[test]
    fn test_unsupported_lengths_rejected() {
        let secret = SharedSecret::from_bytes([3u8; 32]);

        for len in [0, 1, 15, 17, 31, 33, 64] {
            let err = derive_key(&secret, len).unwrap_err();
            assert!(matches!(err, Error::UnsupportedKeyLength(n) if n == len));
        }
    }
}
