//! # Symmetric Cipher
//!
//! AES in cipher feedback (CFB) mode with a random per-message IV.
//!
//! ## Wire Format
//!
//! ```text
//! ┌──────────────────┬──────────────────────────────────────┐
//! │  IV (16 bytes)   │  keystream-XORed data (= plaintext   │
//! │                  │  length, no padding)                 │
//! └──────────────────┴──────────────────────────────────────┘
//! ```
//!
//! `len(ciphertext) == 16 + len(plaintext)` always holds. The AES variant
//! (128/192/256) is selected by the key length.
//!
//! ## Critical Security Requirement
//!
//! **Never reuse an IV with the same key.** Every call to [`encrypt`]
//! draws a fresh random IV; reuse breaks confidentiality in stream-cipher
//! modes.
//!
//! ## Known Gap: No Integrity Protection
//!
//! CFB provides confidentiality only. There is no authentication tag, so
//! tampering goes undetected and decryption under a wrong key yields
//! same-length garbage rather than an error. An authenticated mode
//! (AES-GCM or similar) would close this; the current wire format is kept
//! for compatibility and the gap is left to a security review to resolve.

use aes::{Aes128, Aes192, Aes256};
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};
use cfb_mode::{Decryptor, Encryptor};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::ZeroizeOnDrop;

use crate::error::{Error, Result};

/// AES block size in bytes; also the IV length prepended to ciphertexts
pub const BLOCK_SIZE: usize = 16;

/// Supported symmetric key sizes in bytes (AES-128, AES-192, AES-256)
pub const SUPPORTED_KEY_SIZES: [usize; 3] = [16, 24, 32];

type Aes128CfbEnc = Encryptor<Aes128>;
type Aes192CfbEnc = Encryptor<Aes192>;
type Aes256CfbEnc = Encryptor<Aes256>;
type Aes128CfbDec = Decryptor<Aes128>;
type Aes192CfbDec = Decryptor<Aes192>;
type Aes256CfbDec = Decryptor<Aes256>;

/// A symmetric encryption key of a supported size
///
/// Accepts any byte source of a supported length regardless of provenance:
/// ECDH-derived via [`crate::crypto::derive_key`], or supplied directly
/// (e.g. an environment-provided pre-shared key). Zeroized when dropped.
#[derive(ZeroizeOnDrop)]
pub struct SymmetricKey(Vec<u8>);

impl SymmetricKey {
    /// Create a key from raw bytes, validating the length
    ///
    /// ## Errors
    ///
    /// Returns [`Error::InvalidKeySize`] if `bytes` is not 16, 24, or 32
    /// bytes long.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        check_key_size(&bytes)?;
        Ok(Self(bytes))
    }

    /// Get the raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SymmetricKey {
    // Key material stays out of logs; only the strength is shown
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SymmetricKey({} bytes)", self.0.len())
    }
}

fn check_key_size(key: &[u8]) -> Result<()> {
    if !SUPPORTED_KEY_SIZES.contains(&key.len()) {
        tracing::warn!(len = key.len(), "rejected symmetric key of invalid size");
        return Err(Error::InvalidKeySize(key.len()));
    }
    Ok(())
}

fn cfb_encrypt(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<()> {
    match key.len() {
        16 => Aes128CfbEnc::new_from_slices(key, iv)
            .map_err(|_| Error::InvalidKeySize(key.len()))?
            .encrypt(buf),
        24 => Aes192CfbEnc::new_from_slices(key, iv)
            .map_err(|_| Error::InvalidKeySize(key.len()))?
            .encrypt(buf),
        32 => Aes256CfbEnc::new_from_slices(key, iv)
            .map_err(|_| Error::InvalidKeySize(key.len()))?
            .encrypt(buf),
        n => return Err(Error::InvalidKeySize(n)),
    }
    Ok(())
}

fn cfb_decrypt(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<()> {
    match key.len() {
        16 => Aes128CfbDec::new_from_slices(key, iv)
            .map_err(|_| Error::InvalidKeySize(key.len()))?
            .decrypt(buf),
        24 => Aes192CfbDec::new_from_slices(key, iv)
            .map_err(|_| Error::InvalidKeySize(key.len()))?
            .decrypt(buf),
        32 => Aes256CfbDec::new_from_slices(key, iv)
            .map_err(|_| Error::InvalidKeySize(key.len()))?
            .decrypt(buf),
        n => return Err(Error::InvalidKeySize(n)),
    }
    Ok(())
}

/// Encrypt a payload under a symmetric key
///
/// Generates a fresh random 16-byte IV, runs the plaintext through
/// AES-CFB seeded by `(key, IV)`, and returns `IV || ciphertext`.
/// Stateless: no key material is retained across calls.
///
/// ## Errors
///
/// - [`Error::InvalidKeySize`] if `key` is not 16, 24, or 32 bytes
/// - [`Error::IvGeneration`] if the random source cannot supply entropy
///   (recoverable; callers may retry)
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    check_key_size(key)?;

    let mut out = vec![0u8; BLOCK_SIZE + plaintext.len()];
    let (iv, body) = out.split_at_mut(BLOCK_SIZE);

    OsRng.try_fill_bytes(iv).map_err(|_| Error::IvGeneration)?;

    body.copy_from_slice(plaintext);
    cfb_encrypt(key, iv, body)?;

    Ok(out)
}

/// Decrypt an IV-prefixed ciphertext under a symmetric key
///
/// Splits off the leading 16-byte IV and runs the remainder through the
/// inverse CFB transform. A pure function of its inputs: the correct key
/// always recovers the exact original plaintext, while a wrong key yields
/// garbage of the same length (see the module-level integrity note).
///
/// ## Errors
///
/// - [`Error::ShortCiphertext`] if the input cannot contain a full IV
/// - [`Error::InvalidKeySize`] if `key` is not 16, 24, or 32 bytes
pub fn decrypt(ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.len() < BLOCK_SIZE {
        tracing::warn!(len = ciphertext.len(), "rejected short ciphertext");
        return Err(Error::ShortCiphertext(ciphertext.len()));
    }
    check_key_size(key)?;

    let (iv, body) = ciphertext.split_at(BLOCK_SIZE);
    let mut out = body.to_vec();
    cfb_decrypt(key, iv, &mut out)?;

    Ok(out)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_key_sizes() {
        let plaintext = b"The quick brown fox jumps over the lazy dog";

        for size in SUPPORTED_KEY_SIZES {
            let key = vec![0x42u8; size];
            let ciphertext = encrypt(plaintext, &key).unwrap();
            let recovered = decrypt(&ciphertext, &key).unwrap();

            assert_eq!(recovered, plaintext);
        }
    }

    #[test]
    fn test_round_trip_empty_plaintext() {
        let key = [0x42u8; 32];

        let ciphertext = encrypt(b"", &key).unwrap();
        assert_eq!(ciphertext.len(), BLOCK_SIZE);

        let recovered = decrypt(&ciphertext, &key).unwrap();
        assert!(recovered.is_empty());
    }

    #[test]
    fn test_ciphertext_length_is_iv_plus_plaintext() {
        let key = [0x42u8; 16];

        for len in [0, 1, 15, 16, 17, 1000] {
            let plaintext = vec![0xABu8; len];
            let ciphertext = encrypt(&plaintext, &key).unwrap();
            assert_eq!(ciphertext.len(), BLOCK_SIZE + len);
        }
    }

    #[test]
    fn test_same_inputs_produce_different_ciphertexts() {
        // Fresh IVs mean identical (plaintext, key) pairs never collide
        let key = [0x42u8; 32];
        let plaintext = b"same message";

        let ct1 = encrypt(plaintext, &key).unwrap();
        let ct2 = encrypt(plaintext, &key).unwrap();

        assert_ne!(ct1, ct2);
        assert_ne!(ct1[..BLOCK_SIZE], ct2[..BLOCK_SIZE]);
    }

    #[test]
    fn test_invalid_key_sizes_rejected() {
        for size in [0usize, 1, 15, 17, 33] {
            let key = vec![0u8; size];

            let err = encrypt(b"payload", &key).unwrap_err();
            assert!(matches!(err, Error::InvalidKeySize(n) if n == size));

            let err = decrypt(&[0u8; 32], &key).unwrap_err();
            assert!(matches!(err, Error::InvalidKeySize(n) if n == size));
        }
    }

    #[test]
    fn test_short_ciphertext_rejected() {
        let key = [0x42u8; 32];

        for len in [0usize, 1, 10, 15] {
            let short = vec![0u8; len];
            let err = decrypt(&short, &key).unwrap_err();
            assert!(matches!(err, Error::ShortCiphertext(n) if n == len));
        }
    }

    #[test]
    fn test_wrong_key_yields_garbage_not_error() {
        let key = [0x11u8; 32];
        let wrong_key = [0x22u8; 32];
        let plaintext = b"confidential but unauthenticated";

        let ciphertext = encrypt(plaintext, &key).unwrap();
        let garbage = decrypt(&ciphertext, &wrong_key).unwrap();

        assert_eq!(garbage.len(), plaintext.len());
        assert_ne!(garbage, plaintext);
    }

    #[test]
    fn test_symmetric_key_validates_length() {
        assert!(SymmetricKey::from_bytes(vec![0u8; 16]).is_ok());
        assert!(SymmetricKey::from_bytes(vec![0u8; 24]).is_ok());
        assert!(SymmetricKey::from_bytes(vec![0u8; 32]).is_ok());

        for size in [0usize, 15, 17, 33, 64] {
            assert!(matches!(
                SymmetricKey::from_bytes(vec![0u8; size]),
                Err(Error::InvalidKeySize(n)) if n == size
            ));
        }
    }

    #[test]
    fn test_symmetric_key_debug_redacts_material() {
        let key = SymmetricKey::from_bytes(vec![0xAAu8; 32]).unwrap();
        let rendered = format!("{:?}", key);

        assert_eq!(rendered, "SymmetricKey(32 bytes)");
        assert!(!rendered.contains("aa"));
    }
}
