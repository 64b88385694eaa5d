//! # Cryptography Module
//!
//! This module provides the key-agreement-and-cipher pipeline used by
//! Sable Core.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    ENCRYPTION PIPELINE                                  │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  1. Key Agreement: P-256 ECDH                                           │
//! │     Alice's Private × Bob's Public = Shared Secret (x coordinate)       │
//! │                                                                         │
//! │  2. Key Derivation: SHA-256                                             │
//! │     Shared Secret → Symmetric Key (16 / 24 / 32 bytes)                  │
//! │                                                                         │
//! │  3. Encryption: AES-CFB                                                 │
//! │     • AES-128/192/256 selected by key length                            │
//! │     • 128-bit IV (random per message, prepended)                        │
//! │     • stream transform, ciphertext length = plaintext length            │
//! │                                                                         │
//! │  Output = IV || CFB(key, IV, plaintext)                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm Choices & Rationale
//!
//! | Algorithm | Purpose | Why Chosen |
//! |-----------|---------|------------|
//! | P-256 | Key Agreement | Interoperable named curve, compressed SEC1 wire format |
//! | SHA-256 | Key Derivation | One-way reduction of the raw DH output |
//! | AES-CFB | Encryption | Stream mode, no padding, IV-prefixed wire format |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: shared secrets and symmetric keys are zeroized
//!    when dropped
//! 2. **Peer Validation**: peer public keys are verified on-curve before
//!    any scalar multiplication
//! 3. **Secure Random**: `rand::rngs::OsRng` supplies scalars and IVs
//! 4. **No IV Reuse**: a fresh IV for every encryption call
//!
//! Every operation here is a stateless, single-shot function over its
//! explicit inputs; there is no session object persisting across calls,
//! and concurrent invocations need no external synchronization.

mod cipher;
mod kdf;
mod keys;

pub use cipher::{decrypt, encrypt, SymmetricKey, BLOCK_SIZE, SUPPORTED_KEY_SIZES};
pub use kdf::{derive_key, SUPPORTED_KEY_LENGTHS};
pub use keys::{
    confirm_agreement, decode_public_key, KeyPair, SharedSecret, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE,
    SHARED_SECRET_SIZE,
};

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_pipeline_round_trip() {
        // Agreement → derivation → encrypt on one side, decrypt on the other
        let alice = KeyPair::generate().unwrap();
        let bob = KeyPair::generate().unwrap();

        let alice_secret = alice.diffie_hellman(&bob.public_bytes()).unwrap();
        let bob_secret = bob.diffie_hellman(&alice.public_bytes()).unwrap();
        confirm_agreement(&alice_secret, &bob_secret).unwrap();

        let plaintext = b"This is a test message";

        for len in SUPPORTED_KEY_LENGTHS {
            let alice_key = derive_key(&alice_secret, len).unwrap();
            let bob_key = derive_key(&bob_secret, len).unwrap();
            assert_eq!(alice_key.as_bytes(), bob_key.as_bytes());

            let ciphertext = encrypt(plaintext, alice_key.as_bytes()).unwrap();
            let recovered = decrypt(&ciphertext, bob_key.as_bytes()).unwrap();
            assert_eq!(recovered, plaintext);
        }
    }

    #[test]
    fn test_derived_keys_differ_from_raw_secret() {
        // The raw DH output must never double as the cipher key
        let alice = KeyPair::generate().unwrap();
        let bob = KeyPair::generate().unwrap();

        let secret = alice.diffie_hellman(&bob.public_bytes()).unwrap();
        let key = derive_key(&secret, 32).unwrap();

        assert_ne!(key.as_bytes(), &secret.as_bytes()[..]);
    }
}
