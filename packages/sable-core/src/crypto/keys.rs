//! # Key Agreement
//!
//! NIST P-256 key pairs and Elliptic-Curve Diffie-Hellman shared secrets.
//!
//! ## Key Exchange Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ECDH KEY AGREEMENT                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   Alice                                  Bob                            │
//! │     │                                     │                             │
//! │     │──── Alice's Public Key (33 B) ─────►│                             │
//! │     │                                     │                             │
//! │     │◄──── Bob's Public Key (33 B) ───────│                             │
//! │     │                                     │                             │
//! │     ▼                                     ▼                             │
//! │  alice_private × bob_public          bob_private × alice_public         │
//! │     │                                     │                             │
//! │     └──────────────┐       ┌──────────────┘                             │
//! │                    ▼       ▼                                            │
//! │               ┌─────────────────┐                                       │
//! │               │  SAME SHARED    │  (x-coordinate, 32 bytes)             │
//! │               │     SECRET      │                                       │
//! │               └─────────────────┘                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//!
//! Public keys travel as compressed SEC1 points: a 1-byte parity prefix
//! (`0x02` or `0x03`) followed by the 32-byte x coordinate. The format must
//! be preserved exactly for interoperability with peer implementations.
//!
//! ## Security Considerations
//!
//! 1. **Peer key validation**: every peer key is decoded and checked against
//!    the curve equation before any scalar multiplication. Skipping this
//!    check permits invalid-curve attacks that leak private scalar bits.
//! 2. **Secure random**: private scalars come from `rand::rngs::OsRng`,
//!    drawn uniformly from `[1, n-1]` by rejection sampling.
//! 3. **Zeroization**: shared secrets are zeroized when dropped; the private
//!    scalar zeroizes itself inside `p256::SecretKey`.
//! 4. **Raw output is not a key**: the shared secret must pass through
//!    [`crate::crypto::derive_key`] before keying a cipher.

use std::fmt;

use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{PublicKey, SecretKey};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::error::{Error, Result};

/// Size of a compressed SEC1 public key in bytes (parity prefix + x coordinate)
pub const PUBLIC_KEY_SIZE: usize = 33;

/// Size of a private scalar in bytes
pub const SECRET_KEY_SIZE: usize = 32;

/// Size of the ECDH shared secret in bytes (x coordinate of the product point)
pub const SHARED_SECRET_SIZE: usize = 32;

/// A P-256 key pair for ECDH key agreement
///
/// ## Security
///
/// - The private scalar is zeroized when this struct is dropped
/// - The private half must never be transmitted or logged
/// - The public half can be safely shared with anyone
#[derive(ZeroizeOnDrop)]
pub struct KeyPair {
    /// Private scalar (secret)
    #[zeroize(skip)] // p256::SecretKey handles its own zeroization
    secret: SecretKey,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair").field("secret", &"<redacted>").finish()
    }
}

impl KeyPair {
    /// Generate a new random key pair
    ///
    /// Draws the private scalar uniformly from `[1, n-1]` using the
    /// operating system's secure random number generator. Candidate bytes
    /// equal to zero or not below the group order are rejected and redrawn.
    ///
    /// ## Errors
    ///
    /// Returns [`Error::KeyGeneration`] if the random source cannot supply
    /// entropy. This is a recoverable condition; callers may retry.
    pub fn generate() -> Result<Self> {
        let mut candidate = Zeroizing::new([0u8; SECRET_KEY_SIZE]);
        loop {
            OsRng
                .try_fill_bytes(&mut candidate[..])
                .map_err(|_| Error::KeyGeneration)?;

            // from_slice rejects zero and values >= the group order, so
            // accepted scalars are uniform over [1, n-1].
            if let Ok(secret) = SecretKey::from_slice(&candidate[..]) {
                return Ok(Self { secret });
            }
        }
    }

    /// Reconstruct a key pair from stored private-scalar bytes
    ///
    /// The inverse of [`KeyPair::secret_bytes`]. The public key is
    /// recomputed from the scalar, so only the private half needs storing.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        let secret = SecretKey::from_slice(bytes)
            .map_err(|_| Error::InvalidKey("private scalar out of range for P-256".into()))?;
        Ok(Self { secret })
    }

    /// Get the private scalar bytes (for secure storage only)
    ///
    /// ## Security Warning
    ///
    /// Only use this for secure storage. Never log or transmit these bytes.
    /// The returned buffer zeroizes itself when dropped.
    pub fn secret_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_SIZE]> {
        let mut out = Zeroizing::new([0u8; SECRET_KEY_SIZE]);
        out.copy_from_slice(&self.secret.to_bytes());
        out
    }

    /// Get the public key in compressed SEC1 encoding (33 bytes)
    ///
    /// This is the wire format shared with peers.
    pub fn public_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        let point = self.secret.public_key().to_encoded_point(true);
        let mut out = [0u8; PUBLIC_KEY_SIZE];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Compute the ECDH shared secret with a peer's encoded public key
    ///
    /// Decodes and validates the peer point, then multiplies it by our
    /// private scalar. The secret is the x coordinate of the product point,
    /// so both sides arrive at bit-identical bytes:
    ///
    /// - Alice: `alice_private × bob_public`
    /// - Bob: `bob_private × alice_public`
    ///
    /// ## Errors
    ///
    /// Returns [`Error::InvalidPeerKey`] if the peer bytes do not decode to
    /// a point on the P-256 curve. No scalar multiplication is performed in
    /// that case.
    pub fn diffie_hellman(&self, peer_public: &[u8]) -> Result<SharedSecret> {
        let peer = decode_public_key(peer_public)?;

        // Scalar multiplication of the validated peer point by our scalar;
        // the secret is the x coordinate of the product
        let product = peer.to_projective() * *self.secret.to_nonzero_scalar();
        let point = product.to_affine().to_encoded_point(false);
        let x = point
            .x()
            .ok_or_else(|| Error::InvalidPeerKey("scalar product is the identity point".into()))?;

        let mut bytes = [0u8; SHARED_SECRET_SIZE];
        bytes.copy_from_slice(x);
        Ok(SharedSecret { bytes })
    }
}

/// Decode and validate a peer public key from SEC1 bytes
///
/// Accepts the compressed wire format (33 bytes) as well as uncompressed
/// SEC1 points. The decoded point is verified to lie on the P-256 curve;
/// the identity point and malformed encodings are rejected.
pub fn decode_public_key(bytes: &[u8]) -> Result<PublicKey> {
    PublicKey::from_sec1_bytes(bytes).map_err(|_| {
        tracing::warn!(len = bytes.len(), "rejected peer public key");
        Error::InvalidPeerKey("not a valid point on the P-256 curve".into())
    })
}

/// An ECDH shared secret
///
/// Ephemeral by design: it exists only to feed key derivation and is
/// zeroized when dropped. Never use these bytes directly as a cipher key.
#[derive(ZeroizeOnDrop)]
pub struct SharedSecret {
    bytes: [u8; SHARED_SECRET_SIZE],
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSecret").field("bytes", &"<redacted>").finish()
    }
}

impl SharedSecret {
    /// Create from raw x-coordinate bytes
    ///
    /// For shared secrets produced by a prior [`KeyPair::diffie_hellman`]
    /// call and held in caller-managed storage.
    pub fn from_bytes(bytes: [u8; SHARED_SECRET_SIZE]) -> Self {
        Self { bytes }
    }

    /// Get the raw bytes (for key derivation)
    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.bytes
    }
}

/// Confirm that two independently computed shared secrets agree
///
/// For any two key pairs, `dh(priv_a, pub_b)` and `dh(priv_b, pub_a)` must
/// be byte-identical. A mismatch means one side computed with the wrong
/// key material or a defective implementation.
///
/// ## Errors
///
/// Returns [`Error::SecretMismatch`], a fatal (non-retryable) condition.
pub fn confirm_agreement(ours: &SharedSecret, theirs: &SharedSecret) -> Result<()> {
    if ours.bytes != theirs.bytes {
        return Err(Error::SecretMismatch);
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// P-256 generator point, uncompressed SEC1 (sanity anchor for the
    /// rejection tests below).
    const GENERATOR_UNCOMPRESSED: &str = "046b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c2964fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5";

    #[test]
    fn test_generate_distinct_keypairs() {
        let a = KeyPair::generate().unwrap();
        let b = KeyPair::generate().unwrap();

        assert_ne!(a.public_bytes(), b.public_bytes());
        assert_ne!(*a.secret_bytes(), *b.secret_bytes());
    }

    #[test]
    fn test_public_key_is_compressed_sec1() {
        let pair = KeyPair::generate().unwrap();
        let public = pair.public_bytes();

        assert_eq!(public.len(), PUBLIC_KEY_SIZE);
        // Compressed SEC1 points carry the y parity in the first byte
        assert!(public[0] == 0x02 || public[0] == 0x03);
    }

    #[test]
    fn test_agreement_symmetry() {
        // Fresh pair-of-pairs each round; both directions must agree
        for _ in 0..16 {
            let alice = KeyPair::generate().unwrap();
            let bob = KeyPair::generate().unwrap();

            let alice_secret = alice.diffie_hellman(&bob.public_bytes()).unwrap();
            let bob_secret = bob.diffie_hellman(&alice.public_bytes()).unwrap();

            assert_eq!(alice_secret.as_bytes(), bob_secret.as_bytes());
            confirm_agreement(&alice_secret, &bob_secret).unwrap();
        }
    }

    #[test]
    fn test_mismatched_secrets_are_fatal() {
        let alice = KeyPair::generate().unwrap();
        let bob = KeyPair::generate().unwrap();
        let carol = KeyPair::generate().unwrap();

        // Alice agrees with Bob, Carol agrees with Bob: different secrets
        let ab = alice.diffie_hellman(&bob.public_bytes()).unwrap();
        let cb = carol.diffie_hellman(&bob.public_bytes()).unwrap();

        let err = confirm_agreement(&ab, &cb).unwrap_err();
        assert!(matches!(err, Error::SecretMismatch));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_secret_bytes_round_trip() {
        let pair = KeyPair::generate().unwrap();
        let restored = KeyPair::from_secret_bytes(&pair.secret_bytes()[..]).unwrap();

        assert_eq!(pair.public_bytes(), restored.public_bytes());
    }

    #[test]
    fn test_from_secret_bytes_rejects_zero_scalar() {
        let err = KeyPair::from_secret_bytes(&[0u8; SECRET_KEY_SIZE]).unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    #[test]
    fn test_generator_point_decodes() {
        let bytes = hex::decode(GENERATOR_UNCOMPRESSED).unwrap();
        assert!(decode_public_key(&bytes).is_ok());
    }

    #[test]
    fn test_off_curve_point_rejected() {
        // Generator with the last y byte flipped: fails the curve equation
        let mut bytes = hex::decode(GENERATOR_UNCOMPRESSED).unwrap();
        *bytes.last_mut().unwrap() ^= 0x01;

        let pair = KeyPair::generate().unwrap();
        let err = pair.diffie_hellman(&bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidPeerKey(_)));
    }

    #[test]
    fn test_x_coordinate_beyond_field_modulus_rejected() {
        // x = p (the field modulus) is not a valid field element
        let bytes = hex::decode(
            "03ffffffff00000001000000000000000000000000ffffffffffffffffffffffff",
        )
        .unwrap();

        let pair = KeyPair::generate().unwrap();
        assert!(matches!(
            pair.diffie_hellman(&bytes),
            Err(Error::InvalidPeerKey(_))
        ));
    }

    #[test]
    fn test_malformed_encodings_rejected() {
        let pair = KeyPair::generate().unwrap();

        // Identity encoding, truncated input, empty input
        for bad in [&[0u8][..], &[0x02u8; 17][..], &[][..]] {
            assert!(matches!(
                pair.diffie_hellman(bad),
                Err(Error::InvalidPeerKey(_))
            ));
        }
    }

    #[test]
    fn test_shared_secret_from_bytes_round_trip() {
        let alice = KeyPair::generate().unwrap();
        let bob = KeyPair::generate().unwrap();

        let secret = alice.diffie_hellman(&bob.public_bytes()).unwrap();
        let reloaded = SharedSecret::from_bytes(*secret.as_bytes());

        confirm_agreement(&secret, &reloaded).unwrap();
    }
}
