//! # Pipeline Demo
//!
//! Demonstrates the full key-agreement-and-cipher pipeline between two
//! parties.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example pipeline_demo
//! ```

use sable_core::crypto::{confirm_agreement, decrypt, derive_key, encrypt, KeyPair};
use sable_core::Message;

fn main() -> sable_core::Result<()> {
    println!("=== Sable Core: Key Agreement + Encryption Demo ===\n");

    // Step 1: Create two parties (Alice and Bob)
    println!("Step 1: Generating P-256 key pairs for Alice and Bob...");
    let alice = KeyPair::generate()?;
    let bob = KeyPair::generate()?;

    println!(
        "  Alice's public key: {}...",
        hex::encode(&alice.public_bytes()[..8])
    );
    println!(
        "  Bob's public key: {}...",
        hex::encode(&bob.public_bytes()[..8])
    );
    println!();

    // Step 2: Both sides compute the shared secret
    println!("Step 2: Computing shared secrets (ECDH)...");
    let alice_secret = alice.diffie_hellman(&bob.public_bytes())?;
    let bob_secret = bob.diffie_hellman(&alice.public_bytes())?;
    confirm_agreement(&alice_secret, &bob_secret)?;
    println!("  Both sides agree on the same secret.");
    println!();

    // Step 3: Derive the symmetric key (never use the raw secret directly)
    println!("Step 3: Deriving a 32-byte AES key (SHA-256)...");
    let key = derive_key(&alice_secret, 32)?;
    println!();

    // Step 4: Encrypt, wrap in an envelope, decrypt
    println!("Step 4: Encrypting a message...");
    let plaintext = "This is a test message";
    let ciphertext = encrypt(plaintext.as_bytes(), key.as_bytes())?;

    let envelope = Message::new("alice", "bob", &ciphertext)?;
    println!("  Envelope JSON: {}", envelope.to_json()?);

    let recovered = decrypt(&envelope.ciphertext()?, key.as_bytes())?;
    println!(
        "  Decrypted: {}",
        String::from_utf8(recovered).expect("plaintext was valid UTF-8")
    );

    Ok(())
}
