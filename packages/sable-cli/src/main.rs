//! Sable CLI
//!
//! Runs the full messaging pipeline once, end to end:
//!
//! 1. Generate P-256 key pairs for the sender and receiver.
//! 2. Compute both shared secrets and confirm they agree.
//! 3. Derive a symmetric key — unless a pre-shared key is supplied via
//!    `SABLE_PRESHARED_KEY`, which bypasses ECDH entirely.
//! 4. Encrypt the message, wrap it in an envelope, persist it.
//! 5. Read the envelope back and decrypt it.
//!
//! **Privacy**: private scalars and derived keys never reach the log
//! output — only public keys and ciphertext lengths are printed.

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use tracing::info;

use sable_core::crypto::{confirm_agreement, decrypt, derive_key, encrypt, KeyPair};
use sable_core::{Config, Database, Message};

// ── CLI Arguments ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "sable", version, about = "Sable secure messaging pipeline demo")]
struct Args {
    /// Message text to encrypt
    #[arg(short, long, default_value = "This is a test message")]
    message: String,

    /// Sender identifier
    #[arg(long, default_value = "alice")]
    sender: String,

    /// Receiver identifier
    #[arg(long, default_value = "bob")]
    receiver: String,

    /// Derived key length in bytes (16, 24, or 32)
    #[arg(long, default_value_t = 32, env = "SABLE_KEY_LENGTH")]
    key_length: usize,
}

// ── Entry Point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sable=info,sable_core=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    // Key agreement: both sides compute the secret independently
    let sender_pair = KeyPair::generate()?;
    let receiver_pair = KeyPair::generate()?;

    info!(
        sender_public = %hex::encode(sender_pair.public_bytes()),
        receiver_public = %hex::encode(receiver_pair.public_bytes()),
        "generated key pairs"
    );

    let sender_secret = sender_pair.diffie_hellman(&receiver_pair.public_bytes())?;
    let receiver_secret = receiver_pair.diffie_hellman(&sender_pair.public_bytes())?;

    // A mismatch here is an implementation defect, never transient
    confirm_agreement(&sender_secret, &receiver_secret)?;
    info!("shared secrets agree");

    // Key material: an operator-supplied pre-shared key wins over ECDH
    let key = match config.preshared_key {
        Some(key) => {
            info!(len = key.as_bytes().len(), "using pre-shared key from environment");
            key
        }
        None => derive_key(&sender_secret, args.key_length)?,
    };

    // Encrypt and wrap
    let ciphertext = encrypt(args.message.as_bytes(), key.as_bytes())?;
    info!(len = ciphertext.len(), "encrypted message");

    let envelope = Message::new(args.sender.as_str(), args.receiver.as_str(), &ciphertext)?;
    println!("{}", envelope.to_json()?);

    // Persist, read back, decrypt with the receiver's copy of the key
    let db = Database::open(config.database.path.as_deref())?;
    let id = db.insert_message(&envelope)?;
    info!(id, "stored envelope");

    let stored = db
        .message(id)?
        .ok_or_else(|| eyre!("stored message {id} not found"))?
        .into_message()?;

    let recovered = decrypt(&stored.ciphertext()?, key.as_bytes())?;
    println!("{}", String::from_utf8(recovered)?);

    Ok(())
}
