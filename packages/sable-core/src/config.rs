//! # Configuration
//!
//! Process configuration loaded from environment variables.
//!
//! Configuration is read once and passed around as plain values; nothing
//! here installs global state. Two knobs exist:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `SABLE_DB_PATH` | Database file path (in-memory when unset) |
//! | `SABLE_PRESHARED_KEY` | Hex-encoded symmetric key that bypasses ECDH |
//!
//! A pre-shared key must decode to a supported cipher strength (16, 24,
//! or 32 bytes); its provenance is otherwise up to the operator.

use std::env;

use crate::crypto::SymmetricKey;
use crate::error::{Error, Result};

/// Environment variable naming the database file path
pub const ENV_DB_PATH: &str = "SABLE_DB_PATH";

/// Environment variable carrying a hex-encoded pre-shared symmetric key
pub const ENV_PRESHARED_KEY: &str = "SABLE_PRESHARED_KEY";

/// Database configuration
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// Path to the database file; `None` selects an in-memory database
    pub path: Option<String>,
}

/// Process configuration loaded from the environment
pub struct Config {
    /// Where messages are persisted
    pub database: DatabaseConfig,
    /// Optional externally supplied symmetric key (bypasses ECDH)
    pub preshared_key: Option<SymmetricKey>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// ## Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a pre-shared key is present but
    /// not valid hex, or [`Error::InvalidKeySize`] if it decodes to an
    /// unsupported length.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database: DatabaseConfig {
                path: env::var(ENV_DB_PATH).ok(),
            },
            preshared_key: parse_preshared_key(env::var(ENV_PRESHARED_KEY).ok())?,
        })
    }
}

/// Parse an optional hex-encoded pre-shared key
fn parse_preshared_key(raw: Option<String>) -> Result<Option<SymmetricKey>> {
    match raw {
        None => Ok(None),
        Some(s) => {
            let bytes = hex::decode(s.trim()).map_err(|e| {
                Error::InvalidConfig(format!("{} is not valid hex: {}", ENV_PRESHARED_KEY, e))
            })?;
            SymmetricKey::from_bytes(bytes).map(Some)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
