//! # Sable Core
//!
//! A secure-messaging core: elliptic-curve Diffie-Hellman key agreement,
//! hash-based key derivation, and stream-cipher message encryption, plus
//! the envelope and persistence plumbing around them.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SABLE CORE MODULES                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────┐              │
//! │  │                    Crypto (the core)                 │              │
//! │  │                                                      │              │
//! │  │  keys: P-256 ECDH ──► kdf: SHA-256 ──► cipher: CFB   │              │
//! │  └──────────────────────────┬───────────────────────────┘              │
//! │                             │ ciphertext (opaque blob)                  │
//! │                             ▼                                           │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐                     │
//! │  │   Message   │  │   Storage   │  │   Config    │                     │
//! │  │  (envelope, │  │  (SQLite)   │  │  (env vars) │                     │
//! │  │    JSON)    │  │             │  │             │                     │
//! │  └─────────────┘  └─────────────┘  └─────────────┘                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types for the entire library
//! - [`crypto`] - The pipeline: key agreement, derivation, cipher
//! - [`message`] - Message envelope (validated construction, JSON)
//! - [`storage`] - SQLite persistence of envelopes
//! - [`config`] - Environment-derived process configuration
//!
//! ## Concurrency Model
//!
//! Every crypto operation is a stateless, synchronous function over its
//! explicit inputs. There is no session object and no library-global
//! state, so concurrent calls need no synchronization beyond what the OS
//! random source already provides. Drawing randomness may block briefly
//! when system entropy is scarce; those failures surface as recoverable
//! errors rather than panics.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod config;
pub mod crypto;
pub mod error;
pub mod message;
pub mod storage;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use config::Config;
pub use crypto::{KeyPair, SharedSecret, SymmetricKey};
pub use error::{Error, Result};
pub use message::Message;
pub use storage::Database;
