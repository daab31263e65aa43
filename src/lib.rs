//! secret-drop - one-time, passphrase-protected secrets
//!
//! A sender stores a short message under a passphrase; a recipient can read
//! it exactly once before it expires. Only ciphertext and salt are ever
//! persisted. The passphrase and the key derived from it exist only for the
//! duration of a single call.
//!
//! # Architecture
//!
//! - `crypto`: key derivation, authenticated encryption, random salts and ids
//! - `models`: the `Secret` entity and its identifier
//! - `storage`: the `SecretStorage` contract and its file and memory backends
//! - `services`: `SecretService`, the create/consume lifecycle
//! - `config`: paths and immutable settings
//! - `error`: the crate error type
//! - `cli`: command handlers for the `secretdrop` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use secretdrop::config::Settings;
//! use secretdrop::services::SecretService;
//! use secretdrop::storage::MemorySecretStore;
//!
//! let service = SecretService::new(MemorySecretStore::new(), Settings::default())?;
//! let id = service.create("db-password-xyz", "correct-horse-battery-staple")?;
//! let plaintext = service.consume(&id, "correct-horse-battery-staple")?;
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{SecretDropError, SecretDropResult};
