//! Custom error types for secret-drop
//!
//! This module defines the error hierarchy for the library using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for secret-drop operations
#[derive(Error, Debug)]
pub enum SecretDropError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Input rejected before anything was persisted
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage backend errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Cipher setup errors that are not authentication failures
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Ciphertext did not authenticate under the key, or was malformed
    #[error("Authentication failed: invalid key or corrupted data")]
    Authentication,

    /// The secret is absent, expired or already consumed.
    ///
    /// Deliberately carries no identifier.
    #[error("Secret not found")]
    NotFound,

    /// The secret existed and has been consumed, but the passphrase was wrong
    #[error("Wrong passphrase")]
    WrongPassphrase,
}

impl SecretDropError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Check if this is a wrong passphrase error
    pub fn is_wrong_passphrase(&self) -> bool {
        matches!(self, Self::WrongPassphrase)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type alias for secret-drop operations
pub type SecretDropResult<T> = Result<T, SecretDropError>;
