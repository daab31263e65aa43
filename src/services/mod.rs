//! Service layer for secret-drop
//!
//! The service layer owns the secret lifecycle on top of the storage layer:
//! validation, encryption, expiry and single-read consumption.

pub mod secret;

pub use secret::{Clock, CreatedSecret, SecretService, SystemClock};
