//! Core data models for secret-drop

pub mod encoding;
pub mod ids;
pub mod secret;

pub use ids::{InvalidSecretId, SecretId};
pub use secret::{SealedSecret, Secret};
