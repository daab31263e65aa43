//! Cryptographic envelope for secret-drop
//!
//! Provides PBKDF2-HMAC-SHA256 key derivation, AES-256-GCM authenticated
//! encryption, and random salts and identifiers. Everything here is
//! stateless.

pub mod encryption;
pub mod key_derivation;
pub mod random;
pub mod secure_memory;

pub use encryption::{decrypt, decrypt_string, encrypt, encrypt_string, ENVELOPE_OVERHEAD};
pub use key_derivation::{derive_key, DerivedKey, KeyDerivationParams, Salt, SALT_SIZE};
pub use random::{generate_id, generate_salt};
pub use secure_memory::SecureString;
