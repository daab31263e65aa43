//! Key derivation using PBKDF2-HMAC-SHA256
//!
//! Derives encryption keys from user passphrases and a per-secret salt.
//! The iteration count is deliberately high so that offline guessing against
//! a stolen ciphertext and salt stays expensive.

use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{SecretDropError, SecretDropResult};
use crate::models::encoding;

/// Size of a per-secret salt in bytes
pub const SALT_SIZE: usize = 16;

/// Size of a derived key in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// Default PBKDF2 iteration count
pub const DEFAULT_ITERATIONS: u32 = 600_000;

/// Parameters for key derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDerivationParams {
    /// PBKDF2 iteration count
    pub iterations: u32,
}

impl Default for KeyDerivationParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl KeyDerivationParams {
    /// Create params with a specific iteration count
    pub fn with_iterations(iterations: u32) -> Self {
        Self { iterations }
    }
}

/// Random per-secret salt. Not secret, stored next to the ciphertext.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Salt(#[serde(with = "encoding::base64_array")] [u8; SALT_SIZE]);

impl Salt {
    /// Wrap raw salt bytes
    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the salt bytes
    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Salt").field("len", &SALT_SIZE).finish()
    }
}

/// A derived encryption key, wiped from memory when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    /// The 32-byte key for AES-256
    key: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

/// Derive an encryption key from a passphrase and salt
///
/// Deterministic: the same passphrase, salt and params always give the same key.
pub fn derive_key(
    passphrase: &str,
    salt: &Salt,
    params: &KeyDerivationParams,
) -> SecretDropResult<DerivedKey> {
    if params.iterations == 0 {
        return Err(SecretDropError::Config(
            "Key derivation iterations must be non-zero".to_string(),
        ));
    }

    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt.as_bytes(), params.iterations, &mut key);

    Ok(DerivedKey { key })
}
