//! Random salts and secret identifiers
//!
//! Both draw from the operating system CSPRNG. Nothing here is time- or
//! counter-based, so ids carry no information about creation order.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;

use crate::models::SecretId;

use super::key_derivation::{Salt, SALT_SIZE};

/// Generate a fresh 16-byte salt
pub fn generate_salt() -> Salt {
    let mut bytes = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut bytes);
    Salt::from_bytes(bytes)
}

/// Generate a fresh 128-bit secret identifier
pub fn generate_id() -> SecretId {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    SecretId::from_bytes(bytes)
}
