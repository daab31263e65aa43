//! AES-256-GCM encryption/decryption
//!
//! Produces a self-contained envelope that carries everything needed to
//! decrypt it again apart from the key:
//!
//! ```text
//! version (1) || nonce (12) || ciphertext || tag (16)
//! ```
//!
//! Each encryption operation generates a unique nonce.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

use crate::error::{SecretDropError, SecretDropResult};

use super::secure_memory::SecureString;
use super::DerivedKey;

/// Current envelope format version
const ENVELOPE_VERSION: u8 = 1;

/// Size of the AES-GCM nonce in bytes (96 bits)
const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes
const TAG_SIZE: usize = 16;

/// Fixed bytes added to every plaintext
pub const ENVELOPE_OVERHEAD: usize = 1 + NONCE_SIZE + TAG_SIZE;

fn cipher_for(key: &DerivedKey) -> SecretDropResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| SecretDropError::Encryption(format!("Failed to create cipher: {}", e)))
}

/// Encrypt plaintext data using AES-256-GCM
pub fn encrypt(plaintext: &[u8], key: &DerivedKey) -> SecretDropResult<Vec<u8>> {
    let cipher = cipher_for(key)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let sealed = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| SecretDropError::Encryption(format!("Encryption failed: {}", e)))?;

    let mut envelope = Vec::with_capacity(1 + NONCE_SIZE + sealed.len());
    envelope.push(ENVELOPE_VERSION);
    envelope.extend_from_slice(&nonce_bytes);
    envelope.extend_from_slice(&sealed);
    Ok(envelope)
}

/// Decrypt an envelope produced by [`encrypt`]
///
/// All-or-nothing: a wrong key, tampered bytes, an unknown version or a
/// truncated envelope all fail with [`SecretDropError::Authentication`].
pub fn decrypt(envelope: &[u8], key: &DerivedKey) -> SecretDropResult<Vec<u8>> {
    if envelope.len() < ENVELOPE_OVERHEAD {
        return Err(SecretDropError::Authentication);
    }

    let (version, rest) = envelope.split_at(1);
    if version[0] != ENVELOPE_VERSION {
        return Err(SecretDropError::Authentication);
    }

    let (nonce_bytes, sealed) = rest.split_at(NONCE_SIZE);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = cipher_for(key)?;
    cipher
        .decrypt(nonce, sealed)
        .map_err(|_| SecretDropError::Authentication)
}

/// Encrypt a string
pub fn encrypt_string(plaintext: &str, key: &DerivedKey) -> SecretDropResult<Vec<u8>> {
    encrypt(plaintext.as_bytes(), key)
}

/// Decrypt to a string
pub fn decrypt_string(envelope: &[u8], key: &DerivedKey) -> SecretDropResult<SecureString> {
    let plaintext = decrypt(envelope, key)?;
    String::from_utf8(plaintext)
        .map(SecureString::from)
        .map_err(|_| SecretDropError::Authentication)
}
