//! Secret model
//!
//! The only persisted entity: an encrypted message, its salt and its
//! lifetime. The passphrase and derived key are never part of it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::encoding;
use super::ids::SecretId;
use crate::crypto::{KeyDerivationParams, Salt};
use crate::error::{SecretDropError, SecretDropResult};

/// A stored, encrypted one-time secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    /// Public lookup key
    pub id: SecretId,

    /// Encrypted envelope (version, nonce, ciphertext and tag)
    #[serde(with = "encoding::base64_bytes")]
    pub ciphertext: Vec<u8>,

    /// Per-secret key derivation salt
    pub salt: Salt,

    /// Key derivation parameters the secret was sealed with
    #[serde(default)]
    pub kdf: KeyDerivationParams,

    /// When the secret was created
    pub created_at: DateTime<Utc>,

    /// First instant at which the secret is treated as gone
    pub expires_at: DateTime<Utc>,
}

impl Secret {
    /// Create a new secret that lives for `ttl` from `created_at`
    pub fn new(
        id: SecretId,
        ciphertext: Vec<u8>,
        salt: Salt,
        kdf: KeyDerivationParams,
        created_at: DateTime<Utc>,
        ttl: Duration,
    ) -> SecretDropResult<Self> {
        let expires_at = created_at.checked_add_signed(ttl).ok_or_else(|| {
            SecretDropError::Validation(format!(
                "Lifetime of {} seconds is out of range",
                ttl.num_seconds()
            ))
        })?;

        Ok(Self {
            id,
            ciphertext,
            salt,
            kdf,
            created_at,
            expires_at,
        })
    }

    /// Size of the stored ciphertext in bytes
    pub fn size(&self) -> usize {
        self.ciphertext.len()
    }

    /// Check whether the secret has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Check whether the secret may still be consumed at `now`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired_at(now)
    }

    /// Split into the parts needed for decryption
    pub fn into_sealed(self) -> SealedSecret {
        SealedSecret {
            ciphertext: self.ciphertext,
            salt: self.salt,
            kdf: self.kdf,
        }
    }
}

/// Ciphertext and salt handed back by an atomic take
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedSecret {
    pub ciphertext: Vec<u8>,
    pub salt: Salt,
    pub kdf: KeyDerivationParams,
}
