//! Secret service
//!
//! Implements the one-time secret lifecycle on top of a [`SecretStorage`]
//! backend:
//!
//! - `create`: validate, salt, derive, encrypt, persist
//! - `consume`: atomically take the row, then derive and decrypt
//!
//! The row is removed before decryption is attempted, so a wrong passphrase
//! uses up the single read.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::Settings;
use crate::crypto::{
    decrypt_string, derive_key, encrypt_string, generate_id, generate_salt, KeyDerivationParams,
    SecureString,
};
use crate::error::{SecretDropError, SecretDropResult};
use crate::models::{Secret, SecretId};
use crate::storage::SecretStorage;

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Public view of a freshly created secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSecret {
    /// Identifier of the stored secret
    pub id: SecretId,
    /// URL-safe token to share with the recipient
    pub token: String,
    /// First instant at which the secret is gone
    pub expires_at: DateTime<Utc>,
}

/// Service for creating and consuming one-time secrets
pub struct SecretService<S, C = SystemClock> {
    storage: S,
    settings: Settings,
    key_params: KeyDerivationParams,
    clock: C,
}

impl<S: SecretStorage> SecretService<S, SystemClock> {
    /// Create a new secret service using wall-clock time
    pub fn new(storage: S, settings: Settings) -> SecretDropResult<Self> {
        Self::with_clock(storage, settings, SystemClock)
    }
}

impl<S: SecretStorage, C: Clock> SecretService<S, C> {
    /// Create a new secret service with an explicit clock
    pub fn with_clock(storage: S, settings: Settings, clock: C) -> SecretDropResult<Self> {
        settings.validate()?;
        Ok(Self {
            key_params: settings.key_params(),
            storage,
            settings,
            clock,
        })
    }

    /// Get the settings this service was built with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Encrypt and store a new secret, returning its id
    pub fn create(&self, plaintext: &str, passphrase: &str) -> SecretDropResult<SecretId> {
        self.create_detailed(plaintext, passphrase).map(|created| created.id)
    }

    /// Encrypt and store a new secret, returning its id, token and expiry
    pub fn create_detailed(
        &self,
        plaintext: &str,
        passphrase: &str,
    ) -> SecretDropResult<CreatedSecret> {
        self.validate_create(plaintext, passphrase)?;

        let salt = generate_salt();
        let id = generate_id();
        let key = derive_key(passphrase, &salt, &self.key_params)?;
        let ciphertext = encrypt_string(plaintext, &key)?;
        drop(key);

        let secret = Secret::new(
            id,
            ciphertext,
            salt,
            self.key_params,
            self.clock.now(),
            self.settings.ttl(),
        )?;
        let expires_at = secret.expires_at;
        self.storage.insert(secret)?;

        info!(secret = %id, %expires_at, "secret created");

        Ok(CreatedSecret {
            id,
            token: id.to_token(),
            expires_at,
        })
    }

    fn validate_create(&self, plaintext: &str, passphrase: &str) -> SecretDropResult<()> {
        if plaintext.is_empty() {
            return Err(SecretDropError::Validation(
                "Secret content cannot be empty".into(),
            ));
        }
        if plaintext.len() > self.settings.max_secret_bytes {
            return Err(SecretDropError::Validation(format!(
                "Secret is {} bytes; the maximum is {} bytes",
                plaintext.len(),
                self.settings.max_secret_bytes
            )));
        }
        if passphrase.is_empty() {
            return Err(SecretDropError::Validation(
                "Passphrase cannot be empty".into(),
            ));
        }
        Ok(())
    }

    /// Read a secret exactly once
    ///
    /// # Errors
    ///
    /// - [`SecretDropError::NotFound`] if the secret never existed, has
    ///   expired or was already consumed
    /// - [`SecretDropError::WrongPassphrase`] if the secret existed but the
    ///   passphrase did not decrypt it; the secret is gone either way
    pub fn consume(&self, id: &SecretId, passphrase: &str) -> SecretDropResult<SecureString> {
        let now = self.clock.now();

        let Some(sealed) = self.storage.take_active(id, now)? else {
            debug!(secret = %id, "secret unavailable");
            return Err(SecretDropError::NotFound);
        };

        let key = derive_key(passphrase, &sealed.salt, &sealed.kdf)?;
        match decrypt_string(&sealed.ciphertext, &key) {
            Ok(plaintext) => {
                info!(secret = %id, "secret consumed");
                Ok(plaintext)
            }
            Err(SecretDropError::Authentication) => {
                info!(secret = %id, "secret consumed with wrong passphrase");
                Err(SecretDropError::WrongPassphrase)
            }
            Err(e) => Err(e),
        }
    }

    /// Read a secret exactly once, addressed by its shareable token
    ///
    /// A token that does not decode is reported as [`SecretDropError::NotFound`].
    pub fn consume_token(&self, token: &str, passphrase: &str) -> SecretDropResult<SecureString> {
        let id: SecretId = token.parse().map_err(|_| SecretDropError::NotFound)?;
        self.consume(&id, passphrase)
    }

    /// Remove every expired secret from storage
    pub fn sweep(&self) -> SecretDropResult<usize> {
        let removed = self.storage.purge_expired(self.clock.now())?;
        if removed > 0 {
            info!(removed, "expired secrets purged");
        }
        Ok(removed)
    }
}
