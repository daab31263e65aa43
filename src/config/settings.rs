//! Settings for secret-drop
//!
//! Settings are loaded once and handed by value to the services. Nothing in
//! the library reads process-wide configuration, so tests can lower the
//! iteration count or shorten the lifetime per instance.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::paths::SecretDropPaths;
use crate::crypto::key_derivation::{KeyDerivationParams, DEFAULT_ITERATIONS};
use crate::error::SecretDropError;

/// Default lifetime of a secret (10 minutes)
pub const DEFAULT_TTL_SECONDS: i64 = 10 * 60;

/// Longest lifetime a secret may be configured with (one day)
pub const MAX_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Default maximum plaintext size (50 KiB)
pub const DEFAULT_MAX_SECRET_BYTES: usize = 50 * 1024;

/// Settings for secret-drop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// PBKDF2 iteration count for new secrets
    ///
    /// Each secret records the count it was sealed with, so changing this
    /// leaves live secrets readable.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Lifetime of a secret in seconds, at most [`MAX_TTL_SECONDS`]
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: i64,

    /// Maximum plaintext size in bytes
    #[serde(default = "default_max_secret_bytes")]
    pub max_secret_bytes: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_ttl_seconds() -> i64 {
    DEFAULT_TTL_SECONDS
}

fn default_max_secret_bytes() -> usize {
    DEFAULT_MAX_SECRET_BYTES
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            kdf_iterations: default_kdf_iterations(),
            ttl_seconds: default_ttl_seconds(),
            max_secret_bytes: default_max_secret_bytes(),
        }
    }
}

impl Settings {
    /// Key derivation parameters derived from these settings
    pub fn key_params(&self) -> KeyDerivationParams {
        KeyDerivationParams::with_iterations(self.kdf_iterations)
    }

    /// Lifetime of a secret, clamped to [`MAX_TTL_SECONDS`]
    pub fn ttl(&self) -> Duration {
        Duration::seconds(self.ttl_seconds.clamp(0, MAX_TTL_SECONDS))
    }

    /// Check that the settings describe a usable configuration
    pub fn validate(&self) -> Result<(), SecretDropError> {
        if self.kdf_iterations == 0 {
            return Err(SecretDropError::Config(
                "kdf_iterations must be greater than zero".into(),
            ));
        }
        if self.ttl_seconds <= 0 {
            return Err(SecretDropError::Config(
                "ttl_seconds must be greater than zero".into(),
            ));
        }
        if self.ttl_seconds > MAX_TTL_SECONDS {
            return Err(SecretDropError::Config(format!(
                "ttl_seconds must be at most {}",
                MAX_TTL_SECONDS
            )));
        }
        if self.max_secret_bytes == 0 {
            return Err(SecretDropError::Config(
                "max_secret_bytes must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &SecretDropPaths) -> Result<Self, SecretDropError> {
        let settings_path = paths.settings_file();

        let settings = if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                SecretDropError::Io(format!("Failed to read settings file: {}", e))
            })?;

            serde_json::from_str(&contents).map_err(|e| {
                SecretDropError::Config(format!("Failed to parse settings file: {}", e))
            })?
        } else {
            // Don't save yet - let caller decide when to persist
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SecretDropPaths) -> Result<(), SecretDropError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            SecretDropError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            SecretDropError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
