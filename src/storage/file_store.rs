//! JSON file secret store
//!
//! All secrets live in one `secrets.json` document. Every operation takes the
//! exclusive lock on `secrets.lock`, reads the document, applies its change
//! and writes it back atomically before releasing the lock.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths::SecretDropPaths;
use crate::error::{SecretDropError, SecretDropResult};
use crate::models::{SealedSecret, Secret, SecretId};

use super::file_io::{read_json, write_json_atomic, FileLock};
use super::SecretStorage;

/// Serializable secret data structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SecretData {
    secrets: Vec<Secret>,
}

/// Secret store backed by a locked JSON file
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileSecretStore {
    /// Create a store at explicit data and lock paths
    pub fn new(path: PathBuf, lock_path: PathBuf) -> Self {
        Self { path, lock_path }
    }

    /// Create a store at the standard locations under `paths`
    pub fn open(paths: &SecretDropPaths) -> SecretDropResult<Self> {
        paths.ensure_directories()?;
        Ok(Self::new(paths.secrets_file(), paths.lock_file()))
    }

    /// Count stored rows, including expired ones not yet purged
    pub fn count(&self) -> SecretDropResult<usize> {
        let _lock = FileLock::acquire(&self.lock_path)?;
        let data: SecretData = read_json(&self.path)?;
        Ok(data.secrets.len())
    }

    /// Check whether a row with `id` is stored, regardless of expiry
    pub fn contains(&self, id: &SecretId) -> SecretDropResult<bool> {
        let _lock = FileLock::acquire(&self.lock_path)?;
        let data: SecretData = read_json(&self.path)?;
        Ok(data.secrets.iter().any(|s| s.id == *id))
    }

    /// Fetch a stored row without removing it
    #[cfg(test)]
    pub(crate) fn peek(&self, id: &SecretId) -> SecretDropResult<Option<Secret>> {
        let _lock = FileLock::acquire(&self.lock_path)?;
        let data: SecretData = read_json(&self.path)?;
        Ok(data.secrets.into_iter().find(|s| s.id == *id))
    }
}

impl SecretStorage for FileSecretStore {
    fn insert(&self, secret: Secret) -> SecretDropResult<()> {
        let _lock = FileLock::acquire(&self.lock_path)?;
        let mut data: SecretData = read_json(&self.path)?;

        if data.secrets.iter().any(|s| s.id == secret.id) {
            return Err(SecretDropError::Storage(format!(
                "Duplicate secret id: {}",
                secret.id
            )));
        }

        data.secrets.push(secret);
        write_json_atomic(&self.path, &data)
    }

    fn take_active(
        &self,
        id: &SecretId,
        now: DateTime<Utc>,
    ) -> SecretDropResult<Option<SealedSecret>> {
        let _lock = FileLock::acquire(&self.lock_path)?;
        let mut data: SecretData = read_json(&self.path)?;

        let Some(index) = data.secrets.iter().position(|s| s.id == *id) else {
            return Ok(None);
        };

        let secret = data.secrets.swap_remove(index);
        write_json_atomic(&self.path, &data)?;

        if secret.is_expired_at(now) {
            return Ok(None);
        }
        Ok(Some(secret.into_sealed()))
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> SecretDropResult<usize> {
        let _lock = FileLock::acquire(&self.lock_path)?;
        let mut data: SecretData = read_json(&self.path)?;

        let before = data.secrets.len();
        data.secrets.retain(|s| s.is_active_at(now));
        let removed = before - data.secrets.len();

        if removed > 0 {
            write_json_atomic(&self.path, &data)?;
        }
        Ok(removed)
    }
}
