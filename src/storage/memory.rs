//! In-memory secret store
//!
//! Atomicity comes from holding the map's mutex across lookup and removal.
//! Only suitable when every caller shares the same process.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::error::{SecretDropError, SecretDropResult};
use crate::models::{SealedSecret, Secret, SecretId};

use super::SecretStorage;

/// Secret store held in process memory
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    data: Mutex<HashMap<SecretId, Secret>>,
}

impl MemorySecretStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> SecretDropResult<std::sync::MutexGuard<'_, HashMap<SecretId, Secret>>> {
        self.data
            .lock()
            .map_err(|e| SecretDropError::Storage(format!("Failed to acquire lock: {}", e)))
    }

    /// Count stored rows, including expired ones not yet purged
    pub fn count(&self) -> SecretDropResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Check whether a row with `id` is stored, regardless of expiry
    pub fn contains(&self, id: &SecretId) -> SecretDropResult<bool> {
        Ok(self.lock()?.contains_key(id))
    }

    /// Fetch a stored row without removing it
    pub fn peek(&self, id: &SecretId) -> SecretDropResult<Option<Secret>> {
        Ok(self.lock()?.get(id).cloned())
    }
}

impl SecretStorage for MemorySecretStore {
    fn insert(&self, secret: Secret) -> SecretDropResult<()> {
        let mut data = self.lock()?;
        if data.contains_key(&secret.id) {
            return Err(SecretDropError::Storage(format!(
                "Duplicate secret id: {}",
                secret.id
            )));
        }
        data.insert(secret.id, secret);
        Ok(())
    }

    fn take_active(
        &self,
        id: &SecretId,
        now: DateTime<Utc>,
    ) -> SecretDropResult<Option<SealedSecret>> {
        let mut data = self.lock()?;
        Ok(data
            .remove(id)
            .filter(|secret| secret.is_active_at(now))
            .map(Secret::into_sealed))
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> SecretDropResult<usize> {
        let mut data = self.lock()?;
        let before = data.len();
        data.retain(|_, secret| secret.is_active_at(now));
        Ok(before - data.len())
    }
}
