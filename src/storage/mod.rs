//! Storage layer for secret-drop
//!
//! The core needs exactly three things from storage: insert a new secret,
//! atomically take an unexpired secret (fetch and delete in one step), and
//! optionally purge rows whose lifetime has passed. Two backends implement
//! [`SecretStorage`]:
//!
//! - [`FileSecretStore`]: JSON file guarded by an exclusive file lock, safe
//!   across processes
//! - [`MemorySecretStore`]: mutex-guarded map for embedding and tests

pub mod file_io;
pub mod file_store;
pub mod memory;

pub use file_io::{read_json, write_json_atomic, FileLock};
pub use file_store::FileSecretStore;
pub use memory::MemorySecretStore;

use chrono::{DateTime, Utc};

use crate::error::SecretDropResult;
use crate::models::{SealedSecret, Secret, SecretId};

/// Persistence contract for secrets
pub trait SecretStorage: Send + Sync {
    /// Persist a new secret. Fails if the id is already present.
    fn insert(&self, secret: Secret) -> SecretDropResult<()>;

    /// Atomically remove the secret with `id` and return its ciphertext and
    /// salt, provided it exists and has not expired at `now`.
    ///
    /// Returns `Ok(None)` when the secret is absent or expired; an expired
    /// row found here is removed as well. The removal is durable before this
    /// returns, and no two callers can both receive `Some` for the same id.
    fn take_active(
        &self,
        id: &SecretId,
        now: DateTime<Utc>,
    ) -> SecretDropResult<Option<SealedSecret>>;

    /// Remove every secret expired at `now`, returning how many were removed
    fn purge_expired(&self, now: DateTime<Utc>) -> SecretDropResult<usize>;
}

impl<T: SecretStorage + ?Sized> SecretStorage for std::sync::Arc<T> {
    fn insert(&self, secret: Secret) -> SecretDropResult<()> {
        (**self).insert(secret)
    }

    fn take_active(
        &self,
        id: &SecretId,
        now: DateTime<Utc>,
    ) -> SecretDropResult<Option<SealedSecret>> {
        (**self).take_active(id, now)
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> SecretDropResult<usize> {
        (**self).purge_expired(now)
    }
}
