//! File I/O utilities for the JSON secret store
//!
//! - [`FileLock`]: exclusive advisory lock held for a whole read-modify-write
//! - [`read_json`] / [`write_json_atomic`]: load and replace a JSON document
//!   without ever leaving a half-written file behind

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs4::FileExt;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::SecretDropError;

/// Exclusive lock on a sibling lock file, released on drop
///
/// The data file itself is replaced by rename on every write, so the lock
/// lives on a separate file whose inode never changes. Locks conflict across
/// processes and across separately opened handles within one process.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Block until the exclusive lock on `path` is held
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self, SecretDropError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SecretDropError::Storage(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| {
                SecretDropError::Storage(format!("Failed to open {}: {}", path.display(), e))
            })?;

        file.lock_exclusive().map_err(|e| {
            SecretDropError::Storage(format!("Failed to lock {}: {}", path.display(), e))
        })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = fs4::FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release store lock");
        }
    }
}

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, SecretDropError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => {
            return Err(SecretDropError::Storage(format!(
                "Failed to open {}: {}",
                path.display(),
                e
            )))
        }
    };

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| SecretDropError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Replace a JSON file atomically (write a temp file, sync, then rename)
///
/// Readers see either the old document or the new one, never a mix.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), SecretDropError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            SecretDropError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| SecretDropError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, data)
        .map_err(|e| SecretDropError::Storage(format!("Failed to serialize data: {}", e)))?;
    writer
        .flush()
        .map_err(|e| SecretDropError::Storage(format!("Failed to flush data: {}", e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| SecretDropError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        SecretDropError::Storage(format!("Failed to rename temp file: {}", e))
    })
}
