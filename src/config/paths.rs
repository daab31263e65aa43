//! Path management for secret-drop
//!
//! ## Path Resolution Order
//!
//! 1. `SECRETDROP_DATA_DIR` environment variable (if set)
//! 2. The platform data directory (`~/.local/share/secret-drop` on Linux,
//!    `~/Library/Application Support/secret-drop` on macOS,
//!    `%APPDATA%\secret-drop\data` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::SecretDropError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "SECRETDROP_DATA_DIR";

/// Manages all paths used by secret-drop
#[derive(Debug, Clone)]
pub struct SecretDropPaths {
    /// Base directory for all secret-drop data
    base_dir: PathBuf,
}

impl SecretDropPaths {
    /// Create a new SecretDropPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and no
    /// override is set.
    pub fn new() -> Result<Self, SecretDropError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create SecretDropPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to secrets.json
    pub fn secrets_file(&self) -> PathBuf {
        self.data_dir().join("secrets.json")
    }

    /// Get the path to the lock file guarding secrets.json
    pub fn lock_file(&self) -> PathBuf {
        self.data_dir().join("secrets.lock")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), SecretDropError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SecretDropError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| SecretDropError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if secret-drop has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, SecretDropError> {
    ProjectDirs::from("", "", "secret-drop")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| SecretDropError::Config("Could not determine home directory".into()))
}
