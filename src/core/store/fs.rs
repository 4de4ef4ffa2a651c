//! File-backed settings store.
//!
//! Persists a flat table of `key = "value"` pairs to one TOML file. Every
//! write rewrites the file. A missing file reads as an empty store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use super::Store;
use crate::error::{Result, StoreError};

/// Settings persisted to a TOML file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every entry from disk.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ReadFailed` or `StoreError::Parse`.
    pub fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::ReadFailed(format!("{}: {}", self.path.display(), e)))?;
        let entries = toml::from_str(&contents).map_err(StoreError::Parse)?;
        Ok(entries)
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let contents = toml::to_string_pretty(entries).map_err(StoreError::Serialize)?;
        fs::write(&self.path, contents)
            .map_err(|e| StoreError::WriteFailed(format!("{}: {}", self.path.display(), e)))?;

        // Tokens are ciphertext, but plaintext values may live here too
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        }

        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable store");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)?;
        debug!(key, path = %self.path.display(), "stored value");
        Ok(())
    }
}
