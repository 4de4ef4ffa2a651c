//! Test support utilities for strongbox integration tests.
//!
//! Provides reusable test environment setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with an isolated working directory.
///
/// Child processes use `.current_dir()` and an explicit environment, so
/// tests can safely run in parallel.
pub struct Test {
    /// Temporary working directory (holds the store and config files)
    pub dir: TempDir,
    /// Key material passed to every command, if any
    pub key: Option<String>,
}

impl Test {
    /// Create an environment whose commands pass [`TEST_KEY`].
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
            key: Some(TEST_KEY.to_string()),
        }
    }

    /// Create an environment with no key material at all.
    pub fn without_key() -> Self {
        Self {
            key: None,
            ..Self::new()
        }
    }

    /// Path of the default store file.
    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join(".strongbox-store.toml")
    }

    /// Raw contents of the store file.
    pub fn store_contents(&self) -> String {
        std::fs::read_to_string(self.store_path()).unwrap_or_default()
    }

    /// Write a config file to the working directory.
    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.dir.path().join(".strongbox.toml"), contents)
            .expect("failed to write config");
    }

    /// Write a raw value straight into the store file.
    pub fn write_store(&self, contents: &str) {
        std::fs::write(self.store_path(), contents).expect("failed to write store");
    }
}
