//! Storage collaborators.
//!
//! The resolver never owns its data. The host supplies key-value stores
//! through the traits below and strongbox reads and writes tokens through
//! them. Three shapes are supported:
//!
//! - [`Store`]: plain settings (`key → value`)
//! - [`ExpiringStore`]: cache entries with a time-to-live
//! - [`OwnerStore`]: attributes scoped to an owner (user, record, ...)
//!
//! In-memory and file-backed implementations ship for tests and the CLI.
//!
//! ## Adding a New Storage Backend
//!
//! 1. Implement the matching trait
//! 2. Override [`Store::get_raw`] if the backend has its own read hooks
//! 3. Re-export from this module

use std::time::Duration;

use crate::core::types::OwnerId;
use crate::error::Result;

mod fs;
mod hooks;
mod memory;

pub use fs::FileStore;
pub use hooks::{HookRegistry, HookedStore, PreRead};
pub use memory::{MemoryCache, MemoryOwnerStore, MemoryStore};

/// Plain key-value storage.
pub trait Store: Send + Sync {
    /// Value stored under `key`, as seen by ordinary callers.
    fn get(&self, key: &str) -> Option<String>;

    /// Value stored under `key`, bypassing any read hooks.
    ///
    /// The resolver reads through this so an installed hook never
    /// re-enters itself.
    fn get_raw(&self, key: &str) -> Option<String> {
        self.get(key)
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the value could not be persisted.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Key-value storage whose entries expire.
pub trait ExpiringStore: Send + Sync {
    /// Unexpired value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key` for `ttl`. A zero `ttl` never expires.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the value could not be persisted.
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
}

/// Key-value storage scoped to an owner.
pub trait OwnerStore: Send + Sync {
    /// Value stored under `key` for `owner`.
    fn get(&self, owner: OwnerId, key: &str) -> Option<String>;

    /// Store `value` under `key` for `owner`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the value could not be persisted.
    fn set(&self, owner: OwnerId, key: &str, value: &str) -> Result<()>;
}
