//! In-memory storage backends.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::trace;

use super::{ExpiringStore, OwnerStore, Store};
use crate::core::types::OwnerId;
use crate::error::Result;

/// Plain settings held in a map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored key and raw value.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        trace!(key, value_len = value.len(), "memory store write");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Cache entries with expiry on a monotonic clock.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (String, Option<Instant>)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held, expired or not.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ExpiringStore for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let expired = match entries.get(key)? {
            (_, Some(at)) => Instant::now() >= *at,
            (_, None) => false,
        };
        if expired {
            trace!(key, "cache entry expired");
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|(value, _)| value.clone())
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        // A TTL past the clock's range never expires, same as zero
        let expires = (!ttl.is_zero()).then(|| now.checked_add(ttl)).flatten();

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, (_, at)| at.map_or(true, |at| now < at));
        entries.insert(key.to_string(), (value.to_string(), expires));
        Ok(())
    }
}

/// Per-owner attributes held in a map.
#[derive(Debug, Default)]
pub struct MemoryOwnerStore {
    entries: RwLock<HashMap<(OwnerId, String), String>>,
}

impl MemoryOwnerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OwnerStore for MemoryOwnerStore {
    fn get(&self, owner: OwnerId, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(owner, key.to_string()))
            .cloned()
    }

    fn set(&self, owner: OwnerId, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((owner, key.to_string()), value.to_string());
        Ok(())
    }
}
