//! Pre-read hooks for transparent decryption.
//!
//! A host whose generic settings reads should see decrypted values wraps its
//! store in [`HookedStore`]. The resolver then installs one [`PreRead`] hook
//! per tracked key; ordinary `get` calls on that key return whatever the hook
//! computes instead of the stored token.
//!
//! Hooks are handed the undecorated inner store, so computing a substituted
//! value can never re-enter the hooked read path.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::trace;

use super::Store;
use crate::error::Result;

/// Computes the value returned for a hooked key, given the raw store.
pub type PreRead = Arc<dyn Fn(&dyn Store) -> Option<String> + Send + Sync>;

/// Registration of pre-read hooks by storage key.
pub trait HookRegistry: Send + Sync {
    /// Install `hook` for `key`, replacing any hook already there.
    fn install_pre_read(&self, key: &str, hook: PreRead);

    /// Remove the hook for `key`, if any.
    fn remove_pre_read(&self, key: &str);

    /// Whether a hook is installed for `key`.
    fn has_pre_read(&self, key: &str) -> bool;
}

/// A store whose reads can be intercepted per key.
pub struct HookedStore<S> {
    inner: S,
    hooks: RwLock<HashMap<String, PreRead>>,
}

impl<S: Store> HookedStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            hooks: RwLock::new(HashMap::new()),
        }
    }

    /// The wrapped store, without hooks.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn hook(&self, key: &str) -> Option<PreRead> {
        self.hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl<S: Store> Store for HookedStore<S> {
    fn get(&self, key: &str) -> Option<String> {
        match self.hook(key) {
            Some(hook) => {
                trace!(key, "pre-read hook");
                hook(&self.inner)
            }
            None => self.inner.get(key),
        }
    }

    fn get_raw(&self, key: &str) -> Option<String> {
        self.inner.get_raw(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(key, value)
    }
}

impl<S: Store> HookRegistry for HookedStore<S> {
    fn install_pre_read(&self, key: &str, hook: PreRead) {
        self.hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), hook);
    }

    fn remove_pre_read(&self, key: &str) {
        self.hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    fn has_pre_read(&self, key: &str) -> bool {
        self.hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

impl<S: fmt::Debug> fmt::Debug for HookedStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooked: Vec<String> = self
            .hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        f.debug_struct("HookedStore")
            .field("inner", &self.inner)
            .field("hooked", &hooked)
            .finish()
    }
}
