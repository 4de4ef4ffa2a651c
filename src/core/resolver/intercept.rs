//! Auto-interception of direct store reads.
//!
//! Legacy call sites that read the settings store directly would see raw
//! tokens. For every tracked name the resolver installs a pre-read hook on
//! the host's [`HookRegistry`] that answers such reads with the resolved
//! plaintext. Names are tracked explicitly or by a successful
//! [`Resolver::set`] while interception is enabled, and stay tracked for the
//! resolver's lifetime.

use std::sync::atomic::Ordering;
use std::sync::{Arc, PoisonError};

use tracing::debug;

use super::Resolver;
use crate::core::store::{HookRegistry, PreRead, Store};
use crate::core::types::LogicalName;
use crate::error::{ConfigError, Result};

impl Resolver {
    /// Track `name`, installing its hook if interception is enabled.
    pub fn track(&self, name: &str) {
        let inserted = self
            .tracked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string());
        if inserted {
            debug!(name, "tracking");
        }

        if self.is_intercepting() {
            if let Some(hooks) = &self.hooks {
                self.install_hook(hooks.as_ref(), name);
            }
        }
    }

    /// Every tracked logical name, sorted.
    pub fn tracked(&self) -> Vec<LogicalName> {
        self.tracked
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn is_intercepting(&self) -> bool {
        self.intercepting.load(Ordering::Acquire)
    }

    /// Install hooks for every tracked name. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingStore` if the resolver was built without
    /// a hook registry.
    pub fn enable_interception(&self) -> Result<()> {
        let hooks = self
            .hooks
            .as_ref()
            .ok_or(ConfigError::MissingStore("hook registry"))?;

        self.intercepting.store(true, Ordering::Release);
        for name in self.tracked() {
            self.install_hook(hooks.as_ref(), &name);
        }
        debug!(tracked = self.tracked().len(), "interception enabled");
        Ok(())
    }

    /// Remove every installed hook. Tracked names are kept. Idempotent.
    pub fn disable_interception(&self) {
        self.intercepting.store(false, Ordering::Release);
        if let Some(hooks) = &self.hooks {
            for name in self.tracked() {
                hooks.remove_pre_read(&self.full_name(&name));
            }
        }
        debug!("interception disabled");
    }

    fn install_hook(&self, hooks: &dyn HookRegistry, name: &str) {
        let shared = Arc::clone(&self.shared);
        let logical = name.to_string();
        let hook: PreRead = Arc::new(move |raw: &dyn Store| {
            shared
                .resolve(&logical, "", |key| raw.get_raw(key))
                .found()
        });
        hooks.install_pre_read(&self.full_name(name), hook);
    }
}
