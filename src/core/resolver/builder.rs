//! Resolver construction.

use std::collections::BTreeSet;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, RwLock};

use tracing::info;
use zeroize::Zeroizing;

use super::{Resolver, Shared};
use crate::core::cipher::{AesCbc, EncryptionKey};
use crate::core::config::Config;
use crate::core::overrides::{EnvOverrides, OverrideSource};
use crate::core::store::{ExpiringStore, HookRegistry, HookedStore, OwnerStore, Store};
use crate::error::{ConfigError, Result};

/// Collects a resolver's collaborators and derives its key.
///
/// Overrides default to the process environment.
pub struct ResolverBuilder {
    config: Config,
    key: Option<Zeroizing<String>>,
    store: Option<Arc<dyn Store>>,
    expiring: Option<Arc<dyn ExpiringStore>>,
    owners: Option<Arc<dyn OwnerStore>>,
    hooks: Option<Arc<dyn HookRegistry>>,
    overrides: Arc<dyn OverrideSource>,
    track: Vec<String>,
}

impl ResolverBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            key: None,
            store: None,
            expiring: None,
            owners: None,
            hooks: None,
            overrides: Arc::new(EnvOverrides),
            track: Vec::new(),
        }
    }

    /// Explicit key material, taking precedence over every configured source.
    pub fn key(mut self, material: impl Into<String>) -> Self {
        self.key = Some(Zeroizing::new(material.into()));
        self
    }

    /// Like [`key`](Self::key), ignoring `None`.
    pub fn maybe_key(self, material: Option<String>) -> Self {
        match material {
            Some(m) => self.key(m),
            None => self,
        }
    }

    /// The settings store. Required.
    pub fn store<S: Store + 'static>(mut self, store: Arc<S>) -> Self {
        let store: Arc<dyn Store> = store;
        self.store = Some(store);
        self
    }

    /// A settings store that doubles as the hook registry for interception.
    pub fn hooked_store<S: Store + 'static>(mut self, store: Arc<HookedStore<S>>) -> Self {
        let hooks: Arc<dyn HookRegistry> = store.clone();
        let store: Arc<dyn Store> = store;
        self.hooks = Some(hooks);
        self.store = Some(store);
        self
    }

    /// A hook registry separate from the settings store.
    pub fn hooks<H: HookRegistry + 'static>(mut self, hooks: Arc<H>) -> Self {
        let hooks: Arc<dyn HookRegistry> = hooks;
        self.hooks = Some(hooks);
        self
    }

    pub fn expiring_store<S: ExpiringStore + 'static>(mut self, store: Arc<S>) -> Self {
        let store: Arc<dyn ExpiringStore> = store;
        self.expiring = Some(store);
        self
    }

    pub fn owner_store<S: OwnerStore + 'static>(mut self, store: Arc<S>) -> Self {
        let store: Arc<dyn OwnerStore> = store;
        self.owners = Some(store);
        self
    }

    pub fn overrides(mut self, overrides: impl OverrideSource + 'static) -> Self {
        self.overrides = Arc::new(overrides);
        self
    }

    /// Names to track from the start.
    pub fn track<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.track.extend(names.into_iter().map(Into::into));
        self
    }

    /// Validate the configuration, derive the key and assemble the resolver.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoKeyMaterial` if no key can be derived,
    /// `ConfigError::MissingStore` without a settings store (or without a
    /// hook registry when `intercept` is set), or a validation error.
    pub fn build(self) -> Result<Resolver> {
        self.config.validate()?;
        let store = self
            .store
            .ok_or(ConfigError::MissingStore("settings store"))?;

        let key = EncryptionKey::derive(
            self.key.as_deref().map(String::as_str),
            &self.config.key,
            self.overrides.as_ref(),
        )?;
        let cipher = AesCbc::new(key, self.config.prefix.clone())?;

        let resolver = Resolver {
            shared: Arc::new(Shared {
                cipher: RwLock::new(cipher),
                overrides: self.overrides,
                key_settings: self.config.key,
                namespace: self.config.namespace,
            }),
            store,
            expiring: self.expiring,
            owners: self.owners,
            hooks: self.hooks,
            tracked: Mutex::new(self.track.into_iter().collect::<BTreeSet<_>>()),
            intercepting: AtomicBool::new(false),
        };

        if self.config.intercept {
            resolver.enable_interception()?;
        }

        info!(
            namespace = resolver.shared.namespace.as_deref().unwrap_or(""),
            intercepting = resolver.is_intercepting(),
            "resolver ready"
        );
        Ok(resolver)
    }
}
