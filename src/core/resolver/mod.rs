//! Value resolution: override precedence over decrypt-on-read storage.
//!
//! For a logical name the resolver derives a storage key (namespace + name)
//! and an override identifier (the storage key uppercased). Reads serve the
//! override when one is defined and non-empty, otherwise decrypt what is
//! stored, otherwise fall back to the caller's default. Writes are
//! suppressed while an override is defined.
//!
//! Read accessors never fail: a value that cannot be decrypted is logged
//! and replaced by the default. Write accessors propagate errors.

mod builder;
mod intercept;
mod provenance;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard};
use std::time::Duration;

use tracing::{debug, warn};

pub use builder::ResolverBuilder;
pub use provenance::{Resolved, SetOutcome, Source};

use crate::core::cipher::{AesCbc, Cipher, EncryptionKey};
use crate::core::config::{Config, KeySettings};
use crate::core::overrides::OverrideSource;
use crate::core::store::{ExpiringStore, HookRegistry, OwnerStore, Store};
use crate::core::types::{FullName, LogicalName, OverrideId, OwnerId, Token};
use crate::error::{ConfigError, Result};

/// State shared between the resolver and the read hooks it installs.
struct Shared {
    cipher: RwLock<AesCbc>,
    overrides: Arc<dyn OverrideSource>,
    key_settings: KeySettings,
    namespace: Option<String>,
}

impl Shared {
    fn cipher(&self) -> RwLockReadGuard<'_, AesCbc> {
        self.cipher.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn full_name(&self, name: &str) -> FullName {
        match &self.namespace {
            Some(ns) => format!("{}{}", ns, name),
            None => name.to_string(),
        }
    }

    fn override_id(&self, name: &str) -> OverrideId {
        self.full_name(name).to_uppercase()
    }

    fn override_value(&self, name: &str) -> Option<String> {
        self.overrides
            .lookup(&self.override_id(name))
            .filter(|v| !v.is_empty())
    }

    /// Resolve `name`, reading stored values through `read`.
    fn resolve(
        &self,
        name: &str,
        default: &str,
        read: impl FnOnce(&str) -> Option<String>,
    ) -> Resolved {
        if let Some(value) = self.override_value(name) {
            debug!(name, "serving override");
            return Resolved {
                value,
                source: Source::Override,
                identifier: self.override_id(name),
                was_encrypted: false,
            };
        }

        let full = self.full_name(name);
        let Some(raw) = read(&full) else {
            debug!(key = %full, "nothing stored, serving default");
            return Resolved::fallback(default, full, false);
        };

        let cipher = self.cipher();
        let was_encrypted = cipher.is_encrypted(&raw);
        match cipher.decrypt(&raw) {
            Ok(value) => Resolved {
                value,
                source: Source::Database,
                identifier: full,
                was_encrypted,
            },
            Err(e) => {
                warn!(key = %full, error = %e, "stored value unreadable, serving default");
                Resolved::fallback(default, full, was_encrypted)
            }
        }
    }
}

/// Resolves logical names to plaintext across override and storage.
///
/// Construct with [`Resolver::builder`].
pub struct Resolver {
    shared: Arc<Shared>,
    store: Arc<dyn Store>,
    expiring: Option<Arc<dyn ExpiringStore>>,
    owners: Option<Arc<dyn OwnerStore>>,
    hooks: Option<Arc<dyn HookRegistry>>,
    tracked: Mutex<BTreeSet<LogicalName>>,
    intercepting: AtomicBool,
}

impl Resolver {
    pub fn builder(config: Config) -> ResolverBuilder {
        ResolverBuilder::new(config)
    }

    /// Storage key for `name`: the namespace followed by the name.
    pub fn full_name(&self, name: &str) -> FullName {
        self.shared.full_name(name)
    }

    /// Override identifier for `name`: the storage key uppercased.
    pub fn override_id(&self, name: &str) -> OverrideId {
        self.shared.override_id(name)
    }

    /// Whether a non-empty override is defined for `name`.
    pub fn has_override(&self, name: &str) -> bool {
        self.override_value(name).is_some()
    }

    /// The override for `name`. Empty overrides count as absent.
    pub fn override_value(&self, name: &str) -> Option<String> {
        self.shared.override_value(name)
    }

    /// Encrypt and store `plaintext` under `name`.
    ///
    /// While interception is enabled, a stored name is also tracked.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if encryption fails (nothing is written), or
    /// `StoreError` if the store rejects the write.
    pub fn set(&self, name: &str, plaintext: &str) -> Result<SetOutcome> {
        let outcome = self.write(name, plaintext, |key, token| self.store.set(key, token))?;
        if outcome.is_stored() && self.is_intercepting() {
            self.track(name);
        }
        Ok(outcome)
    }

    /// Resolve `name`, falling back to `default`.
    pub fn get(&self, name: &str, default: &str) -> String {
        self.get_with_provenance(name, default).value
    }

    /// Resolve `name` and report which path produced the value.
    pub fn get_with_provenance(&self, name: &str, default: &str) -> Resolved {
        self.shared
            .resolve(name, default, |key| self.store.get_raw(key))
    }

    /// Encrypt and store `plaintext` under `name` in the expiring store.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingStore` without an expiring store, and
    /// the same errors as [`Resolver::set`] otherwise.
    pub fn set_expiring(&self, name: &str, plaintext: &str, ttl: Duration) -> Result<SetOutcome> {
        let store = self
            .expiring
            .as_ref()
            .ok_or(ConfigError::MissingStore("expiring store"))?;
        self.write(name, plaintext, |key, token| store.set(key, token, ttl))
    }

    /// Resolve `name` from the expiring store, falling back to `default`.
    ///
    /// Without an expiring store only overrides and `default` apply.
    pub fn get_expiring(&self, name: &str, default: &str) -> String {
        self.shared
            .resolve(name, default, |key| self.expiring.as_ref()?.get(key))
            .value
    }

    /// Encrypt and store `plaintext` under `name` for `owner`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingStore` without an owner store, and the
    /// same errors as [`Resolver::set`] otherwise.
    pub fn set_owned(&self, owner: OwnerId, name: &str, plaintext: &str) -> Result<SetOutcome> {
        let store = self
            .owners
            .as_ref()
            .ok_or(ConfigError::MissingStore("owner store"))?;
        self.write(name, plaintext, |key, token| store.set(owner, key, token))
    }

    /// Resolve `name` for `owner`, falling back to `default`.
    pub fn get_owned(&self, owner: OwnerId, name: &str, default: &str) -> String {
        self.shared
            .resolve(name, default, |key| self.owners.as_ref()?.get(owner, key))
            .value
    }

    /// Replace the key. `None` re-derives it from the configured sources.
    ///
    /// Values stored under the previous key become unreadable and resolve to
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoKeyMaterial` if no key can be derived; the
    /// current key is kept in that case.
    pub fn change_key(&self, material: Option<&str>) -> Result<()> {
        let key = EncryptionKey::derive(
            material,
            &self.shared.key_settings,
            self.shared.overrides.as_ref(),
        )?;
        self.shared
            .cipher
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .change_key(key);
        debug!("encryption key changed");
        Ok(())
    }

    /// Encrypt with the resolver's key and prefix.
    ///
    /// # Errors
    ///
    /// See [`Cipher::encrypt`].
    pub fn encrypt(&self, plaintext: &str) -> Result<Token> {
        self.shared.cipher().encrypt(plaintext)
    }

    /// Decrypt with the resolver's key and prefix.
    ///
    /// # Errors
    ///
    /// See [`Cipher::decrypt`].
    pub fn decrypt(&self, input: &str) -> Result<String> {
        self.shared.cipher().decrypt(input)
    }

    pub fn is_encrypted(&self, value: &str) -> bool {
        self.shared.cipher().is_encrypted(value)
    }

    pub fn prefix(&self) -> String {
        self.shared.cipher().prefix().to_string()
    }

    /// Shared write path: suppress under override, encrypt, then persist.
    fn write(
        &self,
        name: &str,
        plaintext: &str,
        persist: impl FnOnce(&str, &str) -> Result<()>,
    ) -> Result<SetOutcome> {
        if self.has_override(name) {
            debug!(name, id = %self.override_id(name), "override defined, write suppressed");
            return Ok(SetOutcome::Suppressed);
        }

        let token = self.encrypt(plaintext)?;
        let key = self.full_name(name);
        persist(&key, &token)?;
        debug!(key = %key, "stored encrypted value");
        Ok(SetOutcome::Stored)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("namespace", &self.shared.namespace)
            .field("prefix", &self.prefix())
            .field("tracked", &self.tracked())
            .field("intercepting", &self.is_intercepting())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::overrides::StaticOverrides;
    use crate::core::store::{MemoryCache, MemoryOwnerStore, MemoryStore};
    use crate::error::{CipherError, Error};

    fn resolver(store: Arc<MemoryStore>, overrides: StaticOverrides) -> Resolver {
        Resolver::builder(Config::with_namespace("myapp_"))
            .key("test-key")
            .store(store)
            .overrides(overrides)
            .build()
            .unwrap()
    }

    #[test]
    fn test_name_derivation() {
        let r = resolver(Arc::new(MemoryStore::new()), StaticOverrides::new());
        assert_eq!(r.full_name("api_key"), "myapp_api_key");
        assert_eq!(r.override_id("api_key"), "MYAPP_API_KEY");
    }

    #[test]
    fn test_name_derivation_without_namespace() {
        let r = Resolver::builder(Config::default())
            .key("k")
            .store(Arc::new(MemoryStore::new()))
            .build()
            .unwrap();
        assert_eq!(r.full_name("api_key"), "api_key");
        assert_eq!(r.override_id("api_key"), "API_KEY");
    }

    #[test]
    fn test_set_then_get() {
        let store = Arc::new(MemoryStore::new());
        let r = resolver(store.clone(), StaticOverrides::new());

        assert_eq!(r.set("api_key", "sk_live_123").unwrap(), SetOutcome::Stored);
        let raw = store.get("myapp_api_key").unwrap();
        assert!(raw.starts_with("__ENCRYPTED__"));
        assert!(r.is_encrypted(&raw));
        assert_eq!(r.get("api_key", ""), "sk_live_123");
    }

    #[test]
    fn test_override_wins_and_suppresses_writes() {
        let store = Arc::new(MemoryStore::new());
        store.set("myapp_api_key", "legacy").unwrap();
        let r = resolver(store.clone(), StaticOverrides::new().with("MYAPP_API_KEY", "X"));

        assert_eq!(r.get("api_key", "fallback"), "X");
        assert_eq!(r.set("api_key", "Y").unwrap(), SetOutcome::Suppressed);
        assert_eq!(store.get("myapp_api_key").as_deref(), Some("legacy"));
    }

    #[test]
    fn test_empty_override_falls_through() {
        let store = Arc::new(MemoryStore::new());
        let r = resolver(store, StaticOverrides::new().with("MYAPP_API_KEY", ""));

        assert!(!r.has_override("api_key"));
        assert_eq!(r.get("api_key", "fallback"), "fallback");
        assert!(r.set("api_key", "stored").unwrap().is_stored());
        assert_eq!(r.get("api_key", "fallback"), "stored");
    }

    #[test]
    fn test_provenance() {
        let store = Arc::new(MemoryStore::new());
        store.set("myapp_legacy", "plain").unwrap();
        let r = resolver(store, StaticOverrides::new().with("MYAPP_FROM_ENV", "env"));
        r.set("secret", "s3cr3t").unwrap();

        let p = r.get_with_provenance("from_env", "d");
        assert_eq!((p.source, p.identifier.as_str()), (Source::Override, "MYAPP_FROM_ENV"));

        let p = r.get_with_provenance("secret", "d");
        assert_eq!(p.value, "s3cr3t");
        assert_eq!(p.source, Source::Database);
        assert!(p.was_encrypted);

        let p = r.get_with_provenance("legacy", "d");
        assert_eq!((p.value.as_str(), p.was_encrypted), ("plain", false));

        let p = r.get_with_provenance("missing", "d");
        assert_eq!((p.value.as_str(), p.source), ("d", Source::Default));
        assert_eq!(p.identifier, "myapp_missing");
    }

    #[test]
    fn test_corrupt_token_serves_default() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("myapp_name", "__ENCRYPTED__!!!notbase64!!!")
            .unwrap();
        let r = resolver(store, StaticOverrides::new());

        let p = r.get_with_provenance("name", "fallback");
        assert_eq!(p.value, "fallback");
        assert_eq!(p.source, Source::Default);
        assert!(p.was_encrypted);
    }

    #[test]
    fn test_encrypt_failure_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let r = resolver(store.clone(), StaticOverrides::new());
        {
            let mut cipher = r.shared.cipher.write().unwrap();
            let key = EncryptionKey::from_material(b"test-key");
            *cipher = AesCbc::with_default_prefix(key)
                .with_iv_source(|_| Err(getrandom::Error::UNSUPPORTED));
        }

        let err = r.set("api_key", "sk_live_123").unwrap_err();
        assert!(matches!(err, Error::Cipher(CipherError::Randomness(_))));
        assert!(store.entries().is_empty());
    }

    #[test]
    fn test_change_key_orphans_stored_values() {
        let store = Arc::new(MemoryStore::new());
        let r = resolver(store, StaticOverrides::new());
        r.set("api_key", "a fairly long secret value").unwrap();

        r.change_key(Some("another-key")).unwrap();
        assert_eq!(r.get("api_key", "fallback"), "fallback");

        r.change_key(Some("test-key")).unwrap();
        assert_eq!(r.get("api_key", "fallback"), "a fairly long secret value");
    }

    #[test]
    fn test_change_key_rederives_from_sources() {
        let store = Arc::new(MemoryStore::new());
        let r = resolver(store, StaticOverrides::new().with("ENCRYPTION_KEY", "dedicated"));
        r.change_key(None).unwrap();

        let token = r.encrypt("v").unwrap();
        let fresh = AesCbc::with_default_prefix(EncryptionKey::from_material(b"dedicated"));
        assert_eq!(fresh.decrypt(&token).unwrap(), "v");
    }

    #[test]
    fn test_change_key_without_material_keeps_old_key() {
        let store = Arc::new(MemoryStore::new());
        let r = resolver(store, StaticOverrides::new());
        r.set("api_key", "value").unwrap();

        assert!(r.change_key(None).is_err());
        assert_eq!(r.get("api_key", ""), "value");
    }

    #[test]
    fn test_expiring_accessors() {
        let cache = Arc::new(MemoryCache::new());
        let r = Resolver::builder(Config::with_namespace("myapp_"))
            .key("k")
            .store(Arc::new(MemoryStore::new()))
            .expiring_store(cache.clone())
            .overrides(StaticOverrides::new())
            .build()
            .unwrap();

        r.set_expiring("session", "tok", Duration::from_secs(60))
            .unwrap();
        assert!(cache.get("myapp_session").unwrap().starts_with("__ENCRYPTED__"));
        assert_eq!(r.get_expiring("session", ""), "tok");
        assert_eq!(r.get_expiring("other", "none"), "none");
    }

    #[test]
    fn test_owned_accessors() {
        let owners = Arc::new(MemoryOwnerStore::new());
        let r = Resolver::builder(Config::with_namespace("myapp_"))
            .key("k")
            .store(Arc::new(MemoryStore::new()))
            .owner_store(owners.clone())
            .overrides(StaticOverrides::new())
            .build()
            .unwrap();

        r.set_owned(7, "token", "alice-token").unwrap();
        r.set_owned(8, "token", "bob-token").unwrap();
        assert!(r.is_encrypted(&owners.get(7, "myapp_token").unwrap()));
        assert_eq!(r.get_owned(7, "token", ""), "alice-token");
        assert_eq!(r.get_owned(8, "token", ""), "bob-token");
        assert_eq!(r.get_owned(9, "token", "none"), "none");
    }

    #[test]
    fn test_missing_optional_stores() {
        let r = resolver(Arc::new(MemoryStore::new()), StaticOverrides::new());
        assert!(matches!(
            r.set_expiring("a", "b", Duration::from_secs(1)),
            Err(Error::Config(ConfigError::MissingStore(_)))
        ));
        assert!(matches!(
            r.set_owned(1, "a", "b"),
            Err(Error::Config(ConfigError::MissingStore(_)))
        ));
        assert_eq!(r.get_expiring("a", "d"), "d");
        assert_eq!(r.get_owned(1, "a", "d"), "d");
    }
}
