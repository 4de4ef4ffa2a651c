//! Test fixtures and constants.

use std::sync::Arc;

use strongbox::core::config::Config;
use strongbox::core::overrides::StaticOverrides;
use strongbox::core::store::MemoryStore;
use strongbox::Resolver;

/// Key material used by tests unless they need a specific key.
pub const TEST_KEY: &str = "test-key-material";

/// Namespace used by library-level tests.
pub const NAMESPACE: &str = "myapp_";

/// Override identifiers consulted by key derivation; removed from child
/// process environments so the host environment cannot leak in.
pub const KEY_SOURCE_VARS: &[&str] = &[
    "STRONGBOX_KEY",
    "ENCRYPTION_KEY",
    "AUTH_KEY",
    "SECURE_AUTH_KEY",
    "LOGGED_IN_KEY",
    "NONCE_KEY",
];

/// Representative plaintexts used across tests.
pub const SAMPLE_VALUES: &[&str] = &[
    "sk_live_123",
    "postgres://user:p@ss@localhost:5432/db",
    "こんにちは世界",
    "🚀🎉💯",
    "line1\nline2\nline3",
    " leading and trailing ",
    "x",
];

/// Resolver over a fresh memory store with the given overrides.
pub fn memory_resolver(overrides: StaticOverrides) -> (Arc<MemoryStore>, Resolver) {
    memory_resolver_with_key(TEST_KEY, overrides)
}

/// Resolver over a fresh memory store with a specific key.
pub fn memory_resolver_with_key(
    key: &str,
    overrides: StaticOverrides,
) -> (Arc<MemoryStore>, Resolver) {
    let store = Arc::new(MemoryStore::new());
    let resolver = Resolver::builder(Config::with_namespace(NAMESPACE))
        .key(key)
        .store(store.clone())
        .overrides(overrides)
        .build()
        .expect("failed to build resolver");
    (store, resolver)
}
