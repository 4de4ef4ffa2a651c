//! Out-of-band override lookup.
//!
//! An override is a value defined outside the store (typically an
//! environment variable) that wins over anything stored under the same
//! logical name. The host decides where overrides come from by supplying an
//! [`OverrideSource`] at construction time.

use std::collections::BTreeMap;

/// Lookup of override values by identifier.
///
/// Implemented for the process environment, for fixed maps, and for any
/// closure `Fn(&str) -> Option<String>`.
pub trait OverrideSource: Send + Sync {
    /// Value defined for `id`, if any.
    fn lookup(&self, id: &str) -> Option<String>;

    /// Whether `id` is defined at all, empty values included.
    fn has(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }
}

impl<F> OverrideSource for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn lookup(&self, id: &str) -> Option<String> {
        self(id)
    }
}

/// Overrides read from process environment variables.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvOverrides;

impl OverrideSource for EnvOverrides {
    fn lookup(&self, id: &str) -> Option<String> {
        std::env::var(id).ok()
    }
}

/// Overrides from a fixed map, for tests and embedded hosts.
#[derive(Debug, Default, Clone)]
pub struct StaticOverrides {
    values: BTreeMap<String, String>,
}

impl StaticOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an override, replacing any previous value for `id`.
    pub fn with(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(id.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for StaticOverrides
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl OverrideSource for StaticOverrides {
    fn lookup(&self, id: &str) -> Option<String> {
        self.values.get(id).cloned()
    }
}

/// Overrides that never resolve.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOverrides;

impl OverrideSource for NoOverrides {
    fn lookup(&self, _id: &str) -> Option<String> {
        None
    }
}
