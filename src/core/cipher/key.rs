//! Encryption key derivation.
//!
//! The key is the SHA-256 digest of whichever key material is found first:
//! explicit material from the caller, the dedicated secret, or the site
//! secrets concatenated in configured order.

use std::fmt;

use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::core::config::KeySettings;
use crate::core::constants::KEY_LEN;
use crate::core::overrides::OverrideSource;
use crate::error::{ConfigError, Result};

/// Where the key material came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Explicit,
    Dedicated,
    SiteSecrets,
}

/// A 32-byte AES-256 key, zeroed on drop.
pub struct EncryptionKey([u8; KEY_LEN]);

impl EncryptionKey {
    /// Hash arbitrary key material down to a 32-byte key.
    pub fn from_material(material: &[u8]) -> Self {
        Self(Sha256::digest(material).into())
    }

    /// Derive the key from the first available source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoKeyMaterial` when no source yields material.
    pub fn derive(
        explicit: Option<&str>,
        settings: &KeySettings,
        overrides: &dyn OverrideSource,
    ) -> Result<Self> {
        let (key, source) = Self::derive_with_source(explicit, settings, overrides)?;
        debug!(source = ?source, "derived encryption key");
        Ok(key)
    }

    /// Like [`derive`](Self::derive), also reporting which source was used.
    pub fn derive_with_source(
        explicit: Option<&str>,
        settings: &KeySettings,
        overrides: &dyn OverrideSource,
    ) -> Result<(Self, KeySource)> {
        if let Some(material) = explicit.filter(|m| !m.is_empty()) {
            return Ok((Self::from_material(material.as_bytes()), KeySource::Explicit));
        }

        if let Some(secret) = overrides
            .lookup(&settings.dedicated)
            .map(Zeroizing::new)
            .filter(|s| !s.is_empty())
        {
            return Ok((Self::from_material(secret.as_bytes()), KeySource::Dedicated));
        }

        if let Some(combined) = site_secrets(&settings.site_secrets, overrides) {
            return Ok((
                Self::from_material(combined.as_bytes()),
                KeySource::SiteSecrets,
            ));
        }

        Err(ConfigError::NoKeyMaterial {
            dedicated: settings.dedicated.clone(),
        }
        .into())
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Concatenate every configured site secret, or `None` if any is missing.
fn site_secrets(ids: &[String], overrides: &dyn OverrideSource) -> Option<Zeroizing<String>> {
    if ids.is_empty() {
        return None;
    }

    let mut combined = Zeroizing::new(String::new());
    for id in ids {
        let value = Zeroizing::new(overrides.lookup(id)?);
        if value.is_empty() {
            return None;
        }
        combined.push_str(&value);
    }
    Some(combined)
}

impl Drop for EncryptionKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey([REDACTED])")
    }
}
