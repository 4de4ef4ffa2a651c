//! Configuration file management.
//!
//! Handles reading and validating `.strongbox.toml`:
//!
//! ```toml
//! prefix = "__ENCRYPTED__"
//! namespace = "myapp_"
//! intercept = true
//!
//! [key]
//! dedicated = "ENCRYPTION_KEY"
//! site_secrets = ["AUTH_KEY", "SECURE_AUTH_KEY", "LOGGED_IN_KEY", "NONCE_KEY"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Literal marker prepended to every token.
    pub prefix: String,
    /// Prepended to logical names to form storage keys.
    pub namespace: Option<String>,
    /// Install read interception for tracked names at build time.
    pub intercept: bool,
    /// Where key material is looked up when none is passed explicitly.
    pub key: KeySettings,
}

/// Override identifiers consulted during key derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeySettings {
    /// Identifier of the dedicated encryption secret.
    pub dedicated: String,
    /// Site secrets concatenated in this order when the dedicated secret is
    /// absent. All of them must be defined.
    pub site_secrets: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: constants::DEFAULT_PREFIX.to_string(),
            namespace: None,
            intercept: false,
            key: KeySettings::default(),
        }
    }
}

impl Default for KeySettings {
    fn default() -> Self {
        Self {
            dedicated: constants::DEDICATED_KEY_ID.to_string(),
            site_secrets: constants::SITE_SECRET_IDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Configuration with a namespace and defaults for everything else.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            ..Self::default()
        }
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML, or a validation error.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` if the file cannot be read, or any
    /// error from [`Config::parse`].
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config = Self::parse(&contents)?;
        debug!(
            namespace = config.namespace.as_deref().unwrap_or(""),
            intercept = config.intercept,
            "config loaded"
        );
        Ok(config)
    }

    /// Validate the configuration contents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyPrefix` or `ConfigError::InvalidNamespace`.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix.into());
        }
        if let Some(ns) = &self.namespace {
            let valid = ns
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if !valid {
                return Err(ConfigError::InvalidNamespace(ns.clone()).into());
            }
        }
        Ok(())
    }
}
