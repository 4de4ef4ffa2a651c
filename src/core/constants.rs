//! Constants used throughout strongbox.
//!
//! Centralizes magic strings and sizes of the token format.

/// Default token prefix marking a value as encrypted.
pub const DEFAULT_PREFIX: &str = "__ENCRYPTED__";

/// AES-256 key length in bytes (SHA-256 digest size).
pub const KEY_LEN: usize = 32;

/// CBC initialization vector length in bytes (AES block size).
pub const IV_LEN: usize = 16;

/// Override identifier reserved for the dedicated encryption secret.
pub const DEDICATED_KEY_ID: &str = "ENCRYPTION_KEY";

/// Long-lived site secrets combined, in this order, when no dedicated
/// secret is defined.
pub const SITE_SECRET_IDS: &[&str] = &["AUTH_KEY", "SECURE_AUTH_KEY", "LOGGED_IN_KEY", "NONCE_KEY"];

/// Configuration file name (.strongbox.toml).
pub const CONFIG_FILE: &str = ".strongbox.toml";

/// Default store file used by the CLI.
pub const STORE_FILE: &str = ".strongbox-store.toml";

/// Environment variable holding explicit key material for the CLI.
pub const KEY_ENV: &str = "STRONGBOX_KEY";

/// Environment variable controlling the log filter.
pub const LOG_ENV: &str = "STRONGBOX_LOG";
