//! Error types.
//!
//! Every fallible operation in the crate returns [`Result`], whose error is
//! the umbrella [`Error`]. Domain-specific enums convert into it with `?`.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of the cipher engine.
#[derive(Error, Debug)]
pub enum CipherError {
    /// The OS random source could not produce an IV.
    #[error("secure random source unavailable: {0}")]
    Randomness(String),

    /// The block cipher rejected the key, input or padding.
    #[error("cipher operation failed: {0}")]
    Backend(String),

    /// The token body is not valid base64 or is too short to hold an IV.
    #[error("malformed token: {0}")]
    MalformedToken(String),
}

/// Configuration and wiring errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no encryption key material available: pass a key, or define {dedicated}, or define all site secrets")]
    NoKeyMaterial { dedicated: String },

    #[error("token prefix must not be empty")]
    EmptyPrefix,

    #[error("invalid namespace: {0} (allowed: ASCII letters, digits, '_' and '-')")]
    InvalidNamespace(String),

    #[error("no {0} configured")]
    MissingStore(&'static str),

    #[error("default resolver already initialized")]
    AlreadyInitialized,

    #[error("default resolver not initialized")]
    NotInitialized,

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Storage collaborator errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read store: {0}")]
    ReadFailed(String),

    #[error("failed to write store: {0}")]
    WriteFailed(String),

    #[error("failed to parse store: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize store: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
