//! Process-wide default resolver.
//!
//! Hosts that want free-function access initialize the handle once at
//! startup with [`init`]. Nothing is constructed lazily: using the helpers
//! before `init` is an error, and so is a second `init`.

use std::sync::OnceLock;

use tracing::debug;

use crate::core::resolver::{Resolver, SetOutcome};
use crate::error::{ConfigError, Result};

static DEFAULT: OnceLock<Resolver> = OnceLock::new();

/// Install `resolver` as the process-wide default.
///
/// # Errors
///
/// Returns `ConfigError::AlreadyInitialized` if a default is already set;
/// the given resolver is dropped.
pub fn init(resolver: Resolver) -> Result<&'static Resolver> {
    DEFAULT
        .set(resolver)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    debug!("default resolver initialized");
    self::resolver()
}

/// The process-wide default resolver.
///
/// # Errors
///
/// Returns `ConfigError::NotInitialized` before [`init`].
pub fn resolver() -> Result<&'static Resolver> {
    DEFAULT
        .get()
        .ok_or_else(|| ConfigError::NotInitialized.into())
}

pub fn is_initialized() -> bool {
    DEFAULT.get().is_some()
}

/// [`Resolver::get`] on the default resolver.
///
/// # Errors
///
/// Returns `ConfigError::NotInitialized` before [`init`].
pub fn get(name: &str, default: &str) -> Result<String> {
    Ok(resolver()?.get(name, default))
}

/// [`Resolver::set`] on the default resolver.
///
/// # Errors
///
/// Returns `ConfigError::NotInitialized` before [`init`], or any error from
/// [`Resolver::set`].
pub fn set(name: &str, plaintext: &str) -> Result<SetOutcome> {
    resolver()?.set(name, plaintext)
}
