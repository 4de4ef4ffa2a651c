//! Cryptographic operations.
//!
//! Provides the token cipher abstraction and its AES-256-CBC implementation.
//!
//! ## Token format
//!
//! ```text
//! token := PREFIX || base64std( IV(16 bytes) || AES-256-CBC(key, IV, plaintext) )
//! ```
//!
//! The prefix only marks a value as encrypted, it carries no security.
//! Anything that does not start with it is treated as plaintext.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Cipher` trait
//! 2. Add the implementation in a new file
//! 3. Re-export from this module

use crate::core::types::Token;
use crate::error::Result;

mod aes_cbc;
mod key;

pub use aes_cbc::AesCbc;
pub use key::{EncryptionKey, KeySource};

/// Token cipher trait.
///
/// Implementations must keep `is_encrypted` and `decrypt` in agreement:
/// `decrypt` only decodes values for which `is_encrypted` is true and
/// returns every other value unchanged.
pub trait Cipher: Send + Sync {
    /// Encrypt plaintext into a token.
    ///
    /// Empty input is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::Randomness` if no IV could be generated, or
    /// `CipherError::Backend` if the cipher primitive fails.
    fn encrypt(&self, plaintext: &str) -> Result<Token>;

    /// Decrypt a token back to plaintext.
    ///
    /// Empty input and input without the token prefix are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::MalformedToken` if the token body cannot be
    /// decoded, or `CipherError::Backend` if decryption fails.
    fn decrypt(&self, input: &str) -> Result<String>;

    /// Whether `value` carries the token prefix.
    fn is_encrypted(&self, value: &str) -> bool;

    /// Backend name for display.
    fn name(&self) -> &'static str;
}
