//! AES-256-CBC token backend.
//!
//! Token layout: `prefix || base64(iv || ciphertext)` where `iv` is 16 fresh
//! random bytes per call and `ciphertext` is PKCS#7-padded CBC output.
//! There is no MAC: a token that was tampered with but still unpads cleanly
//! decrypts to garbage instead of failing.

use aes::Aes256;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use tracing::trace;

use super::{Cipher, EncryptionKey};
use crate::core::constants::{DEFAULT_PREFIX, IV_LEN};
use crate::core::types::Token;
use crate::error::{CipherError, ConfigError, Result};

type Encryptor = cbc::Encryptor<Aes256>;
type Decryptor = cbc::Decryptor<Aes256>;

/// Fills a buffer with IV bytes.
pub(crate) type IvSource = fn(&mut [u8]) -> std::result::Result<(), getrandom::Error>;

/// AES-256-CBC cipher engine bound to one key and one token prefix.
pub struct AesCbc {
    key: EncryptionKey,
    prefix: String,
    fill_iv: IvSource,
}

impl AesCbc {
    /// Create an engine with a custom token prefix.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyPrefix` if `prefix` is empty, since every
    /// string would then look encrypted.
    pub fn new(key: EncryptionKey, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix.into());
        }
        Ok(Self {
            key,
            prefix,
            fill_iv: getrandom::getrandom,
        })
    }

    /// Create an engine using [`DEFAULT_PREFIX`].
    pub fn with_default_prefix(key: EncryptionKey) -> Self {
        Self {
            key,
            prefix: DEFAULT_PREFIX.to_string(),
            fill_iv: getrandom::getrandom,
        }
    }

    /// Replace the key. Tokens written under the old key stay as they are
    /// and will no longer decrypt.
    pub fn change_key(&mut self, key: EncryptionKey) {
        self.key = key;
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[cfg(test)]
    pub(crate) fn with_iv_source(mut self, fill_iv: IvSource) -> Self {
        self.fill_iv = fill_iv;
        self
    }
}

impl std::fmt::Debug for AesCbc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesCbc")
            .field("key", &self.key)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl Cipher for AesCbc {
    fn name(&self) -> &'static str {
        "aes-256-cbc"
    }

    fn encrypt(&self, plaintext: &str) -> Result<Token> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }
        trace!(plaintext_len = plaintext.len(), "encrypting");

        let mut iv = [0u8; IV_LEN];
        (self.fill_iv)(&mut iv).map_err(|e| CipherError::Randomness(e.to_string()))?;

        let ciphertext = Encryptor::new_from_slices(self.key.as_bytes(), &iv)
            .map_err(|e| CipherError::Backend(e.to_string()))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        let mut payload = Vec::with_capacity(IV_LEN + ciphertext.len());
        payload.extend_from_slice(&iv);
        payload.extend_from_slice(&ciphertext);

        trace!(ciphertext_len = ciphertext.len(), "encrypted");

        Ok(format!("{}{}", self.prefix, STANDARD.encode(&payload)))
    }

    fn decrypt(&self, input: &str) -> Result<String> {
        if input.is_empty() {
            return Ok(String::new());
        }
        let Some(body) = input.strip_prefix(self.prefix.as_str()) else {
            return Ok(input.to_string());
        };
        trace!(token_len = input.len(), "decrypting");

        let payload = STANDARD
            .decode(body)
            .map_err(|e| CipherError::MalformedToken(e.to_string()))?;
        if payload.len() < IV_LEN {
            return Err(CipherError::MalformedToken(format!(
                "payload is {} bytes, shorter than the {}-byte IV",
                payload.len(),
                IV_LEN
            ))
            .into());
        }
        let (iv, ciphertext) = payload.split_at(IV_LEN);

        let plaintext = Decryptor::new_from_slices(self.key.as_bytes(), iv)
            .map_err(|e| CipherError::Backend(e.to_string()))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|e| CipherError::Backend(e.to_string()))?;

        trace!(plaintext_len = plaintext.len(), "decrypted");

        String::from_utf8(plaintext)
            .map_err(|e| CipherError::Backend(format!("UTF-8 error: {}", e)).into())
    }

    fn is_encrypted(&self, value: &str) -> bool {
        value.starts_with(self.prefix.as_str())
    }
}
