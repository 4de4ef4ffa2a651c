//! Strongbox - encryption at rest for key/value settings.
//!
//! Values are stored as self-describing tokens,
//! `__ENCRYPTED__` + base64(IV + AES-256-CBC ciphertext), in whatever
//! key-value store the host provides. Reads go through a [`Resolver`] that
//! prefers out-of-band overrides (environment-style constants) over stored
//! data and decrypts on the way out.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Demo command-line interface
//! │   ├── cipher        # encrypt / decrypt / check
//! │   ├── values        # set / get / list through the resolver
//! │   └── output        # Terminal output helpers
//! └── core/             # Core library components
//!     ├── cipher/       # Token cipher
//!     │   ├── mod       # Cipher trait
//!     │   ├── aes_cbc   # AES-256-CBC implementation
//!     │   └── key       # Key derivation
//!     ├── resolver/     # Override precedence, decrypt-on-read, interception
//!     ├── store/        # Storage collaborator traits and reference stores
//!     ├── overrides     # Override sources
//!     ├── config        # .strongbox.toml
//!     └── global        # Explicitly initialized default resolver
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use strongbox::core::config::Config;
//! use strongbox::core::overrides::StaticOverrides;
//! use strongbox::core::store::{MemoryStore, Store};
//! use strongbox::Resolver;
//!
//! let store = Arc::new(MemoryStore::new());
//! let resolver = Resolver::builder(Config::with_namespace("myapp_"))
//!     .key("key material")
//!     .store(store.clone())
//!     .overrides(StaticOverrides::new())
//!     .build()?;
//!
//! resolver.set("api_key", "sk_live_123")?;
//! assert!(store.get("myapp_api_key").unwrap().starts_with("__ENCRYPTED__"));
//! assert_eq!(resolver.get("api_key", ""), "sk_live_123");
//! # Ok::<(), strongbox::error::Error>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::cipher::{AesCbc, Cipher, EncryptionKey};
pub use crate::core::resolver::{Resolved, Resolver, SetOutcome, Source};
pub use crate::error::{Error, Result};
