//! Command-line interface.
//!
//! A thin operator tool over the library: settings live in a TOML store
//! file, overrides come from the process environment.

pub mod cipher;
pub mod output;
pub mod values;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::core::config::Config;
use crate::core::constants;
use crate::core::overrides::EnvOverrides;
use crate::core::resolver::Resolver;
use crate::core::store::{FileStore, HookedStore};
use crate::error::Result;

/// Strongbox - encryption at rest for key/value settings.
#[derive(Parser)]
#[command(
    name = "strongbox",
    about = "Encrypt settings at rest, with environment overrides",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to .strongbox.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store file holding encrypted values
    #[arg(long, global = true, default_value = constants::STORE_FILE)]
    pub store: PathBuf,

    /// Explicit key material (overrides configured key sources)
    #[arg(long, global = true, env = constants::KEY_ENV, hide_env_values = true)]
    pub key: Option<String>,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Encrypt a value into a token
    Encrypt {
        /// Plaintext value
        value: String,
    },

    /// Decrypt a token (plaintext passes through unchanged)
    Decrypt {
        /// Token or plaintext
        token: String,
    },

    /// Check whether a value is a token (exit 1 if not)
    Check {
        /// Value to inspect
        value: String,
    },

    /// Encrypt and store a value
    Set {
        /// Logical name (e.g., api_key)
        name: String,
        /// Plaintext value
        value: String,
    },

    /// Resolve a value (override, then store, then default)
    Get {
        /// Logical name
        name: String,
        /// Value returned when nothing else resolves
        #[arg(long, default_value = "")]
        default: String,
        /// Output provenance as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored keys
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Resolver and store opened from CLI flags.
pub struct Context {
    pub resolver: Resolver,
    pub store: Arc<HookedStore<FileStore>>,
}

impl Context {
    /// Load config, open the store file and build the resolver.
    ///
    /// # Errors
    ///
    /// Returns config errors, or `ConfigError::NoKeyMaterial` when neither
    /// `--key` nor any configured key source is available.
    pub fn open(config: Option<&Path>, store: &Path, key: Option<String>) -> Result<Self> {
        let config = match config {
            Some(path) => Config::load(path)?,
            None if Path::new(constants::CONFIG_FILE).exists() => {
                Config::load(Path::new(constants::CONFIG_FILE))?
            }
            None => Config::default(),
        };
        debug!(store = %store.display(), "opening store");

        let store = Arc::new(HookedStore::new(FileStore::new(store)));
        let resolver = Resolver::builder(config)
            .maybe_key(key)
            .hooked_store(store.clone())
            .overrides(EnvOverrides)
            .build()?;

        Ok(Self { resolver, store })
    }
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    let ctx = Context::open(cli.config.as_deref(), &cli.store, cli.key)?;

    use Command::*;
    match cli.command {
        Encrypt { value } => cipher::encrypt(&ctx, &value),
        Decrypt { token } => cipher::decrypt(&ctx, &token),
        Check { value } => cipher::check(&ctx, &value),
        Set { name, value } => values::set(&ctx, &name, &value),
        Get {
            name,
            default,
            json,
        } => values::get(&ctx, &name, &default, json),
        List { json } => values::list(&ctx, json),
    }
}
