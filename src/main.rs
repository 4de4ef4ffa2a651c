//! Strongbox - encryption at rest for key/value settings.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use strongbox::cli::output;
use strongbox::cli::{execute, Cli};
use strongbox::core::constants;
use strongbox::error::{ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("strongbox=debug")
        } else {
            EnvFilter::new("strongbox=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Config(ConfigError::NoKeyMaterial { .. }) => {
                Some("pass --key or set STRONGBOX_KEY")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
