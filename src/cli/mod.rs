//! cli
//!
//! Command-line interface layer for cordon.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Resolve configuration (file, environment, flags)
//! - Delegate to command handlers
//!
//! The CLI layer is thin: it builds a [`Locker`] and dispatches. All
//! locking semantics live in the library.

pub mod args;
pub mod commands;

pub use args::{Cli, Command};

use std::process::ExitCode;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::locker::Locker;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);

    let mut config = Config::load()?;
    if let Some(url) = cli.url.clone() {
        config.url = url;
    }
    if let Some(namespace) = cli.namespace.clone() {
        config.namespace = namespace;
    }
    if let Some(ttl) = cli.ttl {
        config.default_ttl_secs = ttl;
    }
    config.validate()?;

    let locker = Locker::connect(config)?;
    commands::dispatch(cli.command, &locker)
}

/// Initialize tracing output.
///
/// `--debug` forces debug level; otherwise `RUST_LOG` decides, defaulting
/// to warnings only.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("cordon=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
