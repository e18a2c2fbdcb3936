//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! Available on all commands, overriding config-file and environment
//! values:
//! - `--url <url>`: Redis URL
//! - `--namespace <ns>`: key namespace
//! - `--ttl <seconds>`: TTL for acquisitions (fractional allowed)
//! - `--debug`: enable debug logging

use clap::{Parser, Subcommand};

/// cordon - distributed work locks over Redis sorted sets
#[derive(Parser, Debug)]
#[command(name = "cordon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Redis URL (overrides config and CORDON_URL/REDIS_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Key namespace (overrides config and CORDON_NAMESPACE)
    #[arg(long, global = true)]
    pub namespace: Option<String>,

    /// TTL in seconds for acquisitions (overrides config and CORDON_TTL)
    #[arg(long, global = true)]
    pub ttl: Option<f64>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Acquire a lock: the last segment is the lock id, the preceding
    /// segments form its namespace path
    #[command(after_help = "\
EXAMPLES:
    # Hold 'nightly' under <namespace>:app:reports for the configured TTL
    cordon acquire app reports nightly

    # Same lock, explicit one-hour TTL
    cordon --ttl 3600 acquire app reports nightly

Exits 0 when the id was newly acquired, 1 when it is already held.")]
    Acquire {
        /// Namespace segments followed by the lock id (at least two)
        #[arg(required = true, num_args = 1..)]
        path: Vec<String>,
    },

    /// Release a lock
    Release {
        /// Namespace segments followed by the lock id (at least two)
        #[arg(required = true, num_args = 1..)]
        path: Vec<String>,
    },

    /// Show whether a lock is actively held
    Status {
        /// Namespace segments followed by the lock id (at least two)
        #[arg(required = true, num_args = 1..)]
        path: Vec<String>,
    },

    /// List the active ids in a lock set
    Members {
        /// Namespace segments identifying the lock set
        #[arg(required = true, num_args = 1..)]
        namespace: Vec<String>,
    },

    /// Count entries in a lock set
    Size {
        /// Namespace segments identifying the lock set
        #[arg(required = true, num_args = 1..)]
        namespace: Vec<String>,

        /// Report the raw cardinality without cleaning up expired entries
        #[arg(long)]
        raw: bool,
    },

    /// Remove expired entries from a lock set
    FlushExpired {
        /// Namespace segments identifying the lock set
        #[arg(required = true, num_args = 1..)]
        namespace: Vec<String>,
    },

    /// Delete a lock set entirely
    Flush {
        /// Namespace segments identifying the lock set
        #[arg(required = true, num_args = 1..)]
        namespace: Vec<String>,
    },

    /// List every lock key under the configured namespace
    Keys,
}
