//! CLI arguments for the `pool-registry` binary.

use {
    crate::eth::Address,
    clap::{Parser, Subcommand},
    std::path::PathBuf,
    tracing::level_filters::LevelFilter,
};

/// Load a pool directory from a seed file and query it.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// The log filter.
    #[arg(long, env, default_value = "warn,pool_registry=info")]
    pub log: String,

    /// Events at this level or more verbose go to stdout, the rest to stderr.
    #[arg(long, env, default_value = "error")]
    pub log_stderr_threshold: LevelFilter,

    /// Output log events as JSON.
    #[arg(long, env)]
    pub use_json_logs: bool,

    /// Path to the seed configuration file. This file should be in TOML
    /// format.
    #[arg(long, env)]
    pub config: PathBuf,

    /// Print the collected metrics before exiting.
    #[arg(long)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// The query to run against the loaded directory.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print pool, coin and address counts.
    Summary,
    /// List every pool offering a swap between two coins.
    Find { from: Address, to: Address },
    /// Print the positions of two coins within a pool.
    CoinIndices {
        pool: Address,
        from: Address,
        to: Address,
    },
    /// Print the metadata of a pool.
    Pool { pool: Address },
    /// Print the state of an address provider slot.
    Address { id: u64 },
}
