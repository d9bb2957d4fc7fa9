// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `nodeman`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "nodeman",
    version,
    about = "Manage the lifecycle of containerized blockchain node targets.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If omitted, `Nodeman.toml` in the current working directory is used
    /// when present, otherwise the compiled-in defaults apply.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `NODEMAN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

/// Operations exposed on the command line.
///
/// Every subcommand takes the target as a plain string; the manager rejects
/// anything outside the fixed target set before doing any work.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start a target's node container, building the image first if absent.
    Start { target: String },

    /// Stop and remove a target's node container.
    Stop { target: String },

    /// Restart a target's node container.
    Restart { target: String },

    /// Report whether a target is running or building.
    Status { target: String },

    /// Tail a target's container logs.
    Logs {
        target: String,

        /// Number of log lines to fetch (1..=10000).
        #[arg(long, default_value_t = 100)]
        lines: u32,
    },

    /// Query the target node's blockchain sync status over RPC.
    ChainInfo { target: String },

    /// Print the target node's configuration file.
    ConfigGet { target: String },

    /// Replace the target node's configuration file.
    ConfigSet {
        target: String,

        /// File with the new content (`-` reads stdin).
        file: String,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
