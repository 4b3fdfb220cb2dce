// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `lvs`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lvs",
    version,
    about = "Drive the Linux virtual server table through ipvsadm.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Lvs.toml` in the current working directory if it exists,
    /// otherwise built-in defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LVS_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: LvsCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum LvsCommand {
    /// Verify that ipvsadm is installed.
    Check,
    /// Check ipvsadm and restore the configured services.
    Load,
    /// Remove all virtual services.
    Clear,
    /// Replace the table with the configured services.
    Restore,
    /// Print the current table in restore format.
    Save,
    /// Reset packet and byte counters.
    Zero,
    /// Apply the `[timeouts]` section.
    SetTimeouts,
    /// Start the connection sync daemon (master and backup).
    StartDaemon,
    /// Stop the connection sync daemon (master and backup).
    StopDaemon,
    /// Print the restore script for the configured services without running anything.
    PrintRules,
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
