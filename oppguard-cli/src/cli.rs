//! CLI structure and command definitions.

use crate::commands::{CheckContentCommand, CheckPathCommand, ShowConfigCommand, ValidateCommand};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Check transferred files against storage trust boundaries.
#[derive(Parser)]
#[command(name = "oppguard")]
#[command(version, about = "Check transferred files against storage trust boundaries", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Load this configuration file instead of ~/.oppguard/config.yaml
    #[arg(long, value_name = "PATH", global = true, env = "OPPGUARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ignore OPPGUARD_* and EXTERNAL_STORAGE environment overrides
    #[arg(long, global = true)]
    pub no_env: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Check whether a path or file URI lies inside a trusted storage root
    CheckPath(CheckPathCommand),

    /// Check a URI against the content-provider gates
    CheckContent(CheckContentCommand),

    /// Validate a configuration file
    Validate(ValidateCommand),

    /// Print the effective configuration
    ShowConfig(ShowConfigCommand),
}
