//! Main CLI parser and top-level argument handling.

use clap::Parser;
use std::path::PathBuf;

use crate::commands::Commands;

/// Command-line interface for the toolhub gateway.
#[derive(Parser)]
#[command(name = "toolhub")]
#[command(about = "Route tool calls to registered backend servers")]
#[command(version)]
pub struct Cli {
    /// Gateway configuration file (JSON)
    #[arg(short = 'c', long = "config", env = "TOOLHUB_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
