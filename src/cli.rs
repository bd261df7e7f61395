//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// koanwatch - rebuilds and checks your koans every time you save one
#[derive(Parser)]
#[command(
    name = "koanwatch",
    about = "Watches koan sources, rebuilds them on save and reports your progress",
    version,
    after_help = "Logs are written to: ~/.local/share/koanwatch/logs/koanwatch.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Build, check every source once, then watch for changes (default)
    Watch,

    /// Build and check every source once, then exit
    Sweep,

    /// List configured sources and whether they are in place
    Sources,

    /// Show koanwatch logs
    Logs {
        /// Number of lines to show
        #[arg(short = 'n', long, default_value = "50")]
        lines: usize,
    },
}

/// Location of the koanwatch log file
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("koanwatch")
        .join("logs")
        .join("koanwatch.log")
}
