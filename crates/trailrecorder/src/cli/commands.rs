//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Replay command arguments.
#[derive(Debug, Args)]
pub struct ReplayCommand {
    /// JSON-lines file of trail events
    pub file: PathBuf,

    /// Playback speed relative to recorded timestamps (0 = no waiting)
    #[arg(short, long)]
    pub speed: Option<f64>,

    /// Override the map's initial zoom level
    #[arg(short, long)]
    pub zoom: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
