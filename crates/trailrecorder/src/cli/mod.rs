//! Command-line interface for trailrecorder.
//!
//! This module provides the CLI structure for the `trailrec` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, OutputFormat, ReplayCommand};

/// trailrec - Record and replay live map trails
///
/// Feeds recorded pointer/GPS event streams through the trail recorder on a
/// headless map and reports what ended up on screen.
#[derive(Debug, Parser)]
#[command(name = "trailrec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay a JSON-lines event file through the recorder
    Replay(ReplayCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Config(ConfigCommand::Path),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "trailrec");
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_replay() {
        let cli = Cli::try_parse_from(["trailrec", "replay", "walk.jsonl"]).unwrap();
        match cli.command {
            Command::Replay(cmd) => {
                assert_eq!(cmd.file, PathBuf::from("walk.jsonl"));
                assert_eq!(cmd.speed, None);
                assert_eq!(cmd.zoom, None);
                assert_eq!(cmd.format, OutputFormat::Plain);
            }
            Command::Config(_) => panic!("expected replay"),
        }
    }

    #[test]
    fn test_parse_replay_with_options() {
        let cli = Cli::try_parse_from([
            "trailrec", "replay", "walk.jsonl", "--speed", "4", "--zoom", "16", "-f", "json",
        ])
        .unwrap();
        match cli.command {
            Command::Replay(cmd) => {
                assert_eq!(cmd.speed, Some(4.0));
                assert_eq!(cmd.zoom, Some(16.0));
                assert_eq!(cmd.format, OutputFormat::Json);
            }
            Command::Config(_) => panic!("expected replay"),
        }
    }

    #[test]
    fn test_parse_replay_requires_file() {
        assert!(Cli::try_parse_from(["trailrec", "replay"]).is_err());
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["trailrec", "config", "show", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }

    #[test]
    fn test_parse_with_global_flags() {
        let cli = Cli::try_parse_from(["trailrec", "-c", "/custom/config.toml", "-vv", "config", "path"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.verbose, 2);
    }
}
