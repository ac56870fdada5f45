//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::init::InitArgs;
use super::commands::serve::ServeArgs;

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(name = "capsync")]
#[command(about = "capsync - contractor pause-state reconciliation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file, replacing .capsync/config.yaml and .capsync/local.yaml
    #[arg(short, long, global = true, env = "CAPSYNC_CONFIG")]
    pub config: Option<PathBuf>,
}

/// capsync subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create .capsync/ with a default config file
    Init(InitArgs),

    /// Serve the HTTP trigger (GET /run, GET /health)
    Serve(ServeArgs),

    /// Perform one reconciliation run and print the outcome
    Run,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["capsync", "serve", "--port", "9000"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(9000));
                assert!(args.host.is_none());
            }
            other => panic!("Expected serve, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["capsync", "run", "--json", "--config", "ops.yaml"]).unwrap();
        assert!(matches!(cli.command, Commands::Run));
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("ops.yaml")));
    }
}
