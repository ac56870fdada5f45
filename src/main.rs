//! capsync CLI entry point.

use anyhow::Result;
use clap::Parser;
use std::path::Path;

use capsync::cli::{commands, handle_error, Cli, Commands};
use capsync::domain::models::Config;
use capsync::infrastructure::config::ConfigLoader;
use capsync::infrastructure::logging::LoggerImpl;

/// Load configuration and install the global subscriber. The logger must
/// outlive the command so buffered file output is flushed.
fn bootstrap(config_path: Option<&Path>) -> Result<(Config, LoggerImpl)> {
    let config = ConfigLoader::resolve(config_path)?;
    let logger = LoggerImpl::init(&config.logging)?;
    Ok((config, logger))
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Init(ref args) => commands::init::execute(args, cli.json),
        Commands::Serve(args) => {
            let (config, _logger) = bootstrap(config_path)?;
            commands::serve::execute(args, config).await
        }
        Commands::Run => {
            let (config, _logger) = bootstrap(config_path)?;
            commands::run::execute(&config, cli.json).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = dispatch(cli).await {
        handle_error(err, json);
    }
}
