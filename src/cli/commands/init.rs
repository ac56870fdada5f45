//! Implementation of the `capsync init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::setup::{create_config_dir, create_config_file, SetupPaths};

/// Arguments for `capsync init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

/// Result of `capsync init`.
#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    /// Whether a config file was written
    pub success: bool,
    /// What happened
    pub message: String,
    /// Path of the config file
    pub config_file: PathBuf,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        if self.success {
            format!(
                "{}\n\nEdit {} and set sheets.spreadsheet_id before the first run.",
                self.message,
                self.config_file.display()
            )
        } else {
            self.message.clone()
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Create `.capsync/` under `args.path` and write the default config.
pub fn run_init(args: &InitArgs) -> Result<InitOutput> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let paths = SetupPaths::under(&target_path);
    let reinitializing = paths.is_initialized();
    create_config_dir(&paths)?;
    let written = create_config_file(&paths, args.force)?;

    let message = match (written, reinitializing) {
        (false, _) => "Project already initialized. Use --force to overwrite the config file.",
        (true, true) => "Config file reset to defaults.",
        (true, false) => "Project initialized successfully.",
    };

    Ok(InitOutput {
        success: written,
        message: message.to_string(),
        config_file: paths.config_file,
    })
}

/// Run `capsync init` and print the outcome.
pub fn execute(args: &InitArgs, json_mode: bool) -> Result<()> {
    let result = run_init(args)?;
    output(&result, json_mode);
    Ok(())
}
