//! capsync setup and wiring
//!
//! Handles project initialization (the `.capsync/` directory and a default
//! config file) and assembles a [`RunService`] from a loaded [`Config`].

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::domain::models::Config;
use crate::domain::ports::AuditSink;
use crate::infrastructure::credentials::EnvCredentialStore;
use crate::infrastructure::logging::{FanOutAuditSink, JsonlAuditSink};
use crate::infrastructure::sheets::{
    KeySource, SheetsAuditSink, SheetsClient, SheetsDesiredStateSource,
};
use crate::infrastructure::webdriver::WebDriverConsole;
use crate::services::{Reconciler, RunService};

/// Default configuration template content
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# capsync configuration
# Override settings by editing this file, adding .capsync/local.yaml, or
# setting environment variables with the CAPSYNC_ prefix
#
# Example environment variables:
#   export CAPSYNC_SHEETS__SPREADSHEET_ID=1AbC...
#   export CAPSYNC_CONSOLE__WEBDRIVER_URL=http://selenium:4444
#   export CAPSYNC_LOGGING__LEVEL=debug
#
# Credentials never go in this file. They are read from the environment
# variables named under `credentials` each time a run starts.

# HTTP trigger
server:
  host: "0.0.0.0"
  port: 8080

# Remote console, driven through a WebDriver endpoint
console:
  webdriver_url: "http://localhost:9515"
  login_url: "https://premieragent.zillow.com/crm/"
  capacity_url: "https://premieragent.zillow.com/leads/routing/agent-capacity"
  headless: true
  # Appended to --no-sandbox, --disable-dev-shm-usage, --disable-gpu
  browser_args: []
  login_settle_ms: 5000
  page_settle_ms: 5000
  # Ceiling for any single wait on the page
  wait_timeout_ms: 10000
  poll_interval_ms: 250

# Google Sheets
sheets:
  # Required before the first run
  spreadsheet_id: ""
  desired_worksheet: "Main"
  log_worksheet: "Log"
  name_column: "Contractor Name"
  status_column: "Pause Status"

# Reconciliation policy
reconcile:
  # exact, case_insensitive, normalized
  match_strategy: "exact"
  # Contractors that are never touched
  excluded_names: []

# Environment variable names holding credentials
credentials:
  principal_env: "EMAIL"
  secret_env: "PASSWORD"
  service_account_env: "GSPREAD_CREDENTIALS"

logging:
  # Log level: trace, debug, info, warn, error
  level: "info"
  # Log format: json, pretty
  format: "json"
  # Uncomment to also write rolling JSON log files
  # log_dir: ".capsync/logs"
  rotation: "daily"

# Local copy of every audit row, one JSON object per line, e.g.
#   audit:
#     jsonl_path: ".capsync/audit.jsonl"
audit: {}
"#;

/// Setup paths and directories
pub struct SetupPaths {
    /// The `.capsync/` directory
    pub config_dir: PathBuf,
    /// `.capsync/config.yaml`
    pub config_file: PathBuf,
}

impl SetupPaths {
    /// Get setup paths for the current directory
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::under(&current_dir))
    }

    /// Setup paths rooted at `root`
    pub fn under(root: &Path) -> Self {
        let config_dir = root.join(".capsync");
        Self {
            config_file: config_dir.join("config.yaml"),
            config_dir,
        }
    }

    /// Check if capsync is already initialized
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists()
    }
}

/// Create the configuration directory
pub fn create_config_dir(paths: &SetupPaths) -> Result<()> {
    fs::create_dir_all(&paths.config_dir).context("Failed to create config directory")
}

/// Write the default configuration file; returns whether a file was written
pub fn create_config_file(paths: &SetupPaths, force: bool) -> Result<bool> {
    if paths.config_file.exists() && !force {
        return Ok(false);
    }

    fs::write(&paths.config_file, DEFAULT_CONFIG_TEMPLATE)
        .context("Failed to write config file")?;

    Ok(true)
}

/// Build the production run service: environment credentials, the
/// spreadsheet source and audit log, and a WebDriver-backed console.
pub fn build_run_service(config: &Config) -> Result<RunService> {
    let credentials = EnvCredentialStore::new(&config.credentials);

    let sheets = Arc::new(
        SheetsClient::new(
            &config.sheets,
            KeySource::Env(credentials.service_account_env().to_string()),
        )
        .context("Failed to build Google Sheets client")?,
    );
    let source = SheetsDesiredStateSource::new(Arc::clone(&sheets), &config.sheets);

    let sheet_log: Arc<dyn AuditSink> = Arc::new(SheetsAuditSink::new(sheets, &config.sheets));
    let audit: Arc<dyn AuditSink> = match &config.audit.jsonl_path {
        Some(path) => {
            info!(path = %path.display(), "mirroring audit rows to local file");
            Arc::new(FanOutAuditSink::new(vec![
                sheet_log,
                Arc::new(JsonlAuditSink::new(path.clone())),
            ]))
        }
        None => sheet_log,
    };

    let console =
        WebDriverConsole::new(&config.console).context("Failed to build WebDriver client")?;

    Ok(RunService::new(
        Arc::new(credentials),
        Arc::new(source),
        Arc::new(console),
        audit,
        Reconciler::from_config(&config.reconcile),
    ))
}
