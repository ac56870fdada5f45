use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for capsync
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// HTTP trigger server
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote console (WebDriver) settings
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Spreadsheet settings
    #[serde(default)]
    pub sheets: SheetsConfig,

    /// Reconciliation policy
    #[serde(default)]
    pub reconcile: ReconcileConfig,

    /// Names of the environment variables holding credentials
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Local audit mirror
    #[serde(default)]
    pub audit: AuditConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Remote console configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConsoleConfig {
    /// WebDriver endpoint (chromedriver or a Selenium grid)
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Console login page
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// Page listing contractors and their pause checkboxes
    #[serde(default = "default_capacity_url")]
    pub capacity_url: String,

    /// Run the browser headless
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Extra browser arguments appended to the defaults
    #[serde(default)]
    pub browser_args: Vec<String>,

    /// Delay after submitting the login form, in milliseconds
    #[serde(default = "default_login_settle_ms")]
    pub login_settle_ms: u64,

    /// Delay after opening the capacity page, in milliseconds
    #[serde(default = "default_page_settle_ms")]
    pub page_settle_ms: u64,

    /// Ceiling for any single bounded wait, in milliseconds
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,

    /// Interval between readiness polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_login_url() -> String {
    "https://premieragent.zillow.com/crm/".to_string()
}

fn default_capacity_url() -> String {
    "https://premieragent.zillow.com/leads/routing/agent-capacity".to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_login_settle_ms() -> u64 {
    5000
}

const fn default_page_settle_ms() -> u64 {
    5000
}

const fn default_wait_timeout_ms() -> u64 {
    10_000
}

const fn default_poll_interval_ms() -> u64 {
    250
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            login_url: default_login_url(),
            capacity_url: default_capacity_url(),
            headless: default_true(),
            browser_args: Vec::new(),
            login_settle_ms: default_login_settle_ms(),
            page_settle_ms: default_page_settle_ms(),
            wait_timeout_ms: default_wait_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Google Sheets configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SheetsConfig {
    /// Sheets API v4 base URL
    #[serde(default = "default_sheets_api_base")]
    pub api_base: String,

    /// Overrides the token URI from the service-account key
    #[serde(default)]
    pub token_uri: Option<String>,

    /// Spreadsheet holding both worksheets; required for a run
    #[serde(default)]
    pub spreadsheet_id: String,

    /// Worksheet with desired state
    #[serde(default = "default_desired_worksheet")]
    pub desired_worksheet: String,

    /// Worksheet receiving audit rows
    #[serde(default = "default_log_worksheet")]
    pub log_worksheet: String,

    /// Header of the contractor name column
    #[serde(default = "default_name_column")]
    pub name_column: String,

    /// Header of the pause status column
    #[serde(default = "default_status_column")]
    pub status_column: String,
}

fn default_sheets_api_base() -> String {
    "https://sheets.googleapis.com/v4".to_string()
}

fn default_desired_worksheet() -> String {
    "Main".to_string()
}

fn default_log_worksheet() -> String {
    "Log".to_string()
}

fn default_name_column() -> String {
    "Contractor Name".to_string()
}

fn default_status_column() -> String {
    "Pause Status".to_string()
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_base: default_sheets_api_base(),
            token_uri: None,
            spreadsheet_id: String::new(),
            desired_worksheet: default_desired_worksheet(),
            log_worksheet: default_log_worksheet(),
            name_column: default_name_column(),
            status_column: default_status_column(),
        }
    }
}

/// How desired names are compared to names rendered in the console
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Equal after trimming surrounding whitespace
    #[default]
    Exact,
    /// Trimmed, compared case-insensitively
    CaseInsensitive,
    /// Case-folded, whitespace collapsed, punctuation ignored
    Normalized,
}

/// Reconciliation policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReconcileConfig {
    /// How desired names are compared with rendered labels
    #[serde(default)]
    pub match_strategy: MatchStrategy,

    /// Contractors never touched, compared after trimming
    #[serde(default)]
    pub excluded_names: Vec<String>,
}

/// Environment variable names for credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CredentialsConfig {
    /// Variable holding the console login email
    #[serde(default = "default_principal_env")]
    pub principal_env: String,

    /// Variable holding the console password
    #[serde(default = "default_secret_env")]
    pub secret_env: String,

    /// Variable holding the service-account key JSON
    #[serde(default = "default_service_account_env")]
    pub service_account_env: String,
}

fn default_principal_env() -> String {
    "EMAIL".to_string()
}

fn default_secret_env() -> String {
    "PASSWORD".to_string()
}

fn default_service_account_env() -> String {
    "GSPREAD_CREDENTIALS".to_string()
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            principal_env: default_principal_env(),
            secret_env: default_secret_env(),
            service_account_env: default_service_account_env(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    #[default]
    Json,
    /// Human-readable, multi-line
    Pretty,
}

/// Log file rotation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    /// New file each day
    #[default]
    Daily,
    /// New file each hour
    Hourly,
    /// Single file
    Never,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output format
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for rolling JSON log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Rotation for log files
    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}

/// Local audit mirror configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AuditConfig {
    /// Append every audit row to this JSON-lines file as well
    #[serde(default)]
    pub jsonl_path: Option<PathBuf>,
}
