use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `server.port` is 0
    #[error("Invalid port: 0")]
    InvalidPort,

    /// A required string setting is empty
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// `console.wait_timeout_ms` is 0
    #[error("Invalid wait_timeout_ms: 0. Must be positive")]
    InvalidWaitTimeout,

    /// Poll interval is 0 or exceeds the wait timeout
    #[error("Invalid poll_interval_ms: {0}. Must be between 1 and wait_timeout_ms ({1})")]
    InvalidPollInterval(u64, u64),

    /// Unknown `logging.level`
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// An entry of `reconcile.excluded_names` is blank
    #[error("Excluded contractor names cannot be blank")]
    BlankExcludedName,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .capsync/config.yaml (project config)
    /// 3. .capsync/local.yaml (local overrides, optional)
    /// 4. Environment variables (CAPSYNC_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".capsync/config.yaml"))
            .merge(Yaml::file(".capsync/local.yaml"))
            .merge(Env::prefixed("CAPSYNC_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring CAPSYNC_* overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("CAPSYNC_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise from the project locations
    pub fn resolve(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Self::load(),
        }
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        let console = &config.console;
        for (field, value) in [
            ("console.webdriver_url", &console.webdriver_url),
            ("console.login_url", &console.login_url),
            ("console.capacity_url", &console.capacity_url),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField(field));
            }
        }

        if console.wait_timeout_ms == 0 {
            return Err(ConfigError::InvalidWaitTimeout);
        }
        if console.poll_interval_ms == 0 || console.poll_interval_ms > console.wait_timeout_ms {
            return Err(ConfigError::InvalidPollInterval(
                console.poll_interval_ms,
                console.wait_timeout_ms,
            ));
        }

        let sheets = &config.sheets;
        for (field, value) in [
            ("sheets.api_base", &sheets.api_base),
            ("sheets.desired_worksheet", &sheets.desired_worksheet),
            ("sheets.log_worksheet", &sheets.log_worksheet),
            ("sheets.name_column", &sheets.name_column),
            ("sheets.status_column", &sheets.status_column),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField(field));
            }
        }

        let credentials = &config.credentials;
        for (field, value) in [
            ("credentials.principal_env", &credentials.principal_env),
            ("credentials.secret_env", &credentials.secret_env),
            ("credentials.service_account_env", &credentials.service_account_env),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField(field));
            }
        }

        if config
            .reconcile
            .excluded_names
            .iter()
            .any(|n| n.trim().is_empty())
        {
            return Err(ConfigError::BlankExcludedName);
        }

        // Log format is an enum and already rejected by serde when invalid
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
