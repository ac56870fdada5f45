//! Credentials read from the process environment.
//!
//! Values are resolved on every call, never at boot, so rotating a secret
//! only needs the environment to change before the next trigger.

use std::env;

use crate::domain::errors::RunError;
use crate::domain::models::{ConsoleCredentials, CredentialsConfig};
use crate::domain::ports::CredentialStore;

/// Reads console and service-account credentials from named variables.
#[derive(Debug, Clone)]
pub struct EnvCredentialStore {
    principal_env: String,
    secret_env: String,
    service_account_env: String,
}

impl EnvCredentialStore {
    /// Store reading the variables named in `config`.
    pub fn new(config: &CredentialsConfig) -> Self {
        Self {
            principal_env: config.principal_env.clone(),
            secret_env: config.secret_env.clone(),
            service_account_env: config.service_account_env.clone(),
        }
    }

    /// Variable holding the service-account key JSON. The Sheets client
    /// reads it per request.
    pub fn service_account_env(&self) -> &str {
        &self.service_account_env
    }
}

impl CredentialStore for EnvCredentialStore {
    fn console_credentials(&self) -> Result<ConsoleCredentials, RunError> {
        match (read_non_empty(&self.principal_env), read_non_empty(&self.secret_env)) {
            (Some(principal), Some(secret)) => Ok(ConsoleCredentials { principal, secret }),
            _ => Err(RunError::Configuration(format!(
                "Missing environment variables: {} or {}",
                self.principal_env, self.secret_env
            ))),
        }
    }
}

fn read_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> EnvCredentialStore {
        EnvCredentialStore::new(&CredentialsConfig::default())
    }

    #[test]
    fn test_reads_console_credentials() {
        temp_env::with_vars(
            [("EMAIL", Some("ops@example.com")), ("PASSWORD", Some("pw"))],
            || {
                let creds = store().console_credentials().unwrap();
                assert_eq!(creds.principal, "ops@example.com");
                assert_eq!(creds.secret, "pw");
            },
        );
    }

    #[test]
    fn test_missing_password_is_configuration_error() {
        temp_env::with_vars(
            [("EMAIL", Some("ops@example.com")), ("PASSWORD", None::<&str>)],
            || {
                let err = store().console_credentials().unwrap_err();
                assert!(matches!(err, RunError::Configuration(_)));
                assert_eq!(
                    err.to_string(),
                    "Missing environment variables: EMAIL or PASSWORD"
                );
            },
        );
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        temp_env::with_vars([("EMAIL", Some("  ")), ("PASSWORD", Some("pw"))], || {
            assert!(store().console_credentials().is_err());
        });
    }

    #[test]
    fn test_custom_variable_names() {
        let config = CredentialsConfig {
            principal_env: "CAPSYNC_TEST_USER".to_string(),
            secret_env: "CAPSYNC_TEST_PASS".to_string(),
            service_account_env: "CAPSYNC_TEST_KEY".to_string(),
        };
        temp_env::with_vars(
            [
                ("CAPSYNC_TEST_USER", Some("bot")),
                ("CAPSYNC_TEST_PASS", Some("pw")),
                ("CAPSYNC_TEST_KEY", None),
            ],
            || {
                let store = EnvCredentialStore::new(&config);
                assert_eq!(store.console_credentials().unwrap().principal, "bot");
                assert_eq!(store.service_account_env(), "CAPSYNC_TEST_KEY");
            },
        );
    }
}
