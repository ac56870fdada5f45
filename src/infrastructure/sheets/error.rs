use thiserror::Error;

use crate::domain::errors::RunError;

/// Errors from the Google Sheets adapter.
#[derive(Error, Debug)]
pub enum SheetsError {
    /// The environment variable holding the service-account key is unset
    #[error("Missing environment variable: {0}")]
    MissingCredentials(String),

    /// The service-account key is not valid JSON or lacks required fields
    #[error("Invalid service account key: {0}")]
    InvalidKey(String),

    /// `sheets.spreadsheet_id` is empty
    #[error("sheets.spreadsheet_id is not configured")]
    MissingSpreadsheetId,

    /// The JWT assertion could not be signed
    #[error("Failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// The token endpoint refused the assertion
    #[error("Token exchange failed (HTTP {status}): {message}")]
    Auth {
        /// HTTP status
        status: u16,
        /// Response body, scrubbed
        message: String,
    },

    /// The values API returned an error
    #[error("Sheets API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status
        status: u16,
        /// Response body, scrubbed
        message: String,
    },

    /// Google could not be reached
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A configured base URL does not parse
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A required column is absent from the header row
    #[error("worksheet {worksheet:?} has no {column:?} column")]
    MissingColumn {
        /// Worksheet title
        worksheet: String,
        /// Expected header
        column: String,
    },
}

impl SheetsError {
    /// Whether the failure is a local setup problem rather than a remote one.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials(_)
                | Self::InvalidKey(_)
                | Self::MissingSpreadsheetId
                | Self::InvalidUrl(_)
        )
    }

    /// Configuration problems become [`RunError::Configuration`]; everything
    /// else is wrapped with `wrap`.
    pub fn into_run_error(self, wrap: fn(String) -> RunError) -> RunError {
        if self.is_configuration() {
            RunError::Configuration(self.to_string())
        } else {
            wrap(self.to_string())
        }
    }
}
