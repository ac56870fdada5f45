use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::error::SheetsError;

/// Google's OAuth token endpoint, used when the key names none.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a Google service-account key file that signing needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account identity, the JWT issuer
    pub client_email: String,
    /// PEM-encoded RSA key
    pub private_key: String,
    /// Sent as the JWT `kid` header when present
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// Token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Parse a key file, rejecting keys that cannot sign.
    pub fn from_json(json: &str) -> Result<Self, SheetsError> {
        let key: Self =
            serde_json::from_str(json).map_err(|e| SheetsError::InvalidKey(e.to_string()))?;
        if key.client_email.trim().is_empty() {
            return Err(SheetsError::InvalidKey("client_email is empty".to_string()));
        }
        if !key.private_key.contains("PRIVATE KEY") {
            return Err(SheetsError::InvalidKey(
                "private_key is not a PEM private key".to_string(),
            ));
        }
        Ok(key)
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// JWT claims for the OAuth 2.0 JWT-bearer grant.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Service account email
    pub iss: String,
    /// Space-separated OAuth scopes
    pub scope: String,
    /// Token endpoint
    pub aud: String,
    /// Issued at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// Bearer token
    pub access_token: String,
    /// Lifetime in seconds
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

const fn default_expires_in() -> u64 {
    3600
}

/// A block of cell values, as returned by `values.get`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    /// A1 range covered
    #[serde(default)]
    pub range: String,
    /// `ROWS` or `COLUMNS`
    #[serde(default)]
    pub major_dimension: Option<String>,
    /// Absent when the range is empty.
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

/// Render a cell as text; unformatted numbers and booleans are stringified.
pub fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
