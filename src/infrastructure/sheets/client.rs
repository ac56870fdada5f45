use reqwest::{Client as ReqwestClient, RequestBuilder, Response, Url};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};

use super::auth::{KeySource, TokenProvider};
use super::error::SheetsError;
use super::models::ValueRange;
use crate::domain::models::SheetsConfig;
use crate::infrastructure::logging::scrub;

/// Google Sheets v4 values API for one spreadsheet.
pub struct SheetsClient {
    http: ReqwestClient,
    api_base: String,
    spreadsheet_id: String,
    auth: TokenProvider,
}

impl SheetsClient {
    /// Client for the configured spreadsheet. The key is not read until the
    /// first request.
    pub fn new(config: &SheetsConfig, key: KeySource) -> Result<Self, SheetsError> {
        let http = ReqwestClient::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            auth: TokenProvider::new(http.clone(), key, config.token_uri.clone()),
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            spreadsheet_id: config.spreadsheet_id.trim().to_string(),
        })
    }

    /// URL of `.../spreadsheets/{id}/values/{range}{suffix}`, percent-encoded.
    fn values_url(&self, range: &str, suffix: &str) -> Result<Url, SheetsError> {
        if self.spreadsheet_id.is_empty() {
            return Err(SheetsError::MissingSpreadsheetId);
        }
        let mut url =
            Url::parse(&self.api_base).map_err(|e| SheetsError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| SheetsError::InvalidUrl(self.api_base.clone()))?
            .pop_if_empty()
            .extend(["spreadsheets", self.spreadsheet_id.as_str(), "values"])
            .push(&format!("{}{suffix}", sheet_range(range)));
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, SheetsError> {
        let token = self.auth.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SheetsError::Api {
            status: status.as_u16(),
            message: scrub(&api_error_message(&body)).into_owned(),
        })
    }

    /// Every populated cell of `worksheet`, row by row.
    #[instrument(skip(self))]
    pub async fn get_values(&self, worksheet: &str) -> Result<ValueRange, SheetsError> {
        let url = self.values_url(worksheet, "")?;
        let response = self.send(self.http.get(url)).await?;
        let range: ValueRange = response.json().await?;
        debug!(rows = range.values.len(), "worksheet read");
        Ok(range)
    }

    /// Append `rows` after the last populated row of `worksheet`, parsing
    /// values as if typed by a user.
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub async fn append_rows(
        &self,
        worksheet: &str,
        rows: Vec<Vec<Value>>,
    ) -> Result<(), SheetsError> {
        let url = self.values_url(worksheet, ":append")?;
        let request = self
            .http
            .post(url)
            .query(&[("valueInputOption", "USER_ENTERED"), ("insertDataOption", "INSERT_ROWS")])
            .json(&json!({ "majorDimension": "ROWS", "values": rows }));
        self.send(request).await?;
        Ok(())
    }
}

/// A1 range covering a whole worksheet.
fn sheet_range(worksheet: &str) -> String {
    format!("'{}'", worksheet.replace('\'', "''"))
}

/// Pull `error.message` out of a Google error body, falling back to the body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
