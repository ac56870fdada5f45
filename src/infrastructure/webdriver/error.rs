use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::domain::errors::{EntityError, RunError};
use crate::infrastructure::logging::scrub;

/// Errors returned by the WebDriver client.
#[derive(Error, Debug)]
pub enum WebDriverError {
    /// `no such element`
    #[error("no such element: {0}")]
    NoSuchElement(String),

    /// `stale element reference`
    #[error("stale element reference: {0}")]
    StaleElement(String),

    /// `element not interactable` or `element click intercepted`
    #[error("element not interactable: {0}")]
    NotInteractable(String),

    /// `session not created`
    #[error("session not created: {0}")]
    SessionNotCreated(String),

    /// Any other W3C error code
    #[error("webdriver error {code} (HTTP {status}): {message}")]
    Protocol {
        /// HTTP status
        status: u16,
        /// W3C error code
        code: String,
        /// Driver message, scrubbed
        message: String,
    },

    /// A bounded wait ran out
    #[error("gave up waiting for {what} after {}ms", .waited.as_millis())]
    Timeout {
        /// What was being waited for
        what: String,
        /// Time spent polling
        waited: Duration,
    },

    /// The driver could not be reached
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response without the expected payload
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl WebDriverError {
    /// Returns true if the page may still be settling and polling again can help.
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NoSuchElement(_) | Self::StaleElement(_) | Self::NotInteractable(_)
        )
    }

    /// Build an error from a non-success response body.
    ///
    /// The W3C error object is `{"value": {"error": ..., "message": ...}}`.
    /// Messages are scrubbed because drivers echo typed text back.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let value = parsed.as_ref().and_then(|v| v.get("value"));
        let code = value
            .and_then(|v| v.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        let message = value
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
            .map_or_else(|| body.to_string(), str::to_string);
        let message = scrub(&message).into_owned();

        match code.as_str() {
            "no such element" => Self::NoSuchElement(message),
            "stale element reference" => Self::StaleElement(message),
            "element not interactable" | "element click intercepted" => {
                Self::NotInteractable(message)
            }
            "session not created" => Self::SessionNotCreated(message),
            _ => Self::Protocol {
                status: status.as_u16(),
                code,
                message,
            },
        }
    }

    /// Map to a per-entity error, using `wrap` for everything but timeouts.
    pub fn into_entity(self, wrap: fn(String) -> EntityError) -> EntityError {
        match self {
            Self::Timeout { what, waited } => EntityError::Timeout { what, waited },
            other => wrap(other.to_string()),
        }
    }
}

impl From<WebDriverError> for RunError {
    fn from(err: WebDriverError) -> Self {
        Self::Session(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_response_maps_w3c_codes() {
        let body = json!({ "value": {
            "error": "no such element",
            "message": "Unable to locate element",
            "stacktrace": ""
        } })
        .to_string();
        let err = WebDriverError::from_response(StatusCode::NOT_FOUND, &body);
        assert!(
            matches!(err, WebDriverError::NoSuchElement(ref m) if m == "Unable to locate element")
        );
        assert!(err.is_transient());

        let body = r#"{"value":{"error":"invalid session id","message":"session deleted"}}"#;
        let err = WebDriverError::from_response(StatusCode::NOT_FOUND, body);
        match err {
            WebDriverError::Protocol { status, code, .. } => {
                assert_eq!(status, 404);
                assert_eq!(code, "invalid session id");
            }
            other => panic!("Expected Protocol error, got {other:?}"),
        }
    }

    #[test]
    fn test_click_intercepted_is_transient() {
        let body = json!({ "value": {
            "error": "element click intercepted",
            "message": "other element would receive the click"
        } })
        .to_string();
        assert!(WebDriverError::from_response(StatusCode::BAD_REQUEST, &body).is_transient());
    }

    #[test]
    fn test_non_json_body_kept_as_message() {
        let err = WebDriverError::from_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(err.to_string().contains("upstream down"));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_message_is_scrubbed() {
        let body = json!({ "value": {
            "error": "invalid argument",
            "message": r#"bad payload {"text":"hunter2"}"#
        } })
        .to_string();
        let err = WebDriverError::from_response(StatusCode::BAD_REQUEST, &body);
        assert!(!err.to_string().contains("hunter2"));
    }

    #[test]
    fn test_into_entity_keeps_timeouts() {
        let err = WebDriverError::Timeout {
            what: "pause checkbox".to_string(),
            waited: Duration::from_millis(500),
        };
        assert!(matches!(
            err.into_entity(EntityError::Observe),
            EntityError::Timeout { .. }
        ));

        let err = WebDriverError::NoSuchElement("gone".to_string());
        assert!(matches!(
            err.into_entity(EntityError::Locate),
            EntityError::Locate(_)
        ));
    }
}
