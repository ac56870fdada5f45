//! Minimal W3C WebDriver client over HTTP.
//!
//! Covers the commands the console adapter needs: sessions, navigation,
//! element lookup, text, selection state, clicks, keystrokes and synchronous
//! script execution.

use reqwest::{Client as ReqwestClient, Method, Response};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};

use super::error::WebDriverError;

/// JSON key identifying a web element reference.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// The Enter key as a WebDriver keystroke.
pub const ENTER_KEY: &str = "\u{E007}";

/// Element lookup strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// CSS selector
    Css(String),
    /// XPath 1.0 expression
    XPath(String),
}

impl Locator {
    /// Locate by CSS selector.
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Locate by XPath.
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Css(s) => json!({ "using": "css selector", "value": s }),
            Self::XPath(x) => json!({ "using": "xpath", "value": x }),
        }
    }
}

/// Reference to an element in the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef(pub String);

impl ElementRef {
    fn from_value(value: &Value) -> Result<Self, WebDriverError> {
        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(|id| Self(id.to_string()))
            .ok_or_else(|| WebDriverError::UnexpectedResponse(format!("not an element: {value}")))
    }

    /// Encode as a script argument.
    pub fn to_json(&self) -> Value {
        json!({ ELEMENT_KEY: self.0 })
    }
}

/// Browser options for a new session.
#[derive(Debug, Clone, Default)]
pub struct BrowserOptions {
    /// Run Chrome without a window
    pub headless: bool,
    /// Extra Chrome arguments
    pub args: Vec<String>,
}

impl BrowserOptions {
    /// Chrome arguments: the container-friendly defaults plus extras.
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.headless {
            args.push("--headless".to_string());
        }
        args.extend(
            ["--no-sandbox", "--disable-dev-shm-usage", "--disable-gpu"]
                .into_iter()
                .map(String::from),
        );
        for extra in &self.args {
            if !args.contains(extra) {
                args.push(extra.clone());
            }
        }
        args
    }

    fn capabilities(&self) -> Value {
        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": self.chrome_args() }
                }
            }
        })
    }
}

/// Connection to a WebDriver endpoint.
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    http: ReqwestClient,
    base_url: String,
}

impl WebDriverClient {
    /// Client for the endpoint at `base_url`; every command is bounded by
    /// `request_timeout`.
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, WebDriverError> {
        let http = ReqwestClient::builder()
            .timeout(request_timeout)
            .tcp_nodelay(true)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Start a browser session.
    #[instrument(skip_all, fields(headless = options.headless))]
    pub async fn new_session(
        &self,
        options: &BrowserOptions,
    ) -> Result<WebDriverSession, WebDriverError> {
        let url = format!("{}/session", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&options.capabilities())
            .send()
            .await?;
        let value = unwrap_value(response).await?;

        let id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                WebDriverError::UnexpectedResponse(format!("no sessionId in {value}"))
            })?
            .to_string();
        debug!(session_id = %id, "webdriver session created");

        Ok(WebDriverSession {
            http: self.http.clone(),
            session_url: format!("{}/session/{id}", self.base_url),
            id,
        })
    }
}

/// An open browser session.
#[derive(Debug)]
pub struct WebDriverSession {
    http: ReqwestClient,
    session_url: String,
    id: String,
}

impl WebDriverSession {
    /// Session id assigned by the driver.
    pub fn id(&self) -> &str {
        &self.id
    }

    async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, WebDriverError> {
        let url = format!("{}{path}", self.session_url);
        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        unwrap_value(request.send().await?).await
    }

    /// Navigate to `url`.
    pub async fn goto(&self, url: &str) -> Result<(), WebDriverError> {
        self.command(Method::POST, "/url", Some(json!({ "url": url })))
            .await
            .map(drop)
    }

    /// First match; `NoSuchElement` when there is none.
    pub async fn find_element(&self, locator: &Locator) -> Result<ElementRef, WebDriverError> {
        let value = self
            .command(Method::POST, "/element", Some(locator.to_json()))
            .await?;
        ElementRef::from_value(&value)
    }

    /// All matches in document order; an empty list is not an error.
    pub async fn find_elements(
        &self,
        locator: &Locator,
    ) -> Result<Vec<ElementRef>, WebDriverError> {
        let value = self
            .command(Method::POST, "/elements", Some(locator.to_json()))
            .await?;
        element_list(&value)
    }

    /// All matches below `parent`. XPath expressions must start with `./`
    /// to stay relative to it.
    pub async fn find_elements_from(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<Vec<ElementRef>, WebDriverError> {
        let value = self
            .command(
                Method::POST,
                &format!("/element/{}/elements", parent.0),
                Some(locator.to_json()),
            )
            .await?;
        element_list(&value)
    }

    /// Rendered text of an element.
    pub async fn element_text(&self, element: &ElementRef) -> Result<String, WebDriverError> {
        let value = self
            .command(Method::GET, &format!("/element/{}/text", element.0), None)
            .await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WebDriverError::UnexpectedResponse(format!("text was {value}")))
    }

    /// Whether a checkbox or option is selected.
    pub async fn is_selected(&self, element: &ElementRef) -> Result<bool, WebDriverError> {
        let value = self
            .command(Method::GET, &format!("/element/{}/selected", element.0), None)
            .await?;
        value
            .as_bool()
            .ok_or_else(|| WebDriverError::UnexpectedResponse(format!("selected was {value}")))
    }

    /// Click an element.
    pub async fn click(&self, element: &ElementRef) -> Result<(), WebDriverError> {
        self.command(
            Method::POST,
            &format!("/element/{}/click", element.0),
            Some(json!({})),
        )
        .await
        .map(drop)
    }

    /// Type `text` into an element.
    pub async fn send_keys(
        &self,
        element: &ElementRef,
        text: &str,
    ) -> Result<(), WebDriverError> {
        self.command(
            Method::POST,
            &format!("/element/{}/value", element.0),
            Some(json!({ "text": text })),
        )
        .await
        .map(drop)
    }

    /// Run a synchronous script and return its result.
    pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, WebDriverError> {
        self.command(
            Method::POST,
            "/execute/sync",
            Some(json!({ "script": script, "args": args })),
        )
        .await
    }

    /// Scroll the page until `element` is visible.
    pub async fn scroll_into_view(&self, element: &ElementRef) -> Result<(), WebDriverError> {
        self.execute("arguments[0].scrollIntoView();", vec![element.to_json()])
            .await
            .map(drop)
    }

    /// End the session and close the browser.
    pub async fn delete(&self) -> Result<(), WebDriverError> {
        self.command(Method::DELETE, "", None).await.map(drop)
    }
}

fn element_list(value: &Value) -> Result<Vec<ElementRef>, WebDriverError> {
    value
        .as_array()
        .ok_or_else(|| WebDriverError::UnexpectedResponse(format!("not an element list: {value}")))?
        .iter()
        .map(ElementRef::from_value)
        .collect()
}

async fn unwrap_value(response: Response) -> Result<Value, WebDriverError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(WebDriverError::from_response(status, &body));
    }
    let mut parsed: Value = serde_json::from_str(&body)
        .map_err(|e| WebDriverError::UnexpectedResponse(format!("invalid JSON: {e}")))?;
    Ok(parsed
        .get_mut("value")
        .map(Value::take)
        .unwrap_or(Value::Null))
}

/// Quote `text` as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so text holding both quote kinds is built
/// with `concat()`.
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    if !text.contains('"') {
        return format!("\"{text}\"");
    }
    let parts: Vec<String> = text.split('\'').map(|p| format!("'{p}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}
