//! Browser automation over the W3C WebDriver protocol.
//!
//! - `client`: HTTP client for sessions, elements and scripts
//! - `wait`: bounded polling for page conditions
//! - `console`: the contractor console adapter built on the client

pub mod client;
pub mod console;
/// WebDriver error codes
pub mod error;
/// Bounded polling
pub mod wait;

pub use client::{BrowserOptions, ElementRef, Locator, WebDriverClient, WebDriverSession};
pub use console::{WebDriverConsole, WebDriverConsoleSession};
pub use error::WebDriverError;
pub use wait::WaitPolicy;
