//! Infrastructure layer module
//!
//! This module contains all infrastructure adapters and external integrations:
//! - Configuration management
//! - Credentials from the process environment
//! - Logging and the local audit mirror
//! - W3C WebDriver client and the console adapter built on it
//! - Google Sheets client, desired-state source and audit log
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod credentials;
pub mod logging;
pub mod setup;
pub mod sheets;
pub mod webdriver;
