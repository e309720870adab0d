//! Shared types for the Understudy workspace.
//!
//! This crate defines the runtime configuration, the shared error type, and
//! the centralised `tracing` setup used by the driver crate and by
//! integration tests. It is intentionally lightweight so every crate can
//! depend on it without pulling in the WebDriver stack.
//!
//! # Overview
//!
//! - [`UnderstudyConfig`]: WebDriver endpoint and session options
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`UnderstudyError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use understudy_common::UnderstudyConfig;
//!
//! let cfg = UnderstudyConfig::default();
//! assert_eq!(cfg.webdriver_url, "http://localhost:9515");
//! assert!(!cfg.headless);
//! ```
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod observability;

/// Environment variable naming the WebDriver endpoint to connect to.
pub const WEBDRIVER_URL_ENV: &str = "UNDERSTUDY_WEBDRIVER_URL";
/// Environment variable toggling headless mode (`1`, `true`, or `yes`).
pub const HEADLESS_ENV: &str = "UNDERSTUDY_HEADLESS";

/// Configuration for a WebDriver session.
///
/// The helpers themselves are stateless; this struct only feeds the session
/// layer (endpoint, headless flag) and logging (optional log directory).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnderstudyConfig {
    /// URL of a running WebDriver service (Chromedriver by default).
    pub webdriver_url: String,
    /// Run the browser without a visible window.
    pub headless: bool,
    /// Optional explicit directory for log output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for UnderstudyConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: false,
            log_dir: None,
        }
    }
}

impl UnderstudyConfig {
    /// Build a configuration from the environment, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(url) = std::env::var(WEBDRIVER_URL_ENV) {
            if !url.trim().is_empty() {
                cfg.webdriver_url = url.trim().to_string();
            }
        }
        if let Ok(raw) = std::env::var(HEADLESS_ENV) {
            cfg.headless = parse_bool_flag(&raw);
        }
        if let Ok(dir) = std::env::var(observability::LOG_DIR_ENV) {
            cfg.log_dir = Some(PathBuf::from(dir));
        }
        cfg
    }
}

fn parse_bool_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Error types used across the Understudy workspace.
#[derive(thiserror::Error, Debug)]
pub enum UnderstudyError {
    /// The WebDriver client reported an error.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// A bounded wait expired before its condition held.
    #[error("Timed out waiting for condition")]
    Timeout,

    /// An element's text did not match the expected value after the wait.
    #[error("Text mismatch: expected {expected:?}, got {actual:?}")]
    TextMismatch { expected: String, actual: String },
}

/// Convenient alias for results that use [`UnderstudyError`].
pub type Result<T> = std::result::Result<T, UnderstudyError>;
