//! Custom error types for Speedwatch
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for Speedwatch operations
#[derive(Error, Debug)]
pub enum WatchError {
    /// The browser session could not be reached or (re)created
    #[error("browser session unavailable: {0}")]
    Session(String),

    /// The status page DOM was not in the expected shape at read time
    #[error("status page not fully rendered")]
    ReadIncomplete,

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON parsing errors (CDP evaluation results)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Chromium binary could not be found or started
    #[error("no usable Chromium found: {0}. Ensure google-chrome or chromium is installed and on PATH")]
    BrowserNotFound(String),
}

/// Convenience Result type for Speedwatch operations
pub type Result<T> = std::result::Result<T, WatchError>;

impl WatchError {
    /// Create a session error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the next poll tick is expected to clear this error
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Session(_) | Self::ReadIncomplete)
    }
}
