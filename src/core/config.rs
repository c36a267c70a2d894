//! Configuration management for Speedwatch
//!
//! Supports environment variables, config files, and runtime overrides.
//! The watcher re-reads this file every poll cycle, so operator edits take
//! effect without a reload signal.
//!
//! Config file location: ~/.config/speedwatch/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::error::{Result, WatchError};

/// Main configuration for Speedwatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Router status page to scrape
    #[serde(default)]
    pub router: RouterConfig,
    /// Poll loop pacing
    #[serde(default)]
    pub poll: PollConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Browser launch configuration
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Status display configuration
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Router status page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// URL of the JS-driven time-limit status page
    pub url: String,
    /// Wait after navigation before scraping, so page scripts can
    /// populate the DOM
    pub settle_delay_ms: u64,
}

/// Poll loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds between fetch cycles; must be at least 1
    pub interval_secs: u64,
}

/// Log verbosity as exposed to operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
}

impl LogLevel {
    /// Directive string understood by the tracing env filter
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
        }
    }
}

impl FromStr for LogLevel {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            other => Err(WatchError::config(format!(
                "unknown log level '{other}' (expected DEBUG, INFO or WARNING)"
            ))),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARNING"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Verbosity level; changing it on a running watcher requires a restart
    pub level: LogLevel,
    /// Optional log file; stderr when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Browser launch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run with a visible browser window (debugging aid)
    pub headed: bool,
    /// Extra flags passed to the Chromium binary
    #[serde(default)]
    pub chrome_args: Vec<String>,
}

/// Status display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Icon handed to the status sink alongside the text
    pub icon_path: PathBuf,
    /// When set, the rendered status text is written here instead of the log
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            router: RouterConfig::default(),
            poll: PollConfig::default(),
            logging: LoggingConfig::default(),
            browser: BrowserConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            url: env::var("SPEEDWATCH_URL")
                .unwrap_or_else(|_| "http://speedport.ip/html/login/clienttime.html?lang=de#".to_string()),
            settle_delay_ms: 300,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: env::var("SPEEDWATCH_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: env::var("SPEEDWATCH_LOG_LEVEL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(LogLevel::Info),
            file: None,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headed: env::var("SPEEDWATCH_HEADED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            chrome_args: Vec::new(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            icon_path: PathBuf::from("icon.ico"),
            status_file: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("speedwatch")
    }

    /// Get the default config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from the given file, falling back to defaults.
    ///
    /// Priority: CLI args (applied by the caller) > env vars > config file
    /// > built-in defaults.
    pub fn load(path: &Path) -> Self {
        // Pick up a .env file if one exists
        let _ = dotenvy::dotenv();

        Self::load_from_file(path).unwrap_or_default()
    }

    /// Load configuration from a file only
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(WatchError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| WatchError::config(format!("failed to read config: {e}")))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| WatchError::config(format!("failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    ///
    /// The write is an atomic whole-file replacement so a concurrently
    /// running watcher never observes a torn config.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        if !dir.exists() {
            fs::create_dir_all(dir)
                .map_err(|e| WatchError::config(format!("failed to create config dir: {e}")))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| WatchError::config(format!("failed to serialize config: {e}")))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| WatchError::config(format!("failed to create temp config: {e}")))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| WatchError::config(format!("failed to write config: {e}")))?;
        tmp.persist(path)
            .map_err(|e| WatchError::config(format!("failed to replace config: {e}")))?;

        Ok(())
    }

    /// Check the cross-field invariants the watcher relies on
    pub fn validate(&self) -> Result<()> {
        if self.poll.interval_secs == 0 {
            return Err(WatchError::config("poll interval must be at least 1 second"));
        }
        url::Url::parse(&self.router.url)
            .map_err(|e| WatchError::config(format!("invalid router URL: {e}")))?;
        Ok(())
    }

    /// Apply a `key=value` style update, as issued by the config command.
    ///
    /// Returns a short confirmation string for display.
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<String> {
        match key {
            "url" | "router.url" => {
                url::Url::parse(value)
                    .map_err(|e| WatchError::config(format!("invalid router URL: {e}")))?;
                self.router.url = value.to_string();
            }
            "settle-delay-ms" | "router.settle_delay_ms" => {
                self.router.settle_delay_ms = value
                    .parse()
                    .map_err(|_| WatchError::config("settle delay must be milliseconds"))?;
            }
            "interval" | "poll.interval_secs" => {
                let interval: u64 = value
                    .parse()
                    .map_err(|_| WatchError::config("interval must be a positive integer"))?;
                if interval == 0 {
                    return Err(WatchError::config("poll interval must be at least 1 second"));
                }
                self.poll.interval_secs = interval;
            }
            "log-level" | "logging.level" => {
                self.logging.level = value.parse()?;
            }
            "icon" | "display.icon_path" => {
                self.display.icon_path = PathBuf::from(value);
            }
            "status-file" | "display.status_file" => {
                self.display.status_file = Some(PathBuf::from(value));
            }
            "headed" | "browser.headed" => {
                self.browser.headed = value == "true" || value == "1";
            }
            other => {
                return Err(WatchError::config(format!(
                    "unknown config key '{other}' (try url, interval, log-level, icon, \
                     status-file, settle-delay-ms, headed)"
                )));
            }
        }
        Ok(format!("set {key} = {value}"))
    }

    /// Render the configuration as TOML for display
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::from("# error rendering config"))
    }
}
