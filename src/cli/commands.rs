//! CLI commands
//!
//! Handlers for the non-watching subcommands. Each returns the text to
//! print so the entry point stays a thin dispatcher.

use std::path::Path;

use crate::core::{Config, Result};

/// Render the effective configuration for display
pub fn show_config(config: &Config) -> String {
    config.to_toml()
}

/// Apply a single `key value` update and persist it atomically.
///
/// This is the write side of the config contract: the watcher only ever
/// reads the file, and every write replaces it whole, so a running loop
/// never observes a torn config.
pub fn set_config(path: &Path, key: &str, value: &str) -> Result<String> {
    let mut config = Config::load(path);
    let confirmation = config.set_key(key, value)?;
    config.save(path)?;
    Ok(confirmation)
}
