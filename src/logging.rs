//! Logging setup
//!
//! Initializes the global tracing subscriber from the configured level.
//! `RUST_LOG` overrides the config when set.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::core::{LogLevel, Result};

/// Install the global subscriber. Call once, before the loop starts;
/// changing the level afterwards requires a process restart.
pub fn init(level: LogLevel, file: Option<&Path>) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .compact();

    match file {
        Some(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            builder.with_writer(Arc::new(file)).with_ansi(false).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}
