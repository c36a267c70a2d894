//! Status sinks
//!
//! A sink receives the rendered status text once per successful cycle and
//! is responsible for presentation. The desktop tray integration is an
//! external consumer; the sinks here cover logging and a watchable file.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::core::Result;

/// Consumer of rendered status updates
#[async_trait]
pub trait StatusSink: Send + Sync {
    /// Present one status update. Called once per successful fetch cycle.
    async fn publish(&self, icon: &Path, text: &str) -> Result<()>;
}

/// Publishes status updates as structured log events
pub struct LogSink;

#[async_trait]
impl StatusSink for LogSink {
    async fn publish(&self, icon: &Path, text: &str) -> Result<()> {
        info!(icon = %icon.display(), status = %text, "status update");
        Ok(())
    }
}

/// Writes the rendered status text to a file for an external presenter
/// (e.g. a tray process) to pick up.
///
/// Each update replaces the whole file atomically, so a reader never sees
/// a torn status.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl StatusSink for FileSink {
    async fn publish(&self, _icon: &Path, text: &str) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        info!(path = %self.path.display(), "status file updated");
        Ok(())
    }
}
