//! Driver trait for abstracting the automation runtime
//!
//! Keeps the rest of the system independent of CDP-specific fault types:
//! drivers map their own failures to [`WatchError::Session`], and element
//! reads distinguish "structurally absent" (`None`) from a session fault.

use async_trait::async_trait;

use crate::core::Result;

/// A controllable handle to one running rendering-engine instance.
///
/// All methods may fail with [`WatchError::Session`] when the underlying
/// browser process has died or stopped answering.
///
/// [`WatchError::Session`]: crate::core::WatchError::Session
#[async_trait]
pub trait DriverSession: Send + Sync {
    /// The URL the session currently shows. Doubles as the liveness probe:
    /// a dead session fails here.
    async fn current_url(&self) -> Result<String>;

    /// Load `url` and wait for the navigation to commit
    async fn goto(&self, url: &str) -> Result<()>;

    /// Re-run the current page, forcing its data-population scripts
    async fn reload(&self) -> Result<()>;

    /// Trimmed text content of the element with the given id, or `None`
    /// when no such element exists in the DOM
    async fn element_text(&self, id: &str) -> Result<Option<String>>;

    /// Whether the element with the given id takes up layout space, or
    /// `None` when no such element exists
    async fn element_visible(&self, id: &str) -> Result<Option<bool>>;

    /// Release the session. Idempotent; errors are reported, not retried.
    async fn close(&mut self) -> Result<()>;
}

/// Factory for [`DriverSession`]s; the session manager launches a fresh one
/// whenever the live session is detected dead.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Start a new rendering-engine instance and return its session handle
    async fn launch(&self) -> Result<Box<dyn DriverSession>>;
}
