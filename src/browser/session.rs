//! Session lifecycle management
//!
//! The browser session is the most failure-prone resource in the system:
//! the external process can be killed, crash, or hang. All recovery logic
//! is centralized here so higher layers only ever see
//! [`WatchError::Session`](crate::core::WatchError::Session).

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::browser::driver::{Driver, DriverSession};
use crate::core::{Result, WatchError};

/// Owns at most one live [`DriverSession`] and replaces it on failure.
///
/// The session lives in an `Option` rather than being mutated in place, so
/// there is never a moment where two live sessions exist or a dead handle
/// is reachable from the outside.
pub struct SessionManager {
    driver: Box<dyn Driver>,
    session: Option<Box<dyn DriverSession>>,
    target_url: String,
    settle_delay: Duration,
}

impl SessionManager {
    /// Create a manager; no session is launched until the first
    /// [`ensure_ready`](Self::ensure_ready) call.
    pub fn new(driver: Box<dyn Driver>, target_url: impl Into<String>, settle_delay: Duration) -> Self {
        Self {
            driver,
            session: None,
            target_url: target_url.into(),
            settle_delay,
        }
    }

    /// Verify the current session is alive, replacing it if not.
    ///
    /// The probe is a cheap current-URL read. A probe fault marks the
    /// session dead; the replacement is launched and pointed at the target
    /// page. Launch failures propagate and are not retried here; the poll
    /// loop decides the pacing.
    pub async fn ensure_ready(&mut self) -> Result<()> {
        if let Some(session) = &self.session {
            match session.current_url().await {
                Ok(_) => return Ok(()),
                Err(err) => {
                    warn!(%err, "session liveness probe failed; replacing session");
                }
            }
        }
        self.replace_session().await
    }

    async fn replace_session(&mut self) -> Result<()> {
        if let Some(mut dead) = self.session.take() {
            if let Err(err) = dead.close().await {
                debug!(%err, "closing dead session failed");
            }
        }

        let session = self.driver.launch().await?;
        session.goto(&self.target_url).await?;
        info!(url = %self.target_url, "browser session created");

        self.session = Some(session);
        Ok(())
    }

    /// Force the owned session to show the target page.
    ///
    /// When the session already shows it, a reload is issued first: the
    /// status page is JS-driven and needs its data-population scripts
    /// re-run rather than a cached DOM. A short settle delay follows so
    /// asynchronous population can finish before scraping.
    pub async fn navigate(&mut self) -> Result<()> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| WatchError::session("no live session"))?;

        if session.current_url().await? == self.target_url {
            session.reload().await?;
        }
        session.goto(&self.target_url).await?;

        tokio::time::sleep(self.settle_delay).await;
        Ok(())
    }

    /// The live session, if any
    pub fn session(&self) -> Option<&dyn DriverSession> {
        self.session.as_deref()
    }

    /// Release the session. Idempotent; a no-op when none is live.
    pub async fn terminate(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(err) = session.close().await {
                debug!(%err, "session close failed during terminate");
            } else {
                info!("browser session terminated");
            }
        }
    }
}
