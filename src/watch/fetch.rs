//! One self-healing "get latest status" operation

use crate::browser::{PageScraper, SessionManager};
use crate::core::{Result, StatusSnapshot, WatchError};

/// Combines the session manager and scraper into a single fetch operation.
///
/// `fetch_once` makes at most one attempt so a call has bounded latency;
/// pacing and retries belong to the poll loop.
pub struct FetchCycle {
    sessions: SessionManager,
    scraper: PageScraper,
}

impl FetchCycle {
    pub fn new(sessions: SessionManager, scraper: PageScraper) -> Self {
        Self { sessions, scraper }
    }

    /// Run one fetch cycle: ensure a live session, (re)load the status
    /// page, scrape it.
    ///
    /// Fails with [`WatchError::Session`] when no session could be
    /// (re)created and [`WatchError::ReadIncomplete`] when the page was not
    /// fully rendered; both are expected to clear on a later tick.
    pub async fn fetch_once(&mut self) -> Result<StatusSnapshot> {
        self.sessions.ensure_ready().await?;
        self.sessions.navigate().await?;

        let session = self
            .sessions
            .session()
            .ok_or_else(|| WatchError::session("no live session after navigation"))?;

        match self.scraper.scrape(session).await? {
            Some(snapshot) => Ok(snapshot),
            None => Err(WatchError::ReadIncomplete),
        }
    }

    /// Release the underlying session
    pub async fn terminate(&mut self) {
        self.sessions.terminate().await;
    }
}
