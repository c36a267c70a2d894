//! Status page scraping
//!
//! Reads the fixed set of DOM fields the router's time-limit page exposes
//! by stable element ids. A snapshot is all-or-nothing: if any field is
//! structurally absent the page may be mid-render, and the whole scrape is
//! reported absent rather than returning a partial reading.

use crate::browser::driver::DriverSession;
use crate::core::types::{StatusSnapshot, TimeWindow, WINDOW_COUNT};
use crate::core::Result;

/// Element ids on the router's clienttime status page; these are the
/// scraper's contract with the page, and an upstream page change is an
/// external compatibility break.
mod ids {
    /// Shown when a daily time limit is enforced
    pub const TIME_LIMIT_ACTIVE: &str = "timeruleTimeYes";
    /// Remaining online time text; empty means unlimited
    pub const REMAINING_TIME: &str = "var_remainingtime";
    /// Router-reported current time
    pub const CURRENT_TIME: &str = "var_time";

    pub fn window_row(i: usize) -> String {
        format!("time_line{i}")
    }

    pub fn window_from(i: usize) -> String {
        format!("var_trule_from{i}")
    }

    pub fn window_to(i: usize) -> String {
        format!("var_trule_to{i}")
    }
}

/// Extracts a [`StatusSnapshot`] from a live session showing the status page
#[derive(Debug, Default)]
pub struct PageScraper;

impl PageScraper {
    pub fn new() -> Self {
        Self
    }

    /// Read the status fields from the page the session currently shows.
    ///
    /// Returns `Ok(None)` when any field is missing from the DOM — the
    /// transient mid-render case, resolved by waiting for the next poll
    /// tick. No retries happen here. Session faults propagate as errors.
    pub async fn scrape(&self, session: &dyn DriverSession) -> Result<Option<StatusSnapshot>> {
        let Some(time_limit_active) = session.element_visible(ids::TIME_LIMIT_ACTIVE).await? else {
            return Ok(None);
        };
        let Some(remaining_time) = session.element_text(ids::REMAINING_TIME).await? else {
            return Ok(None);
        };
        let Some(as_of) = session.element_text(ids::CURRENT_TIME).await? else {
            return Ok(None);
        };

        let mut windows = Vec::with_capacity(WINDOW_COUNT);
        for i in 1..=WINDOW_COUNT {
            let visible = session.element_visible(&ids::window_row(i)).await?;
            let from = session.element_text(&ids::window_from(i)).await?;
            let to = session.element_text(&ids::window_to(i)).await?;

            match (visible, from, to) {
                (Some(visible), Some(from), Some(to)) => {
                    windows.push(TimeWindow { visible, from, to });
                }
                _ => return Ok(None),
            }
        }

        Ok(Some(StatusSnapshot {
            time_limit_active,
            remaining_time,
            as_of,
            windows,
        }))
    }
}
