//! Shared types used across Speedwatch modules
//!
//! Contains the status snapshot model and its display rendering.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Number of scheduled access windows the router's status page exposes.
///
/// The observed page always renders three window rows; routers with a
/// different count would only need this constant changed.
pub const WINDOW_COUNT: usize = 3;

/// One scheduled access window as shown on the status page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Whether the router currently shows this window row
    pub visible: bool,
    /// Start of the window, router-formatted (e.g. "16:00")
    pub from: String,
    /// End of the window, router-formatted (e.g. "22:00")
    pub to: String,
}

impl TimeWindow {
    /// Create a visible window with the given bounds
    pub fn shown(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            visible: true,
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a hidden window row
    pub fn hidden() -> Self {
        Self {
            visible: false,
            from: String::new(),
            to: String::new(),
        }
    }
}

/// One complete, immutable reading of the router's time-limit status.
///
/// Constructed fresh on every successful scrape and superseded by the
/// next one; a snapshot is never partially populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Whether a daily time limit is currently enforced
    pub time_limit_active: bool,
    /// Remaining online time, router-formatted; empty means unlimited
    pub remaining_time: String,
    /// Router-reported timestamp of this reading
    pub as_of: String,
    /// The scheduled access windows, in page order
    pub windows: Vec<TimeWindow>,
}

impl StatusSnapshot {
    /// Whether the router reports no remaining-time restriction
    pub fn is_unlimited(&self) -> bool {
        self.remaining_time.is_empty()
    }

    /// Render the snapshot into the display text handed to the status sink.
    ///
    /// Hidden window rows are skipped; the last line always carries the
    /// router-reported timestamp.
    pub fn to_display_text(&self) -> String {
        let mut text = String::new();

        if self.is_unlimited() {
            text.push_str("Remaining: unlimited\n");
        } else {
            let _ = writeln!(text, "Remaining: {}", self.remaining_time);
        }

        for window in &self.windows {
            if window.visible {
                let _ = writeln!(text, "Allowed {}\u{2013}{}", window.from, window.to);
            }
        }

        let _ = writeln!(
            text,
            "Time limit active: {}",
            if self.time_limit_active { "yes" } else { "no" }
        );
        let _ = write!(text, "Last update: {}", self.as_of);

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(remaining: &str, windows: Vec<TimeWindow>) -> StatusSnapshot {
        StatusSnapshot {
            time_limit_active: true,
            remaining_time: remaining.to_string(),
            as_of: "14:32".to_string(),
            windows,
        }
    }

    #[test]
    fn test_render_remaining_verbatim() {
        let snapshot = snapshot_with(
            "00:45",
            vec![
                TimeWindow::shown("16:00", "22:00"),
                TimeWindow::hidden(),
                TimeWindow::hidden(),
            ],
        );
        let text = snapshot.to_display_text();

        assert!(text.contains("Remaining: 00:45"));
        assert!(text.contains("16:00\u{2013}22:00"));
        assert_eq!(text.matches("Allowed").count(), 1);
        assert!(text.ends_with("Last update: 14:32"));
    }

    #[test]
    fn test_render_empty_remaining_as_unlimited() {
        let snapshot = snapshot_with("", vec![TimeWindow::hidden(); WINDOW_COUNT]);
        let text = snapshot.to_display_text();

        assert!(text.contains("unlimited"));
        assert!(!text.contains("Remaining: \n"));
    }

    #[test]
    fn test_window_lines_match_visibility_in_order() {
        let snapshot = snapshot_with(
            "01:30",
            vec![
                TimeWindow::shown("06:00", "08:00"),
                TimeWindow::hidden(),
                TimeWindow::shown("16:00", "22:00"),
            ],
        );
        let text = snapshot.to_display_text();
        let lines: Vec<&str> = text.lines().filter(|l| l.starts_with("Allowed")).collect();

        assert_eq!(
            lines,
            vec!["Allowed 06:00\u{2013}08:00", "Allowed 16:00\u{2013}22:00"]
        );
    }

    #[test]
    fn test_render_inactive_limit() {
        let mut snapshot = snapshot_with("", vec![TimeWindow::hidden(); WINDOW_COUNT]);
        snapshot.time_limit_active = false;
        let text = snapshot.to_display_text();

        assert!(text.contains("Time limit active: no"));
    }
}
