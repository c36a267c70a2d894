//! The poll loop
//!
//! Runs the fetch cycle forever on the configured interval, re-reading the
//! config file each iteration and absorbing transient failures. The only
//! user-visible effect of a failed cycle is a stale status display.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::core::{Config, WatchError};
use crate::sink::StatusSink;
use crate::watch::fetch::FetchCycle;

/// Consecutive failed cycles before the condition is escalated to an
/// operator-visible error event (and again every multiple thereof).
const ESCALATE_AFTER: u32 = 5;

/// Loop lifecycle; `Stopped` is terminal and only entered via the stop
/// signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Running,
    Stopped,
}

/// Tracks how many cycles in a row have failed without a successful fetch
#[derive(Debug, Default)]
struct FailureTracker {
    consecutive: u32,
}

impl FailureTracker {
    fn record_success(&mut self) {
        self.consecutive = 0;
    }

    /// Record a failed cycle; returns true when the streak should be
    /// escalated to an error log.
    fn record_failure(&mut self) -> bool {
        self.consecutive += 1;
        self.consecutive % ESCALATE_AFTER == 0
    }
}

/// The long-lived poll loop: fetch, publish, re-read config, sleep.
pub struct PollLoop {
    fetch: FetchCycle,
    sink: Arc<dyn StatusSink>,
    config: Config,
    config_path: PathBuf,
    stop_rx: watch::Receiver<bool>,
    state: LoopState,
    failures: FailureTracker,
}

impl PollLoop {
    pub fn new(
        fetch: FetchCycle,
        sink: Arc<dyn StatusSink>,
        config: Config,
        config_path: PathBuf,
        stop_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            fetch,
            sink,
            config,
            config_path,
            stop_rx,
            state: LoopState::Running,
            failures: FailureTracker::default(),
        }
    }

    /// Run until the stop signal fires, then release the browser session.
    ///
    /// The stop signal is observed at the top of each iteration and
    /// interrupts the inter-cycle sleep, so shutdown never waits out a
    /// full interval.
    pub async fn run(mut self) {
        info!(
            interval_secs = self.config.poll.interval_secs,
            url = %self.config.router.url,
            "poll loop started"
        );

        while self.state == LoopState::Running {
            if *self.stop_rx.borrow() {
                self.state = LoopState::Stopped;
                break;
            }

            self.run_cycle().await;
            self.reload_config();

            let interval = Duration::from_secs(self.config.poll.interval_secs);
            tokio::select! {
                _ = self.stop_rx.changed() => {
                    self.state = LoopState::Stopped;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }

        info!("poll loop stopping");
        self.fetch.terminate().await;
    }

    /// One fetch-and-publish iteration. Never fails: transient errors are
    /// logged and the previously displayed status stays visible.
    async fn run_cycle(&mut self) {
        match self.fetch.fetch_once().await {
            Ok(snapshot) => {
                self.failures.record_success();
                let text = snapshot.to_display_text();
                debug!(as_of = %snapshot.as_of, "fetched status snapshot");
                if let Err(err) = self
                    .sink
                    .publish(&self.config.display.icon_path, &text)
                    .await
                {
                    warn!(%err, "status sink rejected update");
                }
            }
            Err(WatchError::ReadIncomplete) => {
                debug!("page not fully rendered; keeping previous status");
                self.escalate_if_persistent("status page repeatedly incomplete");
            }
            Err(err) => {
                warn!(%err, "fetch cycle failed; keeping previous status");
                self.escalate_if_persistent("fetch keeps failing without a successful cycle");
            }
        }
    }

    fn escalate_if_persistent(&mut self, what: &str) {
        if self.failures.record_failure() {
            error!(
                consecutive_failures = self.failures.consecutive,
                "{what}; check the router page and the browser runtime"
            );
        }
    }

    /// Re-read the config file so operator changes take effect on the next
    /// cycle. Read failures keep the current config; a changed log level
    /// cannot be applied to the live subscriber and needs a restart.
    fn reload_config(&mut self) {
        match Config::load_from_file(&self.config_path) {
            Ok(next) => {
                if next.logging.level != self.config.logging.level {
                    warn!(
                        from = %self.config.logging.level,
                        to = %next.logging.level,
                        "log level changed; restart the watcher to apply it"
                    );
                }
                if next.poll.interval_secs != self.config.poll.interval_secs {
                    info!(
                        from = self.config.poll.interval_secs,
                        to = next.poll.interval_secs,
                        "poll interval updated"
                    );
                }
                self.config = next;
            }
            Err(err) => {
                warn!(%err, "failed to re-read config; keeping current settings");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_tracker_escalates_on_streak() {
        let mut tracker = FailureTracker::default();
        for _ in 0..ESCALATE_AFTER - 1 {
            assert!(!tracker.record_failure());
        }
        assert!(tracker.record_failure());
        assert!(!tracker.record_failure());
    }

    #[test]
    fn test_failure_tracker_resets_on_success() {
        let mut tracker = FailureTracker::default();
        for _ in 0..ESCALATE_AFTER - 1 {
            tracker.record_failure();
        }
        tracker.record_success();
        assert!(!tracker.record_failure());
        assert_eq!(tracker.consecutive, 1);
    }
}
