//! Fetch cycle integration tests
//!
//! Exercises session recovery and the all-or-nothing scrape rule against
//! the mock driver.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{MockDriver, MockState};
use speedwatch::browser::{PageScraper, SessionManager};
use speedwatch::core::types::{StatusSnapshot, TimeWindow};
use speedwatch::core::WatchError;
use speedwatch::watch::FetchCycle;

const TARGET: &str = "http://router.local/html/login/clienttime.html";

fn fetch_cycle(state: &Arc<MockState>) -> FetchCycle {
    let sessions = SessionManager::new(
        Box::new(MockDriver::new(state.clone())),
        TARGET,
        Duration::ZERO,
    );
    FetchCycle::new(sessions, PageScraper::new())
}

#[tokio::test]
async fn test_fetch_returns_complete_snapshot() {
    let state = MockState::new();
    state.seed_status_page();
    let mut fetch = fetch_cycle(&state);

    let snapshot = fetch.fetch_once().await.unwrap();

    assert_eq!(
        snapshot,
        StatusSnapshot {
            time_limit_active: true,
            remaining_time: "00:45".to_string(),
            as_of: "14:32".to_string(),
            windows: vec![
                TimeWindow::shown("16:00", "22:00"),
                TimeWindow::hidden(),
                TimeWindow::hidden(),
            ],
        }
    );
    assert_eq!(state.launched(), 1);

    let text = snapshot.to_display_text();
    assert!(text.contains("Remaining: 00:45"));
    assert_eq!(text.matches("Allowed").count(), 1);
    assert!(text.contains("16:00\u{2013}22:00"));
    assert!(text.ends_with("Last update: 14:32"));
}

#[tokio::test]
async fn test_missing_window_row_is_read_incomplete() {
    let state = MockState::new();
    state.seed_status_page();
    state.remove_element("time_line2");
    let mut fetch = fetch_cycle(&state);

    let err = fetch.fetch_once().await.unwrap_err();

    assert!(matches!(err, WatchError::ReadIncomplete));
    // The session itself is fine and must not be replaced
    assert_eq!(state.launched(), 1);
}

#[tokio::test]
async fn test_missing_top_field_is_read_incomplete() {
    let state = MockState::new();
    state.seed_status_page();
    state.remove_element("var_time");
    let mut fetch = fetch_cycle(&state);

    assert!(matches!(
        fetch.fetch_once().await.unwrap_err(),
        WatchError::ReadIncomplete
    ));
}

#[tokio::test]
async fn test_crashed_session_is_replaced_exactly_once() {
    let state = MockState::new();
    state.seed_status_page();
    let mut fetch = fetch_cycle(&state);

    fetch.fetch_once().await.unwrap();
    assert_eq!(state.launched(), 1);

    // Kill the live session; the next cycle must replace it and succeed
    state.kill_session(0);
    let snapshot = fetch.fetch_once().await.unwrap();

    assert_eq!(snapshot.remaining_time, "00:45");
    assert_eq!(state.launched(), 2);
    // The dead session was released before its replacement went live
    assert_eq!(state.closed(), 1);
}

#[tokio::test]
async fn test_launch_failure_propagates_then_recovers() {
    let state = MockState::new();
    state.seed_status_page();
    state.fail_next_launches(1);
    let mut fetch = fetch_cycle(&state);

    let err = fetch.fetch_once().await.unwrap_err();
    assert!(matches!(err, WatchError::Session(_)));
    assert_eq!(state.launched(), 0);

    // Next cycle, the host resource is available again
    assert!(fetch.fetch_once().await.is_ok());
    assert_eq!(state.launched(), 1);
}

#[tokio::test]
async fn test_revisiting_target_page_reloads_first() {
    let state = MockState::new();
    state.seed_status_page();
    let mut fetch = fetch_cycle(&state);

    fetch.fetch_once().await.unwrap();
    let after_first = state.reloads();
    fetch.fetch_once().await.unwrap();

    // Already on the target page, so the JS-driven page is reloaded
    // instead of served from a stale DOM
    assert_eq!(state.reloads(), after_first + 1);
    assert_eq!(state.launched(), 1);
}

#[tokio::test]
async fn test_terminate_is_idempotent() {
    let state = MockState::new();
    state.seed_status_page();
    let mut fetch = fetch_cycle(&state);

    fetch.fetch_once().await.unwrap();
    fetch.terminate().await;
    fetch.terminate().await;

    assert_eq!(state.closed(), 1);
}

#[tokio::test]
async fn test_unlimited_rendering_end_to_end() {
    let state = MockState::new();
    state.seed_status_page();
    state.set_element("var_remainingtime", "", true);
    let mut fetch = fetch_cycle(&state);

    let snapshot = fetch.fetch_once().await.unwrap();

    assert!(snapshot.is_unlimited());
    assert!(snapshot.to_display_text().contains("unlimited"));
}
