//! Speedwatch - Router Time-Limit Watcher
//!
//! Periodically scrapes a router's JavaScript-driven time-limit status page
//! through a managed headless browser and publishes a human-readable status
//! string for display.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **Browser**: Session lifecycle over a driver seam, with a CDP
//!   implementation, plus the status page scraper
//! - **Watch**: The fetch cycle and the poll loop that runs it forever
//! - **Sink**: Consumers of the rendered status text
//! - **CLI**: Command handlers for the entry point
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use speedwatch::browser::{CdpDriver, PageScraper, SessionManager};
//! use speedwatch::watch::FetchCycle;
//! use speedwatch::Config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     let driver = CdpDriver::new(&config.browser);
//!     let sessions = SessionManager::new(
//!         Box::new(driver),
//!         config.router.url.clone(),
//!         Duration::from_millis(config.router.settle_delay_ms),
//!     );
//!     let mut fetch = FetchCycle::new(sessions, PageScraper::new());
//!
//!     let snapshot = fetch.fetch_once().await.unwrap();
//!     println!("{}", snapshot.to_display_text());
//! }
//! ```

pub mod browser;
pub mod cli;
pub mod core;
pub mod logging;
pub mod sink;
pub mod watch;

// Re-export commonly used items
pub use core::{Config, Result, StatusSnapshot, WatchError};
pub use watch::{FetchCycle, PollLoop};
