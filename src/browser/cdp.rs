//! Chromium driver over the Chrome DevTools Protocol
//!
//! Launches a headless Chromium per session and drives a single page
//! through chromiumoxide. The event handler stream must be drained for the
//! connection to make progress, so each session owns a drain task.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig, HeadlessMode};
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::browser::driver::{Driver, DriverSession};
use crate::core::config::BrowserConfig;
use crate::core::{Result, WatchError};

/// Per-request CDP timeout; bounds a wedged DOM read instead of letting a
/// cycle hang forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

fn cdp_err(err: CdpError) -> WatchError {
    WatchError::session(err.to_string())
}

/// Launches Chromium instances configured from the browser config section
pub struct CdpDriver {
    headed: bool,
    chrome_args: Vec<String>,
}

impl CdpDriver {
    /// Create a driver from the browser section of the config
    pub fn new(config: &BrowserConfig) -> Self {
        Self {
            headed: config.headed,
            chrome_args: config.chrome_args.clone(),
        }
    }
}

#[async_trait]
impl Driver for CdpDriver {
    async fn launch(&self) -> Result<Box<dyn DriverSession>> {
        info!(headed = self.headed, "launching Chromium");

        let mut builder = CdpConfig::builder()
            .headless_mode(if self.headed {
                HeadlessMode::False
            } else {
                HeadlessMode::New
            })
            .window_size(1280, 1024)
            .request_timeout(REQUEST_TIMEOUT)
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking");
        for arg in &self.chrome_args {
            builder = builder.arg(arg);
        }
        let cdp_config = builder.build().map_err(WatchError::Session)?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| WatchError::BrowserNotFound(e.to_string()))?;

        // The handler stream pumps the websocket; without this task every
        // CDP call would stall.
        let events = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = browser.new_page("about:blank").await.map_err(cdp_err)?;
        debug!("Chromium session ready");

        Ok(Box::new(CdpSession {
            browser,
            page,
            events,
        }))
    }
}

/// One live Chromium instance with a single driven page
pub struct CdpSession {
    browser: Browser,
    page: Page,
    events: JoinHandle<()>,
}

impl CdpSession {
    /// Evaluate an expression whose result is already JSON.stringify-ed.
    ///
    /// CDP reports a bare JS `null` with an absent value field, so element
    /// reads round-trip through a string to keep "absent" distinguishable.
    async fn eval_json<T: serde::de::DeserializeOwned>(&self, expr: String) -> Result<T> {
        let raw: String = self
            .page
            .evaluate(expr)
            .await
            .map_err(cdp_err)?
            .into_value()?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[async_trait]
impl DriverSession for CdpSession {
    async fn current_url(&self) -> Result<String> {
        let url = self.page.url().await.map_err(cdp_err)?;
        Ok(url.unwrap_or_default())
    }

    async fn goto(&self, url: &str) -> Result<()> {
        self.page.goto(url).await.map_err(cdp_err)?;
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        self.page.reload().await.map_err(cdp_err)?;
        Ok(())
    }

    async fn element_text(&self, id: &str) -> Result<Option<String>> {
        let expr = format!(
            r#"JSON.stringify((() => {{
                const el = document.getElementById("{id}");
                return el ? el.textContent.trim() : null;
            }})())"#
        );
        self.eval_json(expr).await
    }

    async fn element_visible(&self, id: &str) -> Result<Option<bool>> {
        // Same layout-space test a webdriver displayedness check performs
        let expr = format!(
            r#"JSON.stringify((() => {{
                const el = document.getElementById("{id}");
                if (!el) return null;
                return !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);
            }})())"#
        );
        self.eval_json(expr).await
    }

    async fn close(&mut self) -> Result<()> {
        // Close while the handler still pumps the connection, then stop it
        let close_result = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.events.abort();

        match close_result {
            Ok(_) => Ok(()),
            Err(err) => {
                debug!(%err, "browser close reported an error; process reaped anyway");
                Ok(())
            }
        }
    }
}
