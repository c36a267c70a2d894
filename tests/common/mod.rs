//! Shared mock driver for integration tests
//!
//! Simulates the rendering engine: sessions can be killed mid-run,
//! launches can be made to fail, and the status page's element set is a
//! plain map the test seeds and mutates.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use speedwatch::browser::{Driver, DriverSession};
use speedwatch::core::{Result, WatchError};

/// A DOM element as the mock page exposes it
#[derive(Debug, Clone)]
pub struct MockElement {
    pub text: String,
    pub visible: bool,
}

/// Shared state backing every mock session spawned by one driver
#[derive(Default)]
pub struct MockState {
    launched: AtomicUsize,
    closed: AtomicUsize,
    gotos: AtomicUsize,
    reloads: AtomicUsize,
    launch_failures: AtomicUsize,
    dead: Mutex<HashSet<usize>>,
    urls: Mutex<HashMap<usize, String>>,
    elements: Mutex<HashMap<String, MockElement>>,
}

impl MockState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Populate every element the scraper contract names, in a healthy
    /// shape: limit active, 45 minutes remaining, first window visible.
    pub fn seed_status_page(&self) {
        self.set_element("timeruleTimeYes", "", true);
        self.set_element("var_remainingtime", "00:45", true);
        self.set_element("var_time", "14:32", true);

        self.set_element("time_line1", "", true);
        self.set_element("var_trule_from1", "16:00", true);
        self.set_element("var_trule_to1", "22:00", true);

        for i in 2..=3 {
            self.set_element(&format!("time_line{i}"), "", false);
            self.set_element(&format!("var_trule_from{i}"), "", false);
            self.set_element(&format!("var_trule_to{i}"), "", false);
        }
    }

    pub fn set_element(&self, id: &str, text: &str, visible: bool) {
        self.elements.lock().unwrap().insert(
            id.to_string(),
            MockElement {
                text: text.to_string(),
                visible,
            },
        );
    }

    pub fn remove_element(&self, id: &str) {
        self.elements.lock().unwrap().remove(id);
    }

    /// Simulate a browser crash: every later call through this session
    /// fails with a session fault.
    pub fn kill_session(&self, session: usize) {
        self.dead.lock().unwrap().insert(session);
    }

    /// Make the next `n` launches fail with a session error
    pub fn fail_next_launches(&self, n: usize) {
        self.launch_failures.store(n, Ordering::SeqCst);
    }

    pub fn launched(&self) -> usize {
        self.launched.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn gotos(&self) -> usize {
        self.gotos.load(Ordering::SeqCst)
    }

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

/// Driver producing sessions backed by a shared [`MockState`]
pub struct MockDriver {
    state: Arc<MockState>,
}

impl MockDriver {
    pub fn new(state: Arc<MockState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn launch(&self) -> Result<Box<dyn DriverSession>> {
        let failures = &self.state.launch_failures;
        if failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(WatchError::session("mock launch refused"));
        }

        let id = self.state.launched.fetch_add(1, Ordering::SeqCst);
        self.state
            .urls
            .lock()
            .unwrap()
            .insert(id, "about:blank".to_string());

        Ok(Box::new(MockSession {
            state: self.state.clone(),
            id,
        }))
    }
}

pub struct MockSession {
    state: Arc<MockState>,
    id: usize,
}

impl MockSession {
    fn check_alive(&self) -> Result<()> {
        if self.state.dead.lock().unwrap().contains(&self.id) {
            Err(WatchError::session("mock browser process is gone"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DriverSession for MockSession {
    async fn current_url(&self) -> Result<String> {
        self.check_alive()?;
        Ok(self.state.urls.lock().unwrap()[&self.id].clone())
    }

    async fn goto(&self, url: &str) -> Result<()> {
        self.check_alive()?;
        self.state
            .urls
            .lock()
            .unwrap()
            .insert(self.id, url.to_string());
        self.state.gotos.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        self.check_alive()?;
        self.state.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn element_text(&self, id: &str) -> Result<Option<String>> {
        self.check_alive()?;
        Ok(self
            .state
            .elements
            .lock()
            .unwrap()
            .get(id)
            .map(|el| el.text.clone()))
    }

    async fn element_visible(&self, id: &str) -> Result<Option<bool>> {
        self.check_alive()?;
        Ok(self
            .state
            .elements
            .lock()
            .unwrap()
            .get(id)
            .map(|el| el.visible))
    }

    async fn close(&mut self) -> Result<()> {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
        self.state.dead.lock().unwrap().insert(self.id);
        Ok(())
    }
}
