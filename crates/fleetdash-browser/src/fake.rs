//! Scripted in-memory [`Page`]/[`Browser`] implementations for tests.
//!
//! Waits resolve instantly: a wait on something the script never shows
//! fails immediately with [`DriverError::Timeout`] instead of sleeping, so
//! timeout-path tests stay fast and deterministic.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use crate::error::DriverError;
use crate::page::{Browser, Page};
use crate::snapshot::SessionSnapshot;

#[derive(Default)]
struct FakeState {
    url: String,
    /// goto target -> address the "browser" ends up on (redirects).
    routes: HashMap<String, String>,
    failing_gotos: HashSet<String>,
    visible: HashSet<String>,
    enabled: HashSet<String>,
    texts: HashMap<String, String>,
    attrs: HashMap<(String, String), String>,
    counts: HashMap<String, usize>,
    captures: HashMap<String, Value>,
    /// click selector -> (text selector, new text) applied on click.
    click_text_updates: HashMap<String, (String, String)>,
    /// click selector -> selectors that become visible on click.
    click_reveals: HashMap<String, Vec<String>>,
    failing_clicks: HashSet<String>,
    snapshot: SessionSnapshot,
    fail_screenshots: bool,
    visited: Vec<String>,
    clicks: Vec<String>,
    fills: Vec<(String, String)>,
    screenshots: Vec<PathBuf>,
}

/// Clones share state, so a test can keep a handle for assertions after
/// handing the page to the code under test.
#[derive(Clone, Default)]
pub struct FakePage {
    state: Arc<Mutex<FakeState>>,
}

impl FakePage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- scripting -------------------------------------------------------

    pub fn route(&self, from: &str, to: &str) {
        self.lock().routes.insert(from.to_string(), to.to_string());
    }

    pub fn fail_goto(&self, url: &str) {
        self.lock().failing_gotos.insert(url.to_string());
    }

    pub fn show(&self, selector: &str) {
        self.lock().visible.insert(selector.to_string());
    }

    pub fn hide(&self, selector: &str) {
        self.lock().visible.remove(selector);
    }

    pub fn enable(&self, selector: &str) {
        let mut state = self.lock();
        state.visible.insert(selector.to_string());
        state.enabled.insert(selector.to_string());
    }

    pub fn set_text(&self, selector: &str, text: &str) {
        self.lock()
            .texts
            .insert(selector.to_string(), text.to_string());
    }

    pub fn set_attr(&self, selector: &str, name: &str, value: &str) {
        self.lock()
            .attrs
            .insert((selector.to_string(), name.to_string()), value.to_string());
    }

    pub fn set_count(&self, selector: &str, count: usize) {
        self.lock().counts.insert(selector.to_string(), count);
    }

    pub fn set_capture(&self, fragment: &str, body: Value) {
        self.lock().captures.insert(fragment.to_string(), body);
    }

    /// Clicking `click_selector` rewrites the text behind `text_selector` —
    /// used to script "the table re-sorted" style DOM changes.
    pub fn on_click_set_text(&self, click_selector: &str, text_selector: &str, new_text: &str) {
        self.lock().click_text_updates.insert(
            click_selector.to_string(),
            (text_selector.to_string(), new_text.to_string()),
        );
    }

    /// Clicking `click_selector` makes `revealed` visible — used to script
    /// page transitions.
    pub fn on_click_show(&self, click_selector: &str, revealed: &str) {
        self.lock()
            .click_reveals
            .entry(click_selector.to_string())
            .or_default()
            .push(revealed.to_string());
    }

    pub fn fail_click(&self, selector: &str) {
        self.lock().failing_clicks.insert(selector.to_string());
    }

    pub fn set_snapshot(&self, snapshot: SessionSnapshot) {
        self.lock().snapshot = snapshot;
    }

    pub fn fail_screenshots(&self) {
        self.lock().fail_screenshots = true;
    }

    // --- assertions ------------------------------------------------------

    #[must_use]
    pub fn visited(&self) -> Vec<String> {
        self.lock().visited.clone()
    }

    #[must_use]
    pub fn clicks(&self) -> Vec<String> {
        self.lock().clicks.clone()
    }

    #[must_use]
    pub fn fills(&self) -> Vec<(String, String)> {
        self.lock().fills.clone()
    }

    #[must_use]
    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.lock().screenshots.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake page lock poisoned")
    }

    fn apply_click(&self, selector: &str) -> Result<(), DriverError> {
        let mut state = self.lock();
        if state.failing_clicks.contains(selector) {
            return Err(DriverError::ElementNotFound {
                selector: selector.to_string(),
            });
        }
        state.clicks.push(selector.to_string());
        if let Some((target, new_text)) = state.click_text_updates.get(selector).cloned() {
            state.texts.insert(target, new_text);
        }
        if let Some(revealed) = state.click_reveals.get(selector).cloned() {
            for sel in revealed {
                state.visible.insert(sel);
            }
        }
        Ok(())
    }
}

impl Page for FakePage {
    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        let mut state = self.lock();
        state.visited.push(url.to_string());
        if state.failing_gotos.contains(url) {
            return Err(DriverError::Timeout {
                what: format!("navigation to {url}"),
                waited_ms: 0,
            });
        }
        state.url = state.routes.get(url).cloned().unwrap_or_else(|| url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.lock().url.clone())
    }

    async fn wait_visible(&self, selector: &str, _timeout: Duration) -> Result<(), DriverError> {
        if self.lock().visible.contains(selector) {
            Ok(())
        } else {
            Err(DriverError::Timeout {
                what: format!("element {selector} visible"),
                waited_ms: 0,
            })
        }
    }

    async fn wait_enabled(&self, selector: &str, _timeout: Duration) -> Result<(), DriverError> {
        let state = self.lock();
        if state.visible.contains(selector) && state.enabled.contains(selector) {
            Ok(())
        } else {
            Err(DriverError::Timeout {
                what: format!("element {selector} enabled"),
                waited_ms: 0,
            })
        }
    }

    async fn wait_any_visible(
        &self,
        selectors: &[&str],
        _timeout: Duration,
    ) -> Result<usize, DriverError> {
        let state = self.lock();
        for (index, selector) in selectors.iter().enumerate() {
            if state.visible.contains(*selector) {
                return Ok(index);
            }
        }
        Err(DriverError::Timeout {
            what: format!("any of {} selectors visible", selectors.len()),
            waited_ms: 0,
        })
    }

    async fn is_visible(&self, selector: &str) -> Result<bool, DriverError> {
        Ok(self.lock().visible.contains(selector))
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        self.apply_click(selector)
    }

    async fn click_nth(&self, selector: &str, index: usize) -> Result<(), DriverError> {
        self.apply_click(&format!("{selector} (index {index})"))
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<(), DriverError> {
        self.lock()
            .fills
            .push((selector.to_string(), value.to_string()));
        Ok(())
    }

    async fn fill_nth(
        &self,
        selector: &str,
        index: usize,
        value: &str,
    ) -> Result<(), DriverError> {
        self.lock()
            .fills
            .push((format!("{selector} (index {index})"), value.to_string()));
        Ok(())
    }

    async fn text(&self, selector: &str) -> Result<String, DriverError> {
        self.lock()
            .texts
            .get(selector)
            .cloned()
            .ok_or_else(|| DriverError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    async fn attr(&self, selector: &str, name: &str) -> Result<Option<String>, DriverError> {
        Ok(self
            .lock()
            .attrs
            .get(&(selector.to_string(), name.to_string()))
            .cloned())
    }

    async fn count(&self, selector: &str) -> Result<usize, DriverError> {
        let state = self.lock();
        Ok(state.counts.get(selector).copied().unwrap_or_else(|| {
            usize::from(state.visible.contains(selector))
        }))
    }

    async fn capture_response(
        &self,
        url_fragment: &str,
        trigger_selector: &str,
        _timeout: Duration,
    ) -> Result<Value, DriverError> {
        self.apply_click(trigger_selector)?;
        self.lock()
            .captures
            .get(url_fragment)
            .cloned()
            .ok_or_else(|| DriverError::Timeout {
                what: format!("response matching \"{url_fragment}\""),
                waited_ms: 0,
            })
    }

    async fn screenshot(&self, path: &Path) -> Result<(), DriverError> {
        let mut state = self.lock();
        if state.fail_screenshots {
            return Err(DriverError::ScreenshotDecode(
                "screenshots disabled by script".to_string(),
            ));
        }
        state.screenshots.push(path.to_path_buf());
        Ok(())
    }

    async fn export_snapshot(&self) -> Result<SessionSnapshot, DriverError> {
        Ok(self.lock().snapshot.clone())
    }

    async fn close(&self) -> Result<(), DriverError> {
        Ok(())
    }
}

/// Hands out pre-scripted pages in order; records the snapshot each page
/// was seeded from.
#[derive(Default)]
pub struct FakeBrowser {
    pages: Mutex<VecDeque<FakePage>>,
    seeded_with: Mutex<Vec<Option<SessionSnapshot>>>,
}

impl FakeBrowser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, page: FakePage) {
        self.pages.lock().expect("fake browser lock").push_back(page);
    }

    #[must_use]
    pub fn seeded_with(&self) -> Vec<Option<SessionSnapshot>> {
        self.seeded_with.lock().expect("fake browser lock").clone()
    }
}

impl Browser for FakeBrowser {
    type Page = FakePage;

    async fn open_page(
        &self,
        snapshot: Option<&SessionSnapshot>,
    ) -> Result<FakePage, DriverError> {
        self.seeded_with
            .lock()
            .expect("fake browser lock")
            .push(snapshot.cloned());
        self.pages
            .lock()
            .expect("fake browser lock")
            .pop_front()
            .ok_or(DriverError::UnexpectedStatus {
                status: 0,
                endpoint: "fake browser has no more scripted pages".to_string(),
            })
    }
}
