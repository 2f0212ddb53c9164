//! The narrow page-automation contract the rest of the system consumes.
//!
//! Selectors are CSS by default; a `xpath=` prefix switches the location
//! strategy, which is how text-anchored lookups (`//button[...='Apply']`)
//! are expressed.

use std::path::Path;
use std::time::Duration;

use crate::error::DriverError;
use crate::snapshot::SessionSnapshot;

/// A live browser tab with an isolated session context.
///
/// All waits are bounded: a wait that expires resolves to
/// [`DriverError::Timeout`], never a hang. Implementations must not retry
/// internally; retry policy lives with the callers.
#[allow(async_fn_in_trait)]
pub trait Page {
    async fn goto(&self, url: &str) -> Result<(), DriverError>;

    async fn current_url(&self) -> Result<String, DriverError>;

    /// Waits until `selector` matches a displayed element.
    async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Waits until `selector` matches a displayed *and* enabled element.
    async fn wait_enabled(&self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Waits until any of `selectors` matches a displayed element and returns
    /// the index of the first (in argument order) that does.
    async fn wait_any_visible(
        &self,
        selectors: &[&str],
        timeout: Duration,
    ) -> Result<usize, DriverError>;

    /// Non-waiting visibility probe; an absent element is simply `false`.
    async fn is_visible(&self, selector: &str) -> Result<bool, DriverError>;

    async fn click(&self, selector: &str) -> Result<(), DriverError>;

    async fn click_nth(&self, selector: &str, index: usize) -> Result<(), DriverError>;

    /// Clears the field then types `value`.
    async fn fill(&self, selector: &str, value: &str) -> Result<(), DriverError>;

    async fn fill_nth(&self, selector: &str, index: usize, value: &str)
        -> Result<(), DriverError>;

    async fn text(&self, selector: &str) -> Result<String, DriverError>;

    async fn attr(&self, selector: &str, name: &str) -> Result<Option<String>, DriverError>;

    /// Number of elements currently matching `selector`.
    async fn count(&self, selector: &str) -> Result<usize, DriverError>;

    /// Arms a network capture for the next response whose URL contains
    /// `url_fragment`, clicks `trigger_selector`, and returns the captured
    /// body parsed as JSON.
    async fn capture_response(
        &self,
        url_fragment: &str,
        trigger_selector: &str,
        timeout: Duration,
    ) -> Result<serde_json::Value, DriverError>;

    /// Full-page screenshot written to `path`.
    async fn screenshot(&self, path: &Path) -> Result<(), DriverError>;

    /// Exports the current session state (cookie jar + origin) in a
    /// serializable form.
    async fn export_snapshot(&self) -> Result<SessionSnapshot, DriverError>;

    async fn close(&self) -> Result<(), DriverError>;
}

/// Creates isolated page sessions, optionally seeded from a persisted
/// snapshot.
#[allow(async_fn_in_trait)]
pub trait Browser {
    type Page: Page;

    async fn open_page(
        &self,
        snapshot: Option<&SessionSnapshot>,
    ) -> Result<Self::Page, DriverError>;
}
