//! Best-effort diagnostic captures.

use std::path::Path;

use chrono::Local;

use crate::page::Page;

/// Saves a timestamped screenshot into `dir` as
/// `<prefix>_<YYYYmmdd_HHMMSS>.png`. Failures are logged and swallowed:
/// diagnostics must never mask the error that triggered them.
pub async fn save_screenshot<P: Page>(page: &P, dir: &Path, prefix: &str) {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("{prefix}_{stamp}.png"));
    match page.screenshot(&path).await {
        Ok(()) => tracing::info!(path = %path.display(), "saved diagnostic screenshot"),
        Err(e) => tracing::warn!(error = %e, "could not save diagnostic screenshot"),
    }
}
