//! Probe that decides whether the saved session is still honoured.

use std::time::Duration;

use fleetdash_browser::{DriverError, Page};

/// Element that only renders on the authenticated metrics dashboard.
pub(crate) const DASHBOARD_MARKER: &str = "#dashboard-title-component-id";

/// Navigates to `probe_url` and reports whether a fresh login is needed.
///
/// Being bounced to an address containing a sign-in marker means yes;
/// otherwise the dashboard marker must appear within `wait`. The check is
/// fail-closed: any error also reads as "login required". One attempt, no
/// retry — the caller either proceeds or re-primes.
pub async fn is_login_required<P: Page>(page: &P, probe_url: &str, wait: Duration) -> bool {
    match probe(page, probe_url, wait).await {
        Ok(required) => required,
        Err(e) => {
            tracing::warn!(error = %e, "session probe failed; assuming login required");
            true
        }
    }
}

async fn probe<P: Page>(page: &P, probe_url: &str, wait: Duration) -> Result<bool, DriverError> {
    page.goto(probe_url).await?;

    let address = page.current_url().await?;
    if address.to_lowercase().contains("signin") || address.contains("/ap/") {
        tracing::info!("session invalid, login required");
        return Ok(true);
    }

    page.wait_visible(DASHBOARD_MARKER, wait).await?;
    tracing::info!("existing session still valid");
    Ok(false)
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;
