//! Credential + one-time-code login flow.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fleetdash_browser::{save_screenshot, Browser, Page, SessionSnapshot};
use fleetdash_core::AppConfig;

use crate::error::SessionError;
use crate::guard::{is_login_required, DASHBOARD_MARKER};
use crate::store::SessionStore;
use crate::totp::totp;

const EMAIL_INPUT: &str = "input#ap_email";
const CONTINUE_SHOPPING: &str =
    "xpath=//button[contains(normalize-space(.), 'Continue shopping')]";
const CONTINUE_SUBMIT: &str = r#"input[type="submit"][aria-labelledby="continue-announce"]"#;
const CONTINUE_BUTTON: &str = "input#continue";
const PASSWORD_INPUT: &str = "input#ap_password";
const SIGN_IN_SUBMIT: &str = "input#signInSubmit";
const OTP_INPUT: &str = r#"input[id*="otp"]"#;
const OTP_SUBMIT: &str = "xpath=//button[normalize-space()='Sign in']";
const ACCOUNT_PICKER: &str = "xpath=//h1[contains(normalize-space(.), 'Select an account')]";
const INVENTORY_DASHBOARD: &str = "#range-selector";
const SHOPPER_PERFORMANCE: &str =
    "xpath=//h1[contains(normalize-space(.), 'Shopper Performance')]";

/// Which page the portal dropped us on after sign-in. All four count as a
/// verified login; the portal picks one based on the account's last-used
/// view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingKind {
    AccountPicker,
    MetricsDashboard,
    InventoryInsights,
    ShopperPerformance,
}

impl std::fmt::Display for LandingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::AccountPicker => "account picker",
            Self::MetricsDashboard => "metrics dashboard",
            Self::InventoryInsights => "inventory insights",
            Self::ShopperPerformance => "shopper performance",
        };
        f.write_str(label)
    }
}

/// Drives the portal's sign-in pages: an optional interstitial, the
/// email/password forms, and at most one one-time-code challenge.
pub struct Authenticator {
    login_url: String,
    email: String,
    password: String,
    otp_secret: String,
    wait: Duration,
    output_dir: PathBuf,
}

impl Authenticator {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            login_url: config.login_url.clone(),
            email: config.login_email.clone(),
            password: config.login_password.clone(),
            otp_secret: config.otp_secret.clone(),
            wait: Duration::from_secs(config.wait_timeout_secs),
            output_dir: config.output_dir.clone(),
        }
    }

    /// Runs the full login flow on `page`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Driver`] when a page interaction fails or no
    /// recognised landing page appears within the wait budget, and
    /// [`SessionError::OtpSecret`] when the shared secret cannot be decoded.
    /// On any failure a diagnostic screenshot is attempted first.
    pub async fn login<P: Page>(&self, page: &P) -> Result<LandingKind, SessionError> {
        tracing::info!("starting login flow");
        match self.login_inner(page).await {
            Ok(landing) => {
                tracing::info!(landing = %landing, "login verified");
                Ok(landing)
            }
            Err(e) => {
                tracing::error!(error = %e, "login failed");
                save_screenshot(page, &self.output_dir, "login_failure").await;
                Err(e)
            }
        }
    }

    async fn login_inner<P: Page>(&self, page: &P) -> Result<LandingKind, SessionError> {
        page.goto(&self.login_url).await.map_err(SessionError::from)?;

        // The portal sometimes interposes a "continue" interstitial before
        // the credential form.
        let gate = page
            .wait_any_visible(&[EMAIL_INPUT, CONTINUE_SHOPPING, CONTINUE_SUBMIT], self.wait)
            .await?;
        match gate {
            1 => page.click(CONTINUE_SHOPPING).await?,
            2 => page.click(CONTINUE_SUBMIT).await?,
            _ => {}
        }
        if gate != 0 {
            page.wait_visible(EMAIL_INPUT, self.wait).await?;
        }

        page.fill(EMAIL_INPUT, &self.email).await?;
        page.click(CONTINUE_BUTTON).await?;
        page.wait_visible(PASSWORD_INPUT, self.wait).await?;
        page.fill(PASSWORD_INPUT, &self.password).await?;
        page.click(SIGN_IN_SUBMIT).await?;

        let outcomes = [
            OTP_INPUT,
            ACCOUNT_PICKER,
            DASHBOARD_MARKER,
            INVENTORY_DASHBOARD,
            SHOPPER_PERFORMANCE,
        ];
        let hit = page.wait_any_visible(&outcomes, self.wait).await?;
        if hit == 0 {
            tracing::info!("one-time-code challenge detected");
            let code = totp(&self.otp_secret, unix_now())?;
            page.fill(OTP_INPUT, &code).await?;
            page.click(OTP_SUBMIT).await?;
            // One shot only; a second challenge means the code was wrong
            // and the landing wait below times out.
            let landed = page.wait_any_visible(&outcomes[1..], self.wait).await?;
            return Ok(landing_kind(landed));
        }
        Ok(landing_kind(hit - 1))
    }

    /// Logs in on a fresh page, verifies the session actually sticks by
    /// probing `probe_url` (the first store's dashboard), and persists the
    /// resulting snapshot.
    ///
    /// # Errors
    ///
    /// Propagates login errors; returns [`SessionError::Verification`] when
    /// the probe still demands a login after a nominally successful flow.
    pub async fn prime_session<B: Browser>(
        &self,
        browser: &B,
        probe_url: &str,
        store: &SessionStore,
    ) -> Result<SessionSnapshot, SessionError> {
        tracing::info!("priming a fresh session");
        let page = browser.open_page(None).await?;
        let result = self.prime_on(&page, probe_url, store).await;
        if let Err(e) = page.close().await {
            tracing::warn!(error = %e, "could not close priming page");
        }
        result
    }

    async fn prime_on<P: Page>(
        &self,
        page: &P,
        probe_url: &str,
        store: &SessionStore,
    ) -> Result<SessionSnapshot, SessionError> {
        self.login(page).await?;

        if is_login_required(page, probe_url, self.wait).await {
            tracing::error!("session verification failed after login flow");
            save_screenshot(page, &self.output_dir, "session_verification_failure").await;
            return Err(SessionError::Verification);
        }

        let snapshot = page.export_snapshot().await?;
        store.save(&snapshot)?;
        tracing::info!("saved new session snapshot");
        Ok(snapshot)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn landing_kind(index: usize) -> LandingKind {
    match index {
        0 => LandingKind::AccountPicker,
        1 => LandingKind::MetricsDashboard,
        2 => LandingKind::InventoryInsights,
        _ => LandingKind::ShopperPerformance,
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;
