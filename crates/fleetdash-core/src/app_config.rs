use std::path::PathBuf;

use crate::classify::Thresholds;

/// Process-wide configuration, loaded once at startup and threaded into each
/// component's constructor. No component reads the environment directly.
#[derive(Clone)]
pub struct AppConfig {
    /// Base origin of the seller portal, e.g. `https://sellercentral.amazon.co.uk`.
    pub seller_base_url: String,
    pub login_url: String,
    pub login_email: String,
    pub login_password: String,
    /// Base32-encoded shared secret for the TOTP challenge.
    pub otp_secret: String,
    /// Webhook for per-store report cards. Posting is skipped when unset.
    pub store_webhook_url: Option<String>,
    /// Webhook for the fleet summary card. Posting is skipped when unset.
    pub fleet_webhook_url: Option<String>,
    pub debug: bool,
    /// W3C WebDriver endpoint the automation sessions are created against.
    pub webdriver_url: String,
    pub stores_path: PathBuf,
    /// Persisted session snapshot (cookie jar) file.
    pub state_path: PathBuf,
    /// Append-only JSON-lines audit trail.
    pub audit_log_path: PathBuf,
    /// Directory for diagnostic screenshots.
    pub output_dir: PathBuf,
    pub page_timeout_secs: u64,
    pub wait_timeout_secs: u64,
    pub action_timeout_secs: u64,
    pub retry_attempts: u32,
    pub retry_delay_secs: u64,
    /// Pause between per-store webhook posts, to stay under the chat
    /// endpoint's rate limit.
    pub webhook_delay_ms: u64,
    pub webhook_timeout_secs: u64,
    pub uph_threshold: f64,
    pub lates_threshold: f64,
    pub inf_threshold: f64,
    /// Size token substituted into product thumbnail URLs.
    pub thumb_size: u32,
    pub qr_size: u32,
}

impl AppConfig {
    #[must_use]
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            uph: self.uph_threshold,
            lates: self.lates_threshold,
            inf: self.inf_threshold,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("seller_base_url", &self.seller_base_url)
            .field("login_url", &self.login_url)
            .field("login_email", &self.login_email)
            .field("login_password", &"[redacted]")
            .field("otp_secret", &"[redacted]")
            .field(
                "store_webhook_url",
                &self.store_webhook_url.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "fleet_webhook_url",
                &self.fleet_webhook_url.as_ref().map(|_| "[redacted]"),
            )
            .field("debug", &self.debug)
            .field("webdriver_url", &self.webdriver_url)
            .field("stores_path", &self.stores_path)
            .field("state_path", &self.state_path)
            .field("audit_log_path", &self.audit_log_path)
            .field("output_dir", &self.output_dir)
            .field("page_timeout_secs", &self.page_timeout_secs)
            .field("wait_timeout_secs", &self.wait_timeout_secs)
            .field("action_timeout_secs", &self.action_timeout_secs)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .field("webhook_delay_ms", &self.webhook_delay_ms)
            .field("webhook_timeout_secs", &self.webhook_timeout_secs)
            .field("uph_threshold", &self.uph_threshold)
            .field("lates_threshold", &self.lates_threshold)
            .field("inf_threshold", &self.inf_threshold)
            .field("thumb_size", &self.thumb_size)
            .field("qr_size", &self.qr_size)
            .finish()
    }
}
