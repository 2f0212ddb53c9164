//! Fire-and-forget webhook delivery.

use std::time::Duration;

use serde_json::Value;

/// Posts card payloads to a chat webhook. Every failure mode — transport
/// error, non-success status — is logged and swallowed; report delivery
/// must never abort the run that produced the data.
pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    /// # Errors
    ///
    /// Returns the underlying error when the HTTP client cannot be built.
    pub fn new(timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Posts `payload` as JSON. `context` names the report in logs, e.g.
    /// the store name or "fleet".
    pub async fn post(&self, url: &str, payload: &Value, context: &str) {
        match self.client.post(url).json(payload).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!(context, "posted report to webhook");
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                tracing::error!(context, status = %status, body = %body, "webhook rejected the report");
            }
            Err(e) => {
                tracing::error!(context, error = %e, "error posting to webhook");
            }
        }
    }
}
