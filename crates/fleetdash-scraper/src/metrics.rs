//! Productivity-metrics extraction from the store dashboard.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use fleetdash_browser::{save_screenshot, Page};
use fleetdash_core::metrics::WorkerSample;
use fleetdash_core::{AppConfig, StoreAccumulator, StoreConfig, StoreMetrics};

use crate::error::ScrapeError;
use crate::types::MetricsEntry;

const REFRESH_BUTTON: &str = "xpath=//button[normalize-space()='Refresh']";
const CUSTOM_PRESET: &str =
    "xpath=//*[@id='content']//span[contains(normalize-space(.), 'Customised')]";
const DATE_PICKER: &str = "kat-date-range-picker";
const DATE_INPUT: &str = r#"kat-date-range-picker input[type="text"]"#;
const APPLY_BUTTON: &str = "xpath=//button[normalize-space()='Apply']";
const METRICS_FRAGMENT: &str = "/api/metrics";

/// Sentinel the backend emits for rows it could not attribute to a worker.
const NAME_NOT_FOUND: &str = "SHOPPER_NAME_NOT_FOUND";

/// Pulls today's per-worker productivity numbers for one store by driving
/// the dashboard's date picker and intercepting the metrics API call the
/// Apply button fires.
pub struct MetricsExtractor {
    base_url: String,
    wait: Duration,
    action: Duration,
    output_dir: PathBuf,
}

impl MetricsExtractor {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.seller_base_url.clone(),
            wait: Duration::from_secs(config.wait_timeout_secs),
            action: Duration::from_secs(config.action_timeout_secs),
            output_dir: config.output_dir.clone(),
        }
    }

    /// One extraction attempt. `None` means the attempt failed and is worth
    /// retrying; a store with no qualifying workers yields the degenerate
    /// result, which is a success.
    pub async fn scrape<P: Page>(&self, page: &P, store: &StoreConfig) -> Option<StoreMetrics> {
        tracing::info!(store = %store.store_name, "starting metrics collection");
        match self.scrape_inner(page, store).await {
            Ok(metrics) => {
                if metrics.workers.is_empty() {
                    tracing::warn!(store = %store.store_name, "no active workers found");
                } else {
                    tracing::info!(
                        store = %store.store_name,
                        workers = metrics.workers.len(),
                        "metrics collection complete"
                    );
                }
                Some(metrics)
            }
            Err(e) => {
                tracing::error!(store = %store.store_name, error = %e, "metrics collection failed");
                save_screenshot(
                    page,
                    &self.output_dir,
                    &format!("{}_metrics_error", store.store_name),
                )
                .await;
                None
            }
        }
    }

    async fn scrape_inner<P: Page>(
        &self,
        page: &P,
        store: &StoreConfig,
    ) -> Result<StoreMetrics, ScrapeError> {
        page.goto(&store.dashboard_url(&self.base_url)).await?;
        page.wait_visible(REFRESH_BUTTON, self.wait).await?;

        // Switch the dashboard to an explicit single-day range: today. The
        // preset control renders before it accepts clicks.
        page.wait_enabled(CUSTOM_PRESET, self.wait).await?;
        page.click_nth(CUSTOM_PRESET, 0).await?;
        page.wait_visible(DATE_PICKER, self.wait).await?;
        let today = Local::now().format("%m/%d/%Y").to_string();
        page.fill_nth(DATE_INPUT, 0, &today).await?;
        page.fill_nth(DATE_INPUT, 1, &today).await?;

        let body = page
            .capture_response(METRICS_FRAGMENT, APPLY_BUTTON, self.action.max(self.wait))
            .await?;
        let entries: Vec<MetricsEntry> = serde_json::from_value(body)?;
        tracing::info!(store = %store.store_name, entries = entries.len(), "received metrics API response");

        Ok(fold_entries(&store.store_name, &entries))
    }
}

/// Folds qualifying API entries through the store accumulator: `MASTER`
/// rows only, attributed to a real worker name, with at least one order.
fn fold_entries(store_name: &str, entries: &[MetricsEntry]) -> StoreMetrics {
    let mut acc = StoreAccumulator::new(store_name);
    for entry in entries {
        if entry.entry_type.as_deref() != Some("MASTER") {
            continue;
        }
        let Some(name) = entry.shopper_name.as_deref() else {
            continue;
        };
        if name.is_empty() || name == NAME_NOT_FOUND {
            continue;
        }
        let m = entry.metrics;
        acc.push(
            name,
            WorkerSample {
                orders: m.orders_shopped,
                units: m.picked_units,
                pick_secs: m.pick_time_secs,
                inf_rate: m.item_not_found_rate,
                lates_rate: m.late_picks_rate,
                requested_units: m.requested_quantity,
            },
        );
    }
    acc.finish()
}

#[cfg(test)]
#[path = "metrics_test.rs"]
mod metrics_test;
