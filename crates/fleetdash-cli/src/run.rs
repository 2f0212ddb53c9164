//! One full collection run, end to end.

use std::time::Duration;

use fleetdash_browser::{Browser, Page, SessionSnapshot, WebDriverBrowser};
use fleetdash_core::{load_stores, AppConfig, StoreConfig, StoreResult};
use fleetdash_report::{build_fleet_report, build_store_report, WebhookClient};
use fleetdash_scraper::{run_with_retries, InventoryInsightExtractor, MetricsExtractor};
use fleetdash_session::{is_login_required, Authenticator, SessionStore};

use crate::audit::AuditLog;

/// Loads the roster, stands up the WebDriver browser, and runs the fleet.
pub async fn run(config: &AppConfig, dry_run: bool) -> anyhow::Result<()> {
    tracing::info!("starting fleetdash run");
    let stores = load_stores(&config.stores_path)?.stores;
    tokio::fs::create_dir_all(&config.output_dir).await?;

    let browser =
        WebDriverBrowser::new(&config.webdriver_url, config.page_timeout_secs, !config.debug)?;
    run_with_browser(config, dry_run, &browser, &stores).await
}

/// The run proper, generic over the browser so tests can script one.
///
/// Strictly sequential: one store at a time, each on a fresh page seeded
/// from the session snapshot, metrics then inventory accuracy back to back.
/// A store whose metrics never materialise is skipped; only a session that
/// cannot be established at all aborts the run.
async fn run_with_browser<B: Browser>(
    config: &AppConfig,
    dry_run: bool,
    browser: &B,
    stores: &[StoreConfig],
) -> anyhow::Result<()> {
    let session_store = SessionStore::new(&config.state_path);
    let auth = Authenticator::from_config(config);
    let wait = Duration::from_secs(config.wait_timeout_secs);
    let first_store = stores
        .first()
        .ok_or_else(|| anyhow::anyhow!("store roster is empty"))?;
    let probe_url = first_store.dashboard_url(&config.seller_base_url);

    let snapshot = ensure_session(browser, &auth, &session_store, &probe_url, wait).await?;

    let metrics = MetricsExtractor::from_config(config);
    let inf = InventoryInsightExtractor::from_config(config);
    let audit = AuditLog::new(&config.audit_log_path);
    let retry_delay = Duration::from_secs(config.retry_delay_secs);

    let mut results = Vec::new();
    for store in stores {
        tracing::info!(store = %store.store_name, "processing store");
        let page = match browser.open_page(Some(&snapshot)).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(store = %store.store_name, error = %e, "could not open a page; skipping store");
                continue;
            }
        };

        let store_metrics = run_with_retries(config.retry_attempts, retry_delay, || {
            metrics.scrape(&page, store)
        })
        .await;
        let inf_items = run_with_retries(config.retry_attempts, retry_delay, || {
            inf.scrape(&page, store)
        })
        .await;

        if let Err(e) = page.close().await {
            tracing::warn!(store = %store.store_name, error = %e, "could not close store page");
        }

        match store_metrics {
            Some(collected) => {
                let result = StoreResult::new(collected, inf_items.unwrap_or_default());
                audit.append(&result).await;
                results.push(result);
            }
            None => {
                tracing::error!(store = %store.store_name, "no metrics after all attempts; skipping store");
            }
        }
    }

    if results.is_empty() {
        tracing::error!("run produced no data for any store");
        return Ok(());
    }
    if dry_run {
        tracing::info!(stores = results.len(), "dry run: skipping webhook delivery");
        return Ok(());
    }

    post_reports(config, &results).await?;
    tracing::info!(
        processed = results.len(),
        total = stores.len(),
        "run completed"
    );
    Ok(())
}

/// Reuses the persisted session when the guard probe accepts it, otherwise
/// primes a fresh one. Priming failure is fatal: nothing downstream can
/// work without a session.
async fn ensure_session<B: Browser>(
    browser: &B,
    auth: &Authenticator,
    session_store: &SessionStore,
    probe_url: &str,
    wait: Duration,
) -> anyhow::Result<SessionSnapshot> {
    if let Some(snapshot) = session_store.load() {
        tracing::info!("found saved session snapshot; verifying");
        let page = browser.open_page(Some(&snapshot)).await?;
        let required = is_login_required(&page, probe_url, wait).await;
        if let Err(e) = page.close().await {
            tracing::warn!(error = %e, "could not close probe page");
        }
        if !required {
            return Ok(snapshot);
        }
    }
    Ok(auth.prime_session(browser, probe_url, session_store).await?)
}

/// Per-store cards in roster order, paced by the configured delay, then the
/// fleet summary last. Unconfigured webhooks skip their half silently.
async fn post_reports(config: &AppConfig, results: &[StoreResult]) -> anyhow::Result<()> {
    let client = WebhookClient::new(config.webhook_timeout_secs)?;
    let thresholds = config.thresholds();
    let delay = Duration::from_millis(config.webhook_delay_ms);

    if let Some(url) = &config.store_webhook_url {
        for result in results {
            let payload = build_store_report(result, &thresholds, config.qr_size);
            client.post(url, &payload, &result.aggregate.store_name).await;
            tokio::time::sleep(delay).await;
        }
    } else {
        tracing::info!("store webhook not configured; skipping per-store reports");
    }

    if let Some(url) = &config.fleet_webhook_url {
        match build_fleet_report(results, &thresholds) {
            Some(payload) => client.post(url, &payload, "fleet").await,
            None => tracing::warn!("no identified store results; skipping fleet summary"),
        }
    } else {
        tracing::info!("fleet webhook not configured; skipping fleet summary");
    }
    Ok(())
}

#[cfg(test)]
#[path = "run_test.rs"]
mod run_test;
