//! Top inventory-accuracy offenders from the inventory-insights report.

use std::path::PathBuf;
use std::time::Duration;

use fleetdash_browser::{save_screenshot, Page};
use fleetdash_core::{AppConfig, InfItem, StoreConfig};
use regex::Regex;

use crate::error::ScrapeError;

const INSIGHTS_PATH: &str = "/snow-inventory/inventoryinsights/ref=xx_infr_dnav_xx";
const RANGE_SELECTOR: &str = "#range-selector";
const FIRST_ROW: &str = "table.imp-table tbody tr";
const SORT_BY_INF_UNITS: &str = "#sort-3";

/// The report renders before its rows do; an empty table settles well
/// before the page wait budget.
const TABLE_WAIT: Duration = Duration::from_secs(20);

const TOP_ROWS: usize = 5;
const RESORT_POLL: Duration = Duration::from_millis(250);

/// Reads the top rows of the inventory-insights table, sorted by impacted
/// units. The report is account-scoped, so it reflects whichever store the
/// session last selected — always run after the store's metrics extraction.
pub struct InventoryInsightExtractor {
    base_url: String,
    wait: Duration,
    /// How long to wait for the table to visibly re-sort after the sort
    /// click before proceeding with whatever order is shown.
    sort_settle: Duration,
    thumb_size: u32,
    output_dir: PathBuf,
    size_token: Regex,
}

impl InventoryInsightExtractor {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.seller_base_url.clone(),
            wait: Duration::from_secs(config.wait_timeout_secs),
            sort_settle: TABLE_WAIT,
            thumb_size: config.thumb_size,
            output_dir: config.output_dir.clone(),
            size_token: Regex::new(r"\._SS\d+_\.").expect("valid size token regex"),
        }
    }

    /// One extraction attempt. An empty table is `Some(vec![])`; only a
    /// real failure (navigation, missing report shell, unreadable cells)
    /// is `None`.
    pub async fn scrape<P: Page>(&self, page: &P, store: &StoreConfig) -> Option<Vec<InfItem>> {
        tracing::info!(store = %store.store_name, "starting inventory-accuracy collection");
        match self.scrape_inner(page).await {
            Ok(items) => {
                tracing::info!(store = %store.store_name, items = items.len(), "scraped top accuracy offenders");
                Some(items)
            }
            Err(e) => {
                tracing::error!(store = %store.store_name, error = %e, "inventory-accuracy collection failed");
                save_screenshot(
                    page,
                    &self.output_dir,
                    &format!("{}_inf_error", store.store_name),
                )
                .await;
                None
            }
        }
    }

    async fn scrape_inner<P: Page>(&self, page: &P) -> Result<Vec<InfItem>, ScrapeError> {
        page.goto(&format!("{}{INSIGHTS_PATH}", self.base_url)).await?;
        page.wait_visible(RANGE_SELECTOR, self.wait).await?;

        if page.wait_visible(FIRST_ROW, TABLE_WAIT).await.is_err() {
            tracing::info!("no rows in the report; nothing to flag");
            return Ok(Vec::new());
        }

        let before_sort = page.text(FIRST_ROW).await?;
        page.click(SORT_BY_INF_UNITS).await?;
        self.wait_for_resort(page, &before_sort).await?;

        let rows = page.count(FIRST_ROW).await?.min(TOP_ROWS);
        let mut items = Vec::with_capacity(rows);
        for row in 1..=rows {
            items.push(self.read_row(page, row).await?);
        }
        Ok(items)
    }

    /// Waits (bounded) for the first row's text to change after the sort
    /// click. A timeout is tolerated: a single-page or pre-sorted table
    /// never changes.
    async fn wait_for_resort<P: Page>(&self, page: &P, before: &str) -> Result<(), ScrapeError> {
        let deadline = tokio::time::Instant::now() + self.sort_settle;
        loop {
            if page.text(FIRST_ROW).await? != before {
                tracing::info!("table re-sort confirmed");
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                tracing::warn!("table did not visibly re-sort; proceeding with current order");
                return Ok(());
            }
            tokio::time::sleep(RESORT_POLL).await;
        }
    }

    async fn read_row<P: Page>(&self, page: &P, row: usize) -> Result<InfItem, ScrapeError> {
        let cell = |col: usize| format!("table.imp-table tbody tr:nth-child({row}) td:nth-child({col})");

        let thumb = page
            .attr(&format!("{} img", cell(1)), "src")
            .await?
            .unwrap_or_default();
        Ok(InfItem {
            image_url: self.resize_thumb(&thumb),
            sku: page.text(&format!("{} span", cell(2))).await?,
            product_name: page.text(&format!("{} a span", cell(3))).await?,
            inf_units: page.text(&format!("{} span", cell(4))).await?,
            orders_impacted: page.text(&format!("{} span", cell(5))).await?,
            inf_pct: page.text(&format!("{} span", cell(9))).await?,
        })
    }

    /// Rewrites the size token in a product image URL to the configured
    /// thumbnail size.
    fn resize_thumb(&self, url: &str) -> String {
        self.size_token
            .replace(url, format!("._SS{}_.", self.thumb_size).as_str())
            .into_owned()
    }
}

#[cfg(test)]
#[path = "inf_test.rs"]
mod inf_test;
