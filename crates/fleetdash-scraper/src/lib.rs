//! Per-store data extraction from the seller portal.
//!
//! Two extractors share a page: one intercepts the metrics API behind the
//! productivity dashboard, the other reads the inventory-accuracy report
//! table. Both expose an `Option` result — `None` means "this attempt
//! produced nothing, try again", which is exactly what [`run_with_retries`]
//! retries on. Empty data is a success, not a retry.

pub mod inf;
pub mod metrics;
pub mod retry;
pub mod types;

mod error;

pub use error::ScrapeError;
pub use inf::InventoryInsightExtractor;
pub use metrics::MetricsExtractor;
pub use retry::run_with_retries;
