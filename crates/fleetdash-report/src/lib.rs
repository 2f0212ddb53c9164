//! Report cards and webhook delivery.
//!
//! Builds Chat `cardsV2` documents from per-store results and posts them.
//! Delivery is fire-and-forget: a rejected or unreachable webhook is logged
//! and never fails the run that produced the data.

pub mod fleet;
pub mod payload;
pub mod webhook;

pub use fleet::{fleet_rollup, FleetRollup};
pub use payload::{build_fleet_report, build_store_report};
pub use webhook::WebhookClient;
