//! Wire shapes of the backend metrics API.

use serde::Deserialize;

/// One entry of the `/api/metrics` response array. Entries come in several
/// rollup types; only `MASTER` rows describe a single worker's day.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsEntry {
    #[serde(rename = "shopperName")]
    pub shopper_name: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    #[serde(default)]
    pub metrics: EntryMetrics,
}

/// Numeric block of a metrics entry. The backend omits fields it has no
/// data for, so every numeric defaults to zero.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EntryMetrics {
    #[serde(rename = "OrdersShopped_V2", default)]
    pub orders_shopped: f64,
    #[serde(rename = "PickedUnits_V2", default)]
    pub picked_units: f64,
    #[serde(rename = "PickTimeInSec_V2", default)]
    pub pick_time_secs: f64,
    /// Percentage, e.g. `1.4` means 1.4 %.
    #[serde(rename = "ItemNotFoundRate_V2", default)]
    pub item_not_found_rate: f64,
    /// Percentage.
    #[serde(rename = "LatePicksRate", default)]
    pub late_picks_rate: f64,
    #[serde(rename = "RequestedQuantity_V2", default)]
    pub requested_quantity: f64,
}
