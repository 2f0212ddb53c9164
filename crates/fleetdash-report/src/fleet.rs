//! Fleet-wide rollup of per-store results.

use fleetdash_core::{parse_metric_value, StoreResult};

/// Volume-weighted fleet totals, formatted the same way store aggregates
/// are.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetRollup {
    pub stores: usize,
    pub orders: u64,
    pub units: u64,
    pub uph: String,
    pub lates_rate: String,
    pub inf_rate: String,
}

/// Folds the results that carry a store identity into fleet totals; `None`
/// when no result qualifies (a failed store contributes nothing at all).
///
/// The fold works from the *formatted* per-store strings, so the fleet
/// numbers inherit each store's display rounding. Pick time is
/// reconstructed as `units / uph * 3600` and only for stores whose parsed
/// UPH is positive — a store with units but a zero UPH adds its units to
/// the fleet total while adding no pick time, deliberately deflating
/// nothing and inflating fleet UPH rather than dividing by zero.
#[must_use]
pub fn fleet_rollup(results: &[StoreResult]) -> Option<FleetRollup> {
    let qualifying: Vec<&StoreResult> = results.iter().filter(|r| r.has_identity()).collect();
    if qualifying.is_empty() {
        return None;
    }

    let mut orders: u64 = 0;
    let mut units: u64 = 0;
    let mut pick_secs = 0.0_f64;
    let mut weighted_lates = 0.0_f64;
    let mut weighted_inf = 0.0_f64;

    for result in &qualifying {
        let agg = &result.aggregate;
        orders += agg.orders;
        units += agg.units;

        let uph = parse_metric_value(&agg.uph).unwrap_or(0.0);
        if uph > 0.0 {
            pick_secs += agg.units as f64 / uph * 3600.0;
        }
        weighted_lates += parse_metric_value(&agg.lates_rate).unwrap_or(0.0) * agg.orders as f64;
        weighted_inf += parse_metric_value(&agg.inf_rate).unwrap_or(0.0) * agg.units as f64;
    }

    let uph = if pick_secs > 0.0 {
        units as f64 / (pick_secs / 3600.0)
    } else {
        0.0
    };
    let lates = if orders > 0 {
        weighted_lates / orders as f64
    } else {
        0.0
    };
    let inf = if units > 0 {
        weighted_inf / units as f64
    } else {
        0.0
    };

    Some(FleetRollup {
        stores: qualifying.len(),
        orders,
        units,
        uph: format!("{uph:.0}"),
        lates_rate: format!("{lates:.1} %"),
        inf_rate: format!("{inf:.1} %"),
    })
}

#[cfg(test)]
#[path = "fleet_test.rs"]
mod fleet_test;
