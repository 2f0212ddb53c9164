use serde::{Deserialize, Serialize};

/// One worker's metrics for the reporting period, formatted for display.
/// Only workers with at least one shopped order are ever recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRecord {
    pub name: String,
    /// Units per hour, zero decimal places, e.g. `"84"`.
    pub uph: String,
    /// Item-not-found rate, one decimal place with suffix, e.g. `"1.4 %"`.
    pub inf_rate: String,
    /// Late-pick rate, one decimal place with suffix, e.g. `"0.5 %"`.
    pub lates_rate: String,
    pub orders: u64,
}

/// Store-level totals and ratio-of-sums metrics. A store with no active
/// workers carries its identity and zeroed metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreAggregate {
    pub store_name: String,
    pub orders: u64,
    pub units: u64,
    pub uph: String,
    pub inf_rate: String,
    pub lates_rate: String,
}

/// One top-impact inventory-accuracy row. Text fields are carried exactly as
/// rendered by the report table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfItem {
    pub image_url: String,
    pub sku: String,
    pub product_name: String,
    pub inf_units: String,
    pub orders_impacted: String,
    pub inf_pct: String,
}

/// Output of the metrics extractor: store aggregate plus workers sorted
/// ascending by parsed INF rate (best accuracy first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMetrics {
    pub aggregate: StoreAggregate,
    pub workers: Vec<WorkerRecord>,
}

/// Everything collected for one store in one run. Never mutated after
/// creation; appended to the run results and the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreResult {
    pub aggregate: StoreAggregate,
    pub workers: Vec<WorkerRecord>,
    pub inf_items: Vec<InfItem>,
}

impl StoreResult {
    #[must_use]
    pub fn new(metrics: StoreMetrics, inf_items: Vec<InfItem>) -> Self {
        Self {
            aggregate: metrics.aggregate,
            workers: metrics.workers,
            inf_items,
        }
    }

    /// `true` when the result carries a usable store identity. Results
    /// without one are excluded from fleet weighting.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        !self.aggregate.store_name.is_empty()
    }
}

/// Raw per-worker numbers as reported by the backend metrics API, before
/// formatting. Rates are percentages (e.g. `1.4` means 1.4 %).
#[derive(Debug, Clone, Copy)]
pub struct WorkerSample {
    pub orders: f64,
    pub units: f64,
    pub pick_secs: f64,
    pub inf_rate: f64,
    pub lates_rate: f64,
    pub requested_units: f64,
}

/// Folds qualifying worker samples into display records and store-level
/// numerator/denominator sums.
///
/// The store metrics are ratios of summed numerators and denominators, not
/// means of per-worker percentages: one high-volume worker outweighs one
/// low-volume worker in exact proportion to volume.
#[derive(Debug)]
pub struct StoreAccumulator {
    store_name: String,
    workers: Vec<WorkerRecord>,
    units: f64,
    pick_secs: f64,
    orders: f64,
    requested_units: f64,
    /// Σ requested_units × inf_rate/100 — INF numerator in units.
    inf_units: f64,
    /// Σ orders × lates_rate/100 — lates numerator in orders.
    late_orders: f64,
}

impl StoreAccumulator {
    #[must_use]
    pub fn new(store_name: &str) -> Self {
        Self {
            store_name: store_name.to_string(),
            workers: Vec::new(),
            units: 0.0,
            pick_secs: 0.0,
            orders: 0.0,
            requested_units: 0.0,
            inf_units: 0.0,
            late_orders: 0.0,
        }
    }

    /// Records one worker. Zero-activity workers (no shopped orders) are
    /// excluded entirely, regardless of their other fields.
    pub fn push(&mut self, name: &str, sample: WorkerSample) {
        if sample.orders <= 0.0 {
            return;
        }

        self.workers.push(WorkerRecord {
            name: name.to_string(),
            uph: fmt_uph(worker_uph(sample.units, sample.pick_secs)),
            inf_rate: fmt_rate(sample.inf_rate),
            lates_rate: fmt_rate(sample.lates_rate),
            orders: sample.orders as u64,
        });

        self.units += sample.units;
        self.pick_secs += sample.pick_secs;
        self.orders += sample.orders;
        self.requested_units += sample.requested_units;
        self.inf_units += sample.requested_units * (sample.inf_rate / 100.0);
        self.late_orders += sample.orders * (sample.lates_rate / 100.0);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Finalizes the store: computes overall ratios and sorts workers
    /// ascending by parsed INF rate. The sort key is the *formatted* value,
    /// so rates that round to the same display value keep encounter order
    /// (`Vec::sort_by` is stable).
    ///
    /// With no recorded workers this yields the degenerate "no active
    /// workers" result: identity present, zeroed metrics, empty worker list.
    #[must_use]
    pub fn finish(mut self) -> StoreMetrics {
        if self.workers.is_empty() {
            return StoreMetrics {
                aggregate: StoreAggregate {
                    store_name: self.store_name,
                    orders: 0,
                    units: 0,
                    uph: "0".to_string(),
                    inf_rate: "0.0 %".to_string(),
                    lates_rate: "0.0 %".to_string(),
                },
                workers: Vec::new(),
            };
        }

        let overall_uph = worker_uph(self.units, self.pick_secs);
        let overall_inf = if self.requested_units > 0.0 {
            self.inf_units / self.requested_units * 100.0
        } else {
            0.0
        };
        let overall_lates = if self.orders > 0.0 {
            self.late_orders / self.orders * 100.0
        } else {
            0.0
        };

        self.workers.sort_by(|a, b| {
            let ka = parse_metric_value(&a.inf_rate).unwrap_or(0.0);
            let kb = parse_metric_value(&b.inf_rate).unwrap_or(0.0);
            ka.total_cmp(&kb)
        });

        StoreMetrics {
            aggregate: StoreAggregate {
                store_name: self.store_name,
                orders: self.orders as u64,
                units: self.units as u64,
                uph: fmt_uph(overall_uph),
                inf_rate: fmt_rate(overall_inf),
                lates_rate: fmt_rate(overall_lates),
            },
            workers: self.workers,
        }
    }
}

fn worker_uph(units: f64, pick_secs: f64) -> f64 {
    if pick_secs > 0.0 {
        units / (pick_secs / 3600.0)
    } else {
        0.0
    }
}

fn fmt_uph(value: f64) -> String {
    format!("{value:.0}")
}

fn fmt_rate(value: f64) -> String {
    format!("{value:.1} %")
}

/// Extracts the numeric value from a formatted metric like `"2.1 %"` or
/// `"<b>UPH:</b> 84"` by dropping every non-digit, non-dot character.
/// Returns `None` when nothing parseable remains.
#[must_use]
pub fn parse_metric_value(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse().ok()
}

#[cfg(test)]
#[path = "metrics_test.rs"]
mod metrics_test;
