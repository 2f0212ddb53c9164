//! Threshold classification for rendered metrics.
//!
//! Classification decorates report output only; it never feeds back into
//! aggregation math.

use crate::metrics::parse_metric_value;

pub const EMOJI_GOOD: &str = "\u{2705}";
pub const EMOJI_BAD: &str = "\u{274C}";
pub const COLOR_GOOD: &str = "#2E8B57";
pub const COLOR_BAD: &str = "#CD5C5C";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub uph: f64,
    pub lates: f64,
    pub inf: f64,
}

/// Which metric a value represents. UPH is good at-or-above its threshold;
/// lates and INF are good at-or-below theirs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Uph,
    Lates,
    Inf,
}

impl MetricKind {
    #[must_use]
    pub fn is_good(self, value: f64, thresholds: &Thresholds) -> bool {
        match self {
            MetricKind::Uph => value >= thresholds.uph,
            MetricKind::Lates => value <= thresholds.lates,
            MetricKind::Inf => value <= thresholds.inf,
        }
    }
}

/// Appends a pass/fail emoji to a formatted metric. Values that carry no
/// parseable number pass through unchanged.
#[must_use]
pub fn with_emoji(value: &str, kind: MetricKind, thresholds: &Thresholds) -> String {
    match parse_metric_value(value) {
        Some(numeric) => {
            let emoji = if kind.is_good(numeric, thresholds) {
                EMOJI_GOOD
            } else {
                EMOJI_BAD
            };
            format!("{value} {emoji}")
        }
        None => value.to_string(),
    }
}

/// Wraps a formatted metric in a good/bad font-color tag. Values that carry
/// no parseable number pass through unchanged.
#[must_use]
pub fn with_color(value: &str, kind: MetricKind, thresholds: &Thresholds) -> String {
    match parse_metric_value(value) {
        Some(numeric) => {
            let color = if kind.is_good(numeric, thresholds) {
                COLOR_GOOD
            } else {
                COLOR_BAD
            };
            format!("<font color=\"{color}\">{value}</font>")
        }
        None => value.to_string(),
    }
}
