//! Chat `cardsV2` payloads.

use chrono::Local;
use fleetdash_core::classify::{with_color, with_emoji, MetricKind};
use fleetdash_core::{short_store_name, StoreResult, Thresholds};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{json, Value};

use crate::fleet::fleet_rollup;

const HEADER_IMAGE: &str =
    "https://i.pinimg.com/originals/01/ca/da/01cada77a0a7d326d85b7969fe26a728.jpg";
const HEADER_TIME_FORMAT: &str = "%A %d %B, %H:%M";

/// RFC 3986 unreserved characters plus `/` stay bare in QR data.
const QR_DATA: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Builds the per-store report card: store-wide summary (or the no-workers
/// line), a collapsible per-worker breakdown, and the top inventory-accuracy
/// offenders with scannable SKU codes.
#[must_use]
pub fn build_store_report(result: &StoreResult, thresholds: &Thresholds, qr_size: u32) -> Value {
    let agg = &result.aggregate;
    let mut sections = Vec::new();

    if result.workers.is_empty() {
        sections.push(json!({
            "header": "Store-Wide Performance",
            "widgets": [{ "textParagraph": { "text": "No active workers found for this period." } }]
        }));
    } else {
        let summary = format!(
            "\u{2022} <b>UPH:</b> {}<br>\u{2022} <b>Lates:</b> {}<br>\u{2022} <b>INF:</b> {}<br>\u{2022} <b>Orders:</b> {}",
            with_emoji(&agg.uph, MetricKind::Uph, thresholds),
            with_emoji(&agg.lates_rate, MetricKind::Lates, thresholds),
            with_emoji(&agg.inf_rate, MetricKind::Inf, thresholds),
            agg.orders,
        );
        sections.push(json!({
            "header": "Store-Wide Performance",
            "widgets": [{ "textParagraph": { "text": summary } }]
        }));

        let worker_widgets: Vec<Value> = result
            .workers
            .iter()
            .map(|w| {
                let uph = with_color(&format!("<b>UPH:</b> {}", w.uph), MetricKind::Uph, thresholds);
                let inf =
                    with_color(&format!("<b>INF:</b> {}", w.inf_rate), MetricKind::Inf, thresholds);
                let lates = with_color(
                    &format!("<b>Lates:</b> {}", w.lates_rate),
                    MetricKind::Lates,
                    thresholds,
                );
                json!({
                    "decoratedText": {
                        "icon": { "knownIcon": "PERSON" },
                        "topLabel": format!("<b>{}</b> ({} Orders)", w.name, w.orders),
                        "text": format!("{uph} | {inf} | {lates}")
                    }
                })
            })
            .collect();
        sections.push(json!({
            "header": format!("Per-Worker Breakdown ({})", result.workers.len()),
            "collapsible": true,
            "widgets": worker_widgets
        }));
    }

    if !result.inf_items.is_empty() {
        let mut widgets = vec![json!({ "divider": {} })];
        for item in &result.inf_items {
            let qr_url = format!(
                "https://api.qrserver.com/v1/create-qr-code/?size={qr_size}x{qr_size}&data={}",
                utf8_percent_encode(&item.sku, QR_DATA)
            );
            widgets.push(json!({
                "columns": {
                    "columnItems": [
                        {
                            "horizontalSizeStyle": "FILL_MINIMUM_SPACE",
                            "widgets": [{ "image": { "imageUrl": qr_url } }]
                        },
                        {
                            "widgets": [
                                { "textParagraph": { "text": format!(
                                    "<b>{}</b><br><b>SKU:</b> {}<br><b>INF Units:</b> {} ({}) | <b>Orders:</b> {}",
                                    item.product_name, item.sku, item.inf_units,
                                    item.inf_pct, item.orders_impacted
                                ) } },
                                { "image": { "imageUrl": item.image_url } }
                            ]
                        }
                    ]
                }
            }));
            widgets.push(json!({ "divider": {} }));
        }
        sections.push(json!({
            "header": format!("Top {} INF Items", result.inf_items.len()),
            "collapsible": true,
            "uncollapsibleWidgetsCount": 1,
            "widgets": widgets
        }));
    }

    json!({
        "cardsV2": [{
            "cardId": format!("store-report-{}", agg.store_name.replace(' ', "-")),
            "card": {
                "header": {
                    "title": short_store_name(&agg.store_name),
                    "subtitle": Local::now().format(HEADER_TIME_FORMAT).to_string(),
                    "imageUrl": HEADER_IMAGE,
                    "imageType": "CIRCLE"
                },
                "sections": sections
            }
        }]
    })
}

/// Builds the fleet summary card, or `None` when no result carries a store
/// identity. Each store row repeats its formatted metrics plus a one-line
/// teaser of its worst inventory-accuracy item.
#[must_use]
pub fn build_fleet_report(results: &[StoreResult], thresholds: &Thresholds) -> Option<Value> {
    let rollup = fleet_rollup(results)?;
    let qualifying: Vec<&StoreResult> = results.iter().filter(|r| r.has_identity()).collect();

    let mut store_widgets = Vec::new();
    for (idx, result) in qualifying.iter().enumerate() {
        let agg = &result.aggregate;
        let uph = with_color(&format!("<b>UPH:</b> {}", agg.uph), MetricKind::Uph, thresholds);
        let lates = with_color(
            &format!("<b>Lates:</b> {}", agg.lates_rate),
            MetricKind::Lates,
            thresholds,
        );
        let inf =
            with_color(&format!("<b>INF:</b> {}", agg.inf_rate), MetricKind::Inf, thresholds);
        store_widgets.push(json!({
            "decoratedText": {
                "icon": { "knownIcon": "STORE" },
                "topLabel": format!("<b>{}</b> ({} Orders)", agg.store_name, agg.orders),
                "text": format!("{uph} | {lates} | {inf}")
            }
        }));
        if let Some(top) = result.inf_items.first() {
            store_widgets.push(json!({
                "textParagraph": { "text": format!("<i>Top INF: {}</i>", top.product_name) }
            }));
        }
        if idx < qualifying.len() - 1 {
            store_widgets.push(json!({ "divider": {} }));
        }
    }

    let summary = format!(
        "\u{2022} <b>UPH:</b> {}<br>\u{2022} <b>Lates:</b> {}<br>\u{2022} <b>INF:</b> {}<br>\u{2022} <b>Total Orders:</b> {}",
        with_emoji(&rollup.uph, MetricKind::Uph, thresholds),
        with_emoji(&rollup.lates_rate, MetricKind::Lates, thresholds),
        with_emoji(&rollup.inf_rate, MetricKind::Inf, thresholds),
        rollup.orders,
    );

    Some(json!({
        "cardsV2": [{
            "cardId": "fleet-summary",
            "card": {
                "header": {
                    "title": "Fleet Summary",
                    "subtitle": format!(
                        "{} | {} stores",
                        Local::now().format(HEADER_TIME_FORMAT),
                        rollup.stores
                    ),
                    "imageUrl": HEADER_IMAGE,
                    "imageType": "CIRCLE"
                },
                "sections": [
                    {
                        "header": "Fleet-Wide Performance (Weighted Avg)",
                        "widgets": [{ "textParagraph": { "text": summary } }]
                    },
                    {
                        "header": "Per-Store Breakdown",
                        "collapsible": true,
                        "uncollapsibleWidgetsCount": store_widgets.len(),
                        "widgets": store_widgets
                    }
                ]
            }
        }]
    }))
}

#[cfg(test)]
#[path = "payload_test.rs"]
mod payload_test;
