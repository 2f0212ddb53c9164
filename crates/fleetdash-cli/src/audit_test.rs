use fleetdash_core::metrics::{StoreAggregate, StoreResult};

use super::AuditLog;

fn result(store: &str) -> StoreResult {
    StoreResult {
        aggregate: StoreAggregate {
            store_name: store.to_string(),
            orders: 10,
            units: 300,
            uph: "300".to_string(),
            inf_rate: "1.0 %".to_string(),
            lates_rate: "0.0 %".to_string(),
        },
        workers: Vec::new(),
        inf_items: Vec::new(),
    }
}

#[tokio::test]
async fn appends_one_json_line_per_result() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let log = AuditLog::new(&path);

    log.append(&result("Fresh - Leeds")).await;
    log.append(&result("Fresh - York")).await;

    let raw = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(
        first.pointer("/aggregate/store_name").and_then(|v| v.as_str()),
        Some("Fresh - Leeds")
    );
    let stamp = first.pointer("/timestamp").and_then(|v| v.as_str()).unwrap();
    // YYYY-MM-DD HH:MM:SS
    assert_eq!(stamp.len(), 19);
    assert_eq!(stamp.as_bytes()[4], b'-');
    assert_eq!(stamp.as_bytes()[10], b' ');
    assert_eq!(stamp.as_bytes()[13], b':');

    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(
        second.pointer("/aggregate/store_name").and_then(|v| v.as_str()),
        Some("Fresh - York")
    );
}

#[tokio::test]
async fn unwritable_path_is_swallowed() {
    let log = AuditLog::new("/nonexistent-root/audit.jsonl");
    // Contract: never panics, never propagates.
    log.append(&result("Fresh - Leeds")).await;
}
