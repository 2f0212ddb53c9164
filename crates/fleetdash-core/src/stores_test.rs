use std::io::Write;

use super::*;

fn store(name: &str, merchant: &str, marketplace: &str) -> StoreConfig {
    StoreConfig {
        store_name: name.to_string(),
        merchant_id: merchant.to_string(),
        marketplace_id: marketplace.to_string(),
    }
}

#[test]
fn dashboard_url_carries_both_identifiers() {
    let s = store("North - Oldham", "A1B2C3", "MKT9");
    assert_eq!(
        s.dashboard_url("https://sellercentral.amazon.co.uk"),
        "https://sellercentral.amazon.co.uk/snowdash?mons_sel_dir_mcid=A1B2C3&mons_sel_mkid=MKT9"
    );
}

#[test]
fn dashboard_url_tolerates_trailing_slash_on_base() {
    let s = store("Oldham", "A1B2C3", "MKT9");
    assert!(s
        .dashboard_url("https://portal.example.com/")
        .starts_with("https://portal.example.com/snowdash?"));
}

#[test]
fn short_name_strips_region_prefix() {
    assert_eq!(short_store_name("North West - Oldham"), "Oldham");
    assert_eq!(short_store_name("Oldham"), "Oldham");
}

#[test]
fn validate_rejects_empty_roster() {
    let result = validate_stores(&StoresFile { stores: vec![] });
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn validate_rejects_duplicate_identity() {
    let file = StoresFile {
        stores: vec![store("A", "m1", "k1"), store("B", "m1", "k1")],
    };
    let result = validate_stores(&file);
    assert!(
        matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("duplicate")),
        "expected duplicate-identity error, got: {result:?}"
    );
}

#[test]
fn validate_allows_same_merchant_on_different_marketplaces() {
    let file = StoresFile {
        stores: vec![store("A", "m1", "k1"), store("B", "m1", "k2")],
    };
    assert!(validate_stores(&file).is_ok());
}

#[test]
fn load_stores_parses_yaml_roster() {
    let mut tmp = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(
        tmp,
        "stores:\n  - store_name: North - Oldham\n    merchant_id: A1B2C3\n    marketplace_id: MKT9\n"
    )
    .expect("write yaml");

    let file = load_stores(tmp.path()).expect("roster should load");
    assert_eq!(file.stores.len(), 1);
    assert_eq!(file.stores[0].store_name, "North - Oldham");
}

#[test]
fn load_stores_missing_file_is_io_error() {
    let result = load_stores(std::path::Path::new("/nonexistent/stores.yaml"));
    assert!(matches!(result, Err(ConfigError::StoresFileIo { .. })));
}
