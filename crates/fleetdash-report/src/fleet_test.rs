use fleetdash_core::metrics::{StoreAggregate, StoreResult};

use super::*;

fn result(store: &str, orders: u64, units: u64, uph: &str, inf: &str, lates: &str) -> StoreResult {
    StoreResult {
        aggregate: StoreAggregate {
            store_name: store.to_string(),
            orders,
            units,
            uph: uph.to_string(),
            inf_rate: inf.to_string(),
            lates_rate: lates.to_string(),
        },
        workers: Vec::new(),
        inf_items: Vec::new(),
    }
}

#[test]
fn rollup_is_volume_weighted_not_a_mean_of_stores() {
    let results = vec![
        result("Fresh - Leeds", 10, 300, "300", "1.0 %", "0.0 %"),
        result("Fresh - York", 30, 300, "100", "3.0 %", "2.0 %"),
    ];

    let rollup = fleet_rollup(&results).expect("two qualifying stores");
    assert_eq!(rollup.stores, 2);
    assert_eq!(rollup.orders, 40);
    assert_eq!(rollup.units, 600);
    // 600 units over (300/300 + 300/100) hours = 150, not mean(300, 100).
    assert_eq!(rollup.uph, "150");
    // INF weighted by units, lates by orders.
    assert_eq!(rollup.inf_rate, "2.0 %");
    assert_eq!(rollup.lates_rate, "1.5 %");
}

#[test]
fn results_without_identity_contribute_nothing() {
    let results = vec![
        result("Fresh - Leeds", 10, 300, "300", "1.0 %", "0.0 %"),
        result("", 999, 9999, "999", "9.0 %", "9.0 %"),
        result("Fresh - York", 30, 300, "100", "3.0 %", "2.0 %"),
    ];

    let rollup = fleet_rollup(&results).expect("qualifying stores remain");
    assert_eq!(rollup.stores, 2);
    assert_eq!(rollup.orders, 40);
    assert_eq!(rollup.uph, "150");
}

#[test]
fn no_qualifying_results_is_none() {
    assert!(fleet_rollup(&[]).is_none());
    assert!(fleet_rollup(&[result("", 10, 10, "10", "1.0 %", "1.0 %")]).is_none());
}

#[test]
fn zero_uph_store_adds_units_but_no_pick_time() {
    // Units counted, pick time not: with only this store the fleet UPH
    // stays zero instead of dividing by zero.
    let alone = fleet_rollup(&[result("Fresh - Hull", 10, 500, "0", "1.0 %", "1.0 %")]).unwrap();
    assert_eq!(alone.uph, "0");
    assert_eq!(alone.units, 500);
    assert_eq!(alone.inf_rate, "1.0 %");

    // Next to a healthy store those free units inflate the fleet UPH.
    let mixed = fleet_rollup(&[
        result("Fresh - Hull", 10, 500, "0", "1.0 %", "1.0 %"),
        result("Fresh - Leeds", 10, 100, "100", "1.0 %", "1.0 %"),
    ])
    .unwrap();
    assert_eq!(mixed.uph, "600");
}

#[test]
fn degenerate_store_keeps_its_identity_in_the_count() {
    let rollup = fleet_rollup(&[
        result("Fresh - Leeds", 10, 300, "300", "1.0 %", "0.0 %"),
        result("Fresh - Hull", 0, 0, "0", "0.0 %", "0.0 %"),
    ])
    .unwrap();
    assert_eq!(rollup.stores, 2);
    assert_eq!(rollup.orders, 10);
    assert_eq!(rollup.uph, "300");
}
