use super::*;

fn sample(
    orders: f64,
    units: f64,
    pick_secs: f64,
    inf_rate: f64,
    lates_rate: f64,
    requested_units: f64,
) -> WorkerSample {
    WorkerSample {
        orders,
        units,
        pick_secs,
        inf_rate,
        lates_rate,
        requested_units,
    }
}

#[test]
fn zero_order_workers_are_excluded() {
    let mut acc = StoreAccumulator::new("Oldham");
    acc.push("idle", sample(0.0, 500.0, 3600.0, 9.9, 9.9, 400.0));
    let metrics = acc.finish();

    assert!(metrics.workers.is_empty());
    assert_eq!(metrics.aggregate.orders, 0);
    assert_eq!(metrics.aggregate.units, 0);
    // Identity survives even with no activity.
    assert_eq!(metrics.aggregate.store_name, "Oldham");
}

#[test]
fn worker_uph_is_zero_when_pick_time_is_zero() {
    let mut acc = StoreAccumulator::new("Oldham");
    acc.push("a", sample(3.0, 120.0, 0.0, 0.0, 0.0, 120.0));
    let metrics = acc.finish();
    assert_eq!(metrics.workers[0].uph, "0");
}

#[test]
fn overall_uph_is_ratio_of_sums_not_mean_of_worker_uph() {
    let mut acc = StoreAccumulator::new("Oldham");
    // Worker A: 800 units in 1 h (800 UPH). Worker B: 100 units in 2 h (50 UPH).
    acc.push("a", sample(10.0, 800.0, 3600.0, 0.0, 0.0, 800.0));
    acc.push("b", sample(5.0, 100.0, 7200.0, 0.0, 0.0, 100.0));
    let metrics = acc.finish();

    // 900 units over 3 h = 300 UPH; the naive mean would be 425.
    assert_eq!(metrics.aggregate.uph, "300");
    assert_eq!(metrics.aggregate.units, 900);
    assert_eq!(metrics.aggregate.orders, 15);
}

#[test]
fn overall_inf_is_weighted_by_requested_units() {
    // Requested units [100, 40] at [1.0 %, 5.0 %] INF.
    let mut acc = StoreAccumulator::new("Oldham");
    acc.push("a", sample(10.0, 800.0, 3600.0, 1.0, 0.0, 100.0));
    acc.push("b", sample(5.0, 200.0, 900.0, 5.0, 0.0, 40.0));
    let metrics = acc.finish();

    // 100×0.01 + 40×0.05 = 3.0 INF units over 140 requested = 2.142…% → "2.1 %".
    assert_eq!(metrics.aggregate.inf_rate, "2.1 %");
}

#[test]
fn overall_lates_is_weighted_by_orders() {
    let mut acc = StoreAccumulator::new("Oldham");
    acc.push("a", sample(90.0, 100.0, 3600.0, 0.0, 0.0, 100.0));
    acc.push("b", sample(10.0, 100.0, 3600.0, 0.0, 10.0, 100.0));
    let metrics = acc.finish();

    // 90×0 + 10×0.10 = 1 late order over 100 = 1.0 %.
    assert_eq!(metrics.aggregate.lates_rate, "1.0 %");
}

#[test]
fn workers_sort_ascending_by_inf_rate() {
    let mut acc = StoreAccumulator::new("Oldham");
    acc.push("worst", sample(1.0, 10.0, 360.0, 5.0, 0.0, 10.0));
    acc.push("best", sample(1.0, 10.0, 360.0, 0.5, 0.0, 10.0));
    acc.push("middle", sample(1.0, 10.0, 360.0, 2.0, 0.0, 10.0));
    let metrics = acc.finish();

    let names: Vec<&str> = metrics.workers.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["best", "middle", "worst"]);
}

#[test]
fn inf_sort_ties_on_formatted_value_keep_encounter_order() {
    // 1.04 and 1.01 both format as "1.0 %", so they compare equal and the
    // stable sort keeps first-seen order.
    let mut acc = StoreAccumulator::new("Oldham");
    acc.push("first", sample(1.0, 10.0, 360.0, 1.04, 0.0, 10.0));
    acc.push("second", sample(1.0, 10.0, 360.0, 1.01, 0.0, 10.0));
    let metrics = acc.finish();

    let names: Vec<&str> = metrics.workers.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["first", "second"]);
}

#[test]
fn worker_record_formats_match_display_contract() {
    let mut acc = StoreAccumulator::new("Oldham");
    acc.push("a", sample(10.0, 800.0, 3600.0, 1.25, 2.0, 100.0));
    let metrics = acc.finish();

    let w = &metrics.workers[0];
    assert_eq!(w.uph, "800");
    assert_eq!(w.inf_rate, "1.2 %");
    assert_eq!(w.lates_rate, "2.0 %");
    assert_eq!(w.orders, 10);
}

#[test]
fn parse_metric_value_handles_suffix_and_markup() {
    assert_eq!(parse_metric_value("2.1 %"), Some(2.1));
    assert_eq!(parse_metric_value("<b>UPH:</b> 84"), Some(84.0));
    assert_eq!(parse_metric_value("n/a"), None);
    assert_eq!(parse_metric_value(""), None);
}

#[test]
fn store_result_identity_rules() {
    let mut acc = StoreAccumulator::new("Oldham");
    acc.push("a", sample(1.0, 10.0, 360.0, 0.0, 0.0, 10.0));
    let result = StoreResult::new(acc.finish(), vec![]);
    assert!(result.has_identity());

    let empty = StoreResult::new(StoreAccumulator::new("").finish(), vec![]);
    assert!(!empty.has_identity());
}
