//! 최소 채움 비율 테스트.
use irrigation_uniformity::coverage::{
    is_filled, meets_minimum_coverage, percent_filled, ZoneCoverage,
};

fn positions(filled: usize, total: usize) -> Vec<Option<f64>> {
    (0..total)
        .map(|i| if i < filled { Some(250.0) } else { None })
        .collect()
}

#[test]
fn eighty_percent_exactly_passes() {
    assert!(meets_minimum_coverage(&positions(8, 10), 80.0));
}

#[test]
fn seventy_percent_fails() {
    assert!(!meets_minimum_coverage(&positions(7, 10), 80.0));
}

#[test]
fn zero_readings_do_not_count_as_filled() {
    let mut values = positions(7, 10);
    values[8] = Some(0.0);
    values[9] = Some(0.0);
    assert!(!is_filled(Some(0.0)));
    assert!(!meets_minimum_coverage(&values, 80.0));
    assert_eq!(percent_filled(&values), 70.0);
}

#[test]
fn empty_expected_set_never_meets() {
    assert!(!meets_minimum_coverage(&[], 80.0));
    let zone = ZoneCoverage::from_values("R1", &[], 80.0);
    assert!(!zone.meets());
}

#[test]
fn zone_coverage_counts() {
    let zone = ZoneCoverage::from_values("R1", &positions(51, 63), 80.0);
    assert_eq!(zone.expected, 63);
    assert_eq!(zone.filled, 51);
    assert!(zone.meets());
    let zone = ZoneCoverage::from_values("R1", &positions(50, 63), 80.0);
    assert!(!zone.meets());
}
