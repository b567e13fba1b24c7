//! CUC/CUD 계산 회귀 테스트.
use irrigation_uniformity::uniformity::{
    calculate_cud, calculate_cuc, classify, mean, round2, UniformityClass,
};

fn assert_close(label: &str, actual: f64, expected: f64, tol: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {tol})"
    );
}

#[test]
fn cuc_of_identical_values_is_perfect() {
    for x in [0.5, 7.3, 36.0, 1234.5] {
        assert_eq!(calculate_cuc(&[x, x, x, x]), 100.0, "x={x}");
    }
}

#[test]
fn cuc_degenerate_inputs_return_zero() {
    assert_eq!(calculate_cuc(&[]), 0.0);
    assert_eq!(calculate_cuc(&[0.0, 0.0, 0.0]), 0.0);
}

#[test]
fn cuc_known_value() {
    // mean 25, Σ|x-m| = 40 → 100 * (1 - 40 / 100) = 60
    assert_close("cuc", calculate_cuc(&[10.0, 20.0, 30.0, 40.0]), 60.0, 1e-9);
}

#[test]
fn cuc_is_not_clamped_for_extreme_spread() {
    // mean 2.5, Σ|x-m| = 15 → 100 * (1 - 15 / 10) = -50
    assert_close("cuc", calculate_cuc(&[0.0, 0.0, 0.0, 10.0]), -50.0, 1e-9);
}

#[test]
fn cud_of_identical_values_is_perfect() {
    for x in [0.5, 7.3, 36.0] {
        assert_eq!(calculate_cud(&[x, x, x, x]), 100.0, "x={x}");
    }
}

#[test]
fn cud_known_value() {
    // n=4 → 하위 사분위 1개(10), 평균 25 → 40%
    assert_close("cud", calculate_cud(&[10.0, 20.0, 30.0, 40.0]), 40.0, 1e-9);
}

#[test]
fn cud_low_quartile_rounds_up() {
    // n=5 → ceil(1.25) = 2 → (1 + 2) / 2 = 1.5, 평균 3 → 50%
    assert_close("cud", calculate_cud(&[5.0, 1.0, 4.0, 2.0, 3.0]), 50.0, 1e-9);
}

#[test]
fn cud_degenerate_inputs_return_zero() {
    assert_eq!(calculate_cud(&[]), 0.0);
    assert_eq!(calculate_cud(&[0.0, 0.0]), 0.0);
}

#[test]
fn coefficients_leave_input_untouched() {
    let values = vec![40.0, 10.0, 30.0, 20.0];
    let first = (calculate_cuc(&values), calculate_cud(&values));
    assert_eq!(values, vec![40.0, 10.0, 30.0, 20.0]);
    let second = (calculate_cuc(&values), calculate_cud(&values));
    assert_eq!(first, second);
}

#[test]
fn round2_rounds_half_towards_positive_infinity() {
    assert_eq!(round2(0.125), 0.13);
    assert_eq!(round2(-0.125), -0.12);
    assert_eq!(round2(92.615_384_6), 92.62);
}

#[test]
fn mean_of_empty_is_zero() {
    assert_eq!(mean(&[]), 0.0);
    assert_close("mean", mean(&[1.0, 2.0, 3.0]), 2.0, 1e-12);
}

#[test]
fn classification_thresholds() {
    assert_eq!(classify(69.99), UniformityClass::Poor);
    assert_eq!(classify(70.0), UniformityClass::Fair);
    assert_eq!(classify(80.0), UniformityClass::Good);
    assert_eq!(classify(89.99), UniformityClass::Good);
    assert_eq!(classify(90.0), UniformityClass::Excellent);
}
