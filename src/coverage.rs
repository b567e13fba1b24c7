//! 최소 채움 비율 검증.
//!
//! 값이 있고 0 보다 큰 위치만 "채워진" 것으로 센다. 0 으로 기록된 측정은 채워지지 않은 것과 같다.

use serde::Serialize;

/// 기본 최소 채움 비율 [%].
pub const DEFAULT_MINIMUM_COVERAGE_PERCENT: f64 = 80.0;

/// 측정값이 채움 조건(값 존재, 0 초과)을 만족하는지 본다.
pub fn is_filled(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v > 0.0)
}

/// 채워진 위치의 비율[%]. 기대 위치가 없으면 0.
pub fn percent_filled(values: &[Option<f64>]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let filled = values.iter().filter(|v| is_filled(**v)).count();
    100.0 * filled as f64 / values.len() as f64
}

/// 기대 위치 전체(`values`, 미측정은 `None`) 중 채워진 비율이 기준 이상인지 판단한다.
pub fn meets_minimum_coverage(values: &[Option<f64>], threshold_percent: f64) -> bool {
    !values.is_empty() && percent_filled(values) >= threshold_percent
}

/// 구역 하나의 채움 현황.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneCoverage {
    pub zone: String,
    pub expected: usize,
    pub filled: usize,
    pub percent_filled: f64,
    pub required_percent: f64,
}

impl ZoneCoverage {
    pub fn from_values(zone: impl Into<String>, values: &[Option<f64>], required_percent: f64) -> Self {
        Self {
            zone: zone.into(),
            expected: values.len(),
            filled: values.iter().filter(|v| is_filled(**v)).count(),
            percent_filled: percent_filled(values),
            required_percent,
        }
    }

    pub fn meets(&self) -> bool {
        self.expected > 0 && self.percent_filled >= self.required_percent
    }
}
