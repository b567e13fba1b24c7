//! 균등도 계수(CUC, CUD) 계산.
//!
//! 입력 슬라이스는 유량[L/h] 이든 수심[mm] 이든 상관없다. 빈 입력이나 평균이 0 인 입력은
//! 오류가 아니라 0 을 결과로 정의한다.

use serde::{Deserialize, Serialize};

/// 소수 둘째 자리 반올림. 0.5 는 항상 +∞ 방향으로 올린다(-1.005 → -1.0).
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// 산술 평균. 빈 입력은 0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Christiansen 균등계수 [%].
///
/// `CUC = 100 * (1 - Σ|x - m| / (n * m))`
pub fn calculate_cuc(values: &[f64]) -> f64 {
    let m = mean(values);
    if m == 0.0 || !m.is_finite() {
        return 0.0;
    }
    let n = values.len() as f64;
    let deviation_sum: f64 = values.iter().map(|v| (v - m).abs()).sum();
    round2(100.0 * (1.0 - deviation_sum / (n * m)))
}

/// 분배 균등계수 [%]. 하위 25% 값의 평균을 전체 평균과 비교한다.
///
/// 하위 사분위 개수는 `ceil(n * 0.25)` (최소 1). 정렬은 복사본에서 수행하므로 호출자의 슬라이스는
/// 그대로 남는다.
pub fn calculate_cud(values: &[f64]) -> f64 {
    let m = mean(values);
    if m == 0.0 || !m.is_finite() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let low_count = ((sorted.len() as f64 * 0.25).ceil() as usize).max(1);
    let low_mean = mean(&sorted[..low_count]);
    round2(100.0 * (low_mean / m))
}

/// 균등계수 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UniformityClass {
    /// 70% 미만
    Poor,
    /// 70% 이상 80% 미만
    Fair,
    /// 80% 이상 90% 미만
    Good,
    /// 90% 이상
    Excellent,
}

/// 계수 값을 등급으로 분류한다.
pub fn classify(percent: f64) -> UniformityClass {
    if percent < 70.0 {
        UniformityClass::Poor
    } else if percent < 80.0 {
        UniformityClass::Fair
    } else if percent < 90.0 {
        UniformityClass::Good
    } else {
        UniformityClass::Excellent
    }
}
