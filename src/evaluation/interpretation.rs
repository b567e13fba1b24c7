//! 결과 자동 해석.

use serde::Serialize;

use super::EvaluationResult;

/// 권장 CUC [%].
pub const RECOMMENDED_CUC: f64 = 90.0;
/// 하위 사분위 경고 기준 CUD [%].
pub const LOW_CUD: f64 = 70.0;
/// 구역 주의 기준 CUC [%].
pub const ZONE_ATTENTION_CUC: f64 = 85.0;

/// 해석 항목. 문장은 표시 계층에서 번역한다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Finding {
    CucBelowRecommended { cuc: f64 },
    CucWithinRecommended { cuc: f64 },
    LowQuartileUnderIrrigated { cud: f64 },
    ZoneNeedsAttention { zone: String, mean: f64, cuc: f64 },
}

/// 전체 CUC/CUD 와 구역별 CUC 로 해석 항목을 만든다.
///
/// 구역 주의는 구역이 둘 이상일 때 첫 번째 해당 구역만 알린다.
pub fn interpret(result: &EvaluationResult) -> Vec<Finding> {
    let mut findings = Vec::new();
    let cuc = result.overall_cuc();
    if cuc < RECOMMENDED_CUC {
        findings.push(Finding::CucBelowRecommended { cuc });
    } else {
        findings.push(Finding::CucWithinRecommended { cuc });
    }

    let cud = result.overall_cud();
    if cud < LOW_CUD {
        findings.push(Finding::LowQuartileUnderIrrigated { cud });
    }

    if result.per_zone().len() > 1 {
        if let Some(zone) = result.per_zone().iter().find(|z| z.cuc < ZONE_ATTENTION_CUC) {
            findings.push(Finding::ZoneNeedsAttention {
                zone: zone.zone.clone(),
                mean: zone.mean,
                cuc: zone.cuc,
            });
        }
    }
    findings
}
