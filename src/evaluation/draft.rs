//! 평가 작성 단계: 작성 중(Draft) → 검증됨(Validated) → 계산됨(Computed).
//!
//! 검증은 소비형으로 진행하고 계산은 검증된 값에서만 호출할 수 있어, 채움 부족 상태로 계수가
//! 만들어지는 경로가 없다.

use serde::{Deserialize, Serialize};

use super::{
    aggregate, collect_samples, completeness_of, EvaluationData, EvaluationError,
    EvaluationResult, Field, PivotSweep, SectorGrid, ZoneSamples,
};
use crate::config::EvaluationConfig;
use crate::conversion::CollectorArea;
use crate::coverage::ZoneCoverage;

/// 평가 진행 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationStage {
    Draft,
    Validated,
    Computed,
}

/// 작성 중인 평가. 화면/요청 사이에서 그대로 주고받는 값 객체이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationDraft {
    pub name: String,
    pub data: EvaluationData,
    #[serde(default)]
    pub comments: Vec<String>,
}

impl EvaluationDraft {
    pub fn new(name: impl Into<String>, data: EvaluationData) -> Self {
        Self {
            name: name.into(),
            data,
            comments: Vec::new(),
        }
    }

    /// 빈 4×4 격자 평가.
    pub fn hydraulic_sector(name: impl Into<String>) -> Self {
        Self::new(name, EvaluationData::HydraulicSector(SectorGrid::new()))
    }

    /// 반경이 없는 피벗 평가.
    pub fn pivot(name: impl Into<String>) -> Self {
        Self::new(name, EvaluationData::Pivot(PivotSweep::new()))
    }

    pub fn stage(&self) -> EvaluationStage {
        EvaluationStage::Draft
    }

    pub fn add_comment(&mut self, text: impl Into<String>) {
        self.comments.push(text.into());
    }

    /// JSON 문자열에서 읽는다.
    pub fn from_json(src: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(src)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 계산 가능 여부를 점검한다. 실패하면 작성 중 상태가 그대로 돌아온다.
    ///
    /// 확인 순서: 설정값, 평가 이름, 구역 존재, 구역별 채움 비율.
    pub fn validate(
        self,
        config: &EvaluationConfig,
    ) -> Result<ValidatedEvaluation, (Self, EvaluationError)> {
        match self.check(config) {
            Ok((samples, coverage, area)) => Ok(ValidatedEvaluation {
                draft: self,
                samples,
                coverage,
                area,
            }),
            Err(err) => Err((self, err)),
        }
    }

    fn check(
        &self,
        config: &EvaluationConfig,
    ) -> Result<(Vec<ZoneSamples>, Vec<ZoneCoverage>, CollectorArea), EvaluationError> {
        config.validate()?;
        let area = CollectorArea::from_diameter_cm(config.collector_diameter_cm)?;
        if self.name.trim().is_empty() {
            return Err(EvaluationError::MissingRequiredField(Field::EvaluationName));
        }
        let samples = collect_samples(&self.data, config)?;
        let report = completeness_of(&samples, config);
        if let Some(err) = report.first_failure() {
            return Err(err);
        }
        Ok((samples, report.zones, area))
    }
}

/// 검증을 통과한 평가. 계산은 실패하지 않는다.
///
/// 검증 시점의 설정(시간 단위, 집수기 간격)으로 만든 기대 위치를 그대로 계산에 쓴다.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEvaluation {
    draft: EvaluationDraft,
    samples: Vec<ZoneSamples>,
    coverage: Vec<ZoneCoverage>,
    area: CollectorArea,
}

impl ValidatedEvaluation {
    pub fn stage(&self) -> EvaluationStage {
        EvaluationStage::Validated
    }

    pub fn name(&self) -> &str {
        &self.draft.name
    }

    pub fn draft(&self) -> &EvaluationDraft {
        &self.draft
    }

    pub fn coverage(&self) -> &[ZoneCoverage] {
        &self.coverage
    }

    /// 구역별/전체 계수를 계산해 새 결과를 만든다.
    pub fn compute(&self) -> EvaluationResult {
        aggregate(self.draft.data.value_kind(), &self.samples, self.area)
    }

    /// 다시 편집하기 위해 작성 중 상태로 되돌린다.
    pub fn into_draft(self) -> EvaluationDraft {
        self.draft
    }
}
