use serde::{Deserialize, Serialize};

use super::draft::EvaluationStage;
use super::Position;
use crate::uniformity::{classify, UniformityClass};

/// 계수 계산에 쓰인 값의 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// 격자점 평균 유량 [L/h]
    FlowRate,
    /// 집수기 수심 [mm]
    Depth,
}

impl ValueKind {
    pub fn unit(self) -> &'static str {
        match self {
            ValueKind::FlowRate => "L/h",
            ValueKind::Depth => "mm",
        }
    }
}

/// 구역별 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneResult {
    pub zone: String,
    pub mean: f64,
    pub cuc: f64,
    pub cud: f64,
    /// 계산에 포함된 측정점 수
    pub points: usize,
}

/// 측정점별 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointResult {
    pub zone: String,
    pub position: Position,
    /// 원 측정값 (격자=평균 유량 L/h, 피벗=체적 mL)
    pub measurement: f64,
    /// 계수 계산에 쓰인 값
    pub value: f64,
    /// 전체 평균 대비 편차 [%]
    pub percent_deviation: f64,
    /// 소속 구역 평균 대비 편차 [%]
    pub zone_percent_deviation: f64,
}

/// 한 번의 계산 결과. 생성 후 변경할 수 없다.
///
/// 재계산은 새 값을 만들므로 이전 결과와 나란히 비교할 수 있다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    kind: ValueKind,
    overall_cuc: f64,
    overall_cud: f64,
    overall_mean: f64,
    per_zone: Vec<ZoneResult>,
    per_point: Vec<PointResult>,
    collector_area_cm2: Option<f64>,
}

impl EvaluationResult {
    pub(crate) fn new(
        kind: ValueKind,
        overall_cuc: f64,
        overall_cud: f64,
        overall_mean: f64,
        per_zone: Vec<ZoneResult>,
        per_point: Vec<PointResult>,
        collector_area_cm2: Option<f64>,
    ) -> Self {
        Self {
            kind,
            overall_cuc,
            overall_cud,
            overall_mean,
            per_zone,
            per_point,
            collector_area_cm2,
        }
    }

    pub fn stage(&self) -> EvaluationStage {
        EvaluationStage::Computed
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn overall_cuc(&self) -> f64 {
        self.overall_cuc
    }

    pub fn overall_cud(&self) -> f64 {
        self.overall_cud
    }

    pub fn overall_mean(&self) -> f64 {
        self.overall_mean
    }

    pub fn per_zone(&self) -> &[ZoneResult] {
        &self.per_zone
    }

    pub fn per_point(&self) -> &[PointResult] {
        &self.per_point
    }

    /// 피벗 평가에서 사용한 집수기 면적 [cm²].
    pub fn collector_area_cm2(&self) -> Option<f64> {
        self.collector_area_cm2
    }

    pub fn zone(&self, zone: &str) -> Option<&ZoneResult> {
        self.per_zone.iter().find(|z| z.zone == zone)
    }

    /// 특정 구역에 속한 측정점.
    pub fn points_in<'a>(&'a self, zone: &'a str) -> impl Iterator<Item = &'a PointResult> + 'a {
        self.per_point.iter().filter(move |p| p.zone == zone)
    }

    pub fn cuc_class(&self) -> UniformityClass {
        classify(self.overall_cuc)
    }

    pub fn cud_class(&self) -> UniformityClass {
        classify(self.overall_cud)
    }
}
