//! 평가 단위(수리 구역 격자, 센터 피벗 반경) 집계.
//!
//! 외부에서는 [`validate_completeness`] 로 채움 현황을 확인하고 [`compute_evaluation`] 으로
//! 결과를 얻는다. 단계별 흐름이 필요하면 [`draft::EvaluationDraft`] 를 사용한다.

pub mod draft;
pub mod interpretation;
pub mod pivot;
pub mod result;
pub mod sector;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, EvaluationConfig};
use crate::conversion::{CollectorArea, ConversionError};
use crate::coverage::{is_filled, ZoneCoverage};
use crate::uniformity::{calculate_cud, calculate_cuc, mean};

pub use draft::{EvaluationDraft, EvaluationStage, ValidatedEvaluation};
pub use pivot::{Collector, PivotSweep, RadiusZone};
pub use result::{EvaluationResult, PointResult, ValueKind, ZoneResult};
pub use sector::{GridPoint, SectorGrid};

/// 측정 위치.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Position {
    /// 수리 구역 4×4 격자 칸
    Grid { row: usize, column: usize },
    /// 피벗 반경 위 집수기
    Collector {
        zone: String,
        collector: String,
        distance_m: f64,
    },
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Grid { row, column } => write!(
                f,
                "{} × {}",
                sector::label(*row).unwrap_or("?"),
                sector::label(*column).unwrap_or("?")
            ),
            Position::Collector {
                zone, collector, ..
            } => write!(f, "{zone}-{collector}"),
        }
    }
}

/// 계산 전에 반드시 채워져야 하는 입력 항목.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    /// 평가 이름
    EvaluationName,
    /// 피벗 반경(구역) 최소 1개
    Zones,
}

/// 평가 검증/편집 중 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// 구역의 채움 비율이 기준 미만
    InsufficientCoverage {
        zone: String,
        actual_percent: f64,
        required_percent: f64,
    },
    /// 집수기 직경, 간격 등 설정값 오류
    InvalidConfiguration(&'static str),
    /// 필수 입력 누락
    MissingRequiredField(Field),
    /// 4×4 격자 밖의 칸
    InvalidPosition { row: usize, column: usize },
    /// 존재하지 않는 반경
    UnknownZone(String),
    /// 반경에 없는 집수기 번호
    CollectorOutOfRange { zone: String, index: usize },
}

impl std::fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationError::InsufficientCoverage {
                zone,
                actual_percent,
                required_percent,
            } => write!(
                f,
                "구역 {zone} 채움 비율 부족: {actual_percent:.1}% < {required_percent:.1}%"
            ),
            EvaluationError::InvalidConfiguration(msg) => write!(f, "잘못된 설정: {msg}"),
            EvaluationError::MissingRequiredField(field) => write!(f, "필수 입력 누락: {field:?}"),
            EvaluationError::InvalidPosition { row, column } => {
                write!(f, "격자 범위를 벗어난 위치: ({row}, {column})")
            }
            EvaluationError::UnknownZone(zone) => write!(f, "알 수 없는 구역: {zone}"),
            EvaluationError::CollectorOutOfRange { zone, index } => {
                write!(f, "구역 {zone} 에 집수기 {index} 가 없습니다.")
            }
        }
    }
}

impl std::error::Error for EvaluationError {}

impl From<ConfigError> for EvaluationError {
    fn from(value: ConfigError) -> Self {
        match value {
            ConfigError::Invalid(field) => EvaluationError::InvalidConfiguration(field),
            _ => EvaluationError::InvalidConfiguration("config"),
        }
    }
}

impl From<ConversionError> for EvaluationError {
    fn from(value: ConversionError) -> Self {
        match value {
            ConversionError::InvalidConfiguration(msg) => EvaluationError::InvalidConfiguration(msg),
            ConversionError::UnknownUnit(_) => EvaluationError::InvalidConfiguration("unit"),
        }
    }
}

/// 평가 입력. 격자 평가와 피벗 평가를 구분한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum EvaluationData {
    HydraulicSector(SectorGrid),
    Pivot(PivotSweep),
}

impl EvaluationData {
    pub fn value_kind(&self) -> ValueKind {
        match self {
            EvaluationData::HydraulicSector(_) => ValueKind::FlowRate,
            EvaluationData::Pivot(_) => ValueKind::Depth,
        }
    }

    /// 구역별 기대 위치와 측정값(격자=평균 유량, 피벗=체적). 미측정은 `None`.
    ///
    /// 격자 유량은 설정 시간 단위로 환산하고, 피벗 기대 위치 수는 설정 간격으로 정한다.
    pub fn zone_samples(&self, config: &EvaluationConfig) -> Result<Vec<ZoneSamples>, EvaluationError> {
        match self {
            EvaluationData::HydraulicSector(grid) => Ok(vec![grid.zone_samples(config.time_unit)]),
            EvaluationData::Pivot(sweep) => sweep
                .zones()
                .iter()
                .map(|z| {
                    z.zone_samples(config.inter_collector_spacing_m)
                        .map_err(EvaluationError::from)
                })
                .collect(),
        }
    }
}

/// 한 구역의 기대 위치 목록.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSamples {
    pub zone: String,
    pub samples: Vec<(Position, Option<f64>)>,
}

impl ZoneSamples {
    pub fn measurements(&self) -> Vec<Option<f64>> {
        self.samples.iter().map(|(_, v)| *v).collect()
    }
}

/// 채움 검증 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletenessReport {
    pub ok: bool,
    /// 기준 미달 구역 이름
    pub failing_zones: Vec<String>,
    /// 모든 구역의 채움 현황
    pub zones: Vec<ZoneCoverage>,
}

impl CompletenessReport {
    /// 첫 번째 미달 구역을 오류로 바꾼다.
    pub fn first_failure(&self) -> Option<EvaluationError> {
        self.zones
            .iter()
            .find(|z| !z.meets())
            .map(|z| EvaluationError::InsufficientCoverage {
                zone: z.zone.clone(),
                actual_percent: z.percent_filled,
                required_percent: z.required_percent,
            })
    }
}

/// 설정을 검증하고 구역별 기대 위치를 모은다. 반경이 하나도 없는 피벗은 오류.
pub(crate) fn collect_samples(
    data: &EvaluationData,
    config: &EvaluationConfig,
) -> Result<Vec<ZoneSamples>, EvaluationError> {
    config.validate()?;
    let samples = data.zone_samples(config)?;
    if samples.is_empty() {
        return Err(EvaluationError::MissingRequiredField(Field::Zones));
    }
    Ok(samples)
}

pub(crate) fn completeness_of(samples: &[ZoneSamples], config: &EvaluationConfig) -> CompletenessReport {
    let zones: Vec<ZoneCoverage> = samples
        .iter()
        .map(|z| ZoneCoverage::from_values(&z.zone, &z.measurements(), config.minimum_coverage_percent))
        .collect();
    let failing_zones: Vec<String> = zones
        .iter()
        .filter(|z| !z.meets())
        .map(|z| z.zone.clone())
        .collect();
    for z in zones.iter().filter(|z| !z.meets()) {
        log::warn!(
            "구역 {} 채움 {:.1}% (기준 {:.1}%)",
            z.zone,
            z.percent_filled,
            z.required_percent
        );
    }
    CompletenessReport {
        ok: failing_zones.is_empty(),
        failing_zones,
        zones,
    }
}

/// 설정을 검증하고 구역별 채움 비율을 점검한다.
///
/// 설정 오류와 반경이 하나도 없는 피벗만 `Err` 로 돌려준다. 채움 부족은 보고서에 담긴다.
pub fn validate_completeness(
    data: &EvaluationData,
    config: &EvaluationConfig,
) -> Result<CompletenessReport, EvaluationError> {
    let samples = collect_samples(data, config)?;
    Ok(completeness_of(&samples, config))
}

/// 채움 검증을 통과한 경우에만 결과를 계산한다.
pub fn compute_evaluation(
    data: &EvaluationData,
    config: &EvaluationConfig,
) -> Result<EvaluationResult, EvaluationError> {
    let samples = collect_samples(data, config)?;
    if let Some(err) = completeness_of(&samples, config).first_failure() {
        return Err(err);
    }
    let area = CollectorArea::from_diameter_cm(config.collector_diameter_cm)?;
    Ok(aggregate(data.value_kind(), &samples, area))
}

fn percent_deviation(value: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    100.0 * (value - reference) / reference
}

/// 검증이 끝난 기대 위치로 구역/전체 계수를 계산한다. 실패하지 않는다.
pub(crate) fn aggregate(kind: ValueKind, samples: &[ZoneSamples], area: CollectorArea) -> EvaluationResult {
    let to_value = |measurement: f64| match kind {
        ValueKind::FlowRate => measurement,
        ValueKind::Depth => area.depth_mm(measurement),
    };

    let mut per_zone = Vec::new();
    // (구역 인덱스, 위치, 측정값, 환산값)
    let mut rows: Vec<(usize, Position, f64, f64)> = Vec::new();
    for (zone_idx, zone) in samples.iter().enumerate() {
        let mut values = Vec::new();
        for (position, measurement) in &zone.samples {
            if let Some(m) = measurement.filter(|m| is_filled(Some(*m))) {
                let value = to_value(m);
                values.push(value);
                rows.push((zone_idx, position.clone(), m, value));
            }
        }
        let zone_result = ZoneResult {
            zone: zone.zone.clone(),
            mean: mean(&values),
            cuc: calculate_cuc(&values),
            cud: calculate_cud(&values),
            points: values.len(),
        };
        log::debug!(
            "구역 {}: n={} 평균={:.3} CUC={:.2} CUD={:.2}",
            zone_result.zone,
            zone_result.points,
            zone_result.mean,
            zone_result.cuc,
            zone_result.cud
        );
        per_zone.push(zone_result);
    }

    let all_values: Vec<f64> = rows.iter().map(|r| r.3).collect();
    let overall_mean = mean(&all_values);
    let per_point = rows
        .into_iter()
        .map(|(zone_idx, position, measurement, value)| PointResult {
            zone: per_zone[zone_idx].zone.clone(),
            position,
            measurement,
            value,
            percent_deviation: percent_deviation(value, overall_mean),
            zone_percent_deviation: percent_deviation(value, per_zone[zone_idx].mean),
        })
        .collect();

    let collector_area_cm2 = match kind {
        ValueKind::Depth => Some(area.cm2()),
        ValueKind::FlowRate => None,
    };
    let result = EvaluationResult::new(
        kind,
        calculate_cuc(&all_values),
        calculate_cud(&all_values),
        overall_mean,
        per_zone,
        per_point,
        collector_area_cm2,
    );
    log::info!(
        "평가 계산 완료: 구역 {}개, 측정점 {}개, CUC={:.2}%, CUD={:.2}%",
        result.per_zone().len(),
        result.per_point().len(),
        result.overall_cuc(),
        result.overall_cud()
    );
    result
}
