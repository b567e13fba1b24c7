//! 센터 피벗 반경별 집수기 배치.

use serde::{Deserialize, Serialize};

use super::{EvaluationError, Position, ZoneSamples};
use crate::conversion::{collector_count, ConversionError};

/// 새 반경을 추가할 때 기본으로 제안하는 반경 [m].
pub const DEFAULT_FIRST_RADIUS_M: f64 = 100.0;
/// 다음 반경 제안 간격 [m].
pub const RADIUS_STEP_M: f64 = 50.0;

/// 반경 위 집수기 하나.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collector {
    /// 표기 (C1, C2, ...)
    pub label: String,
    /// 피벗 중심으로부터의 거리 [m]
    pub distance_m: f64,
    /// 채수 체적 [mL]. 미측정이면 None.
    pub volume_ml: Option<f64>,
    #[serde(default)]
    pub observations: String,
}

/// 반경 하나에 배치된 집수기 묶음.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RadiusZoneRecord")]
pub struct RadiusZone {
    pub id: String,
    pub radius_m: f64,
    collectors: Vec<Collector>,
}

#[derive(Deserialize)]
struct RadiusZoneRecord {
    id: String,
    radius_m: f64,
    #[serde(default)]
    collectors: Vec<Collector>,
}

impl TryFrom<RadiusZoneRecord> for RadiusZone {
    type Error = ConversionError;

    fn try_from(r: RadiusZoneRecord) -> Result<Self, Self::Error> {
        if !r.radius_m.is_finite() || r.radius_m <= 0.0 {
            return Err(ConversionError::InvalidConfiguration(
                "반경은 0보다 커야 합니다.",
            ));
        }
        Ok(Self {
            id: r.id,
            radius_m: r.radius_m,
            collectors: r.collectors,
        })
    }
}

impl RadiusZone {
    /// 원주를 간격으로 나눈 개수만큼 빈 집수기를 만든다.
    pub fn with_radius(
        id: impl Into<String>,
        radius_m: f64,
        spacing_m: f64,
    ) -> Result<Self, ConversionError> {
        let count = collector_count(radius_m, spacing_m)?;
        let collectors = (1..=count)
            .map(|i| Collector {
                label: format!("C{i}"),
                distance_m: radius_m,
                volume_ml: None,
                observations: String::new(),
            })
            .collect();
        Ok(Self {
            id: id.into(),
            radius_m,
            collectors,
        })
    }

    pub fn collectors(&self) -> &[Collector] {
        &self.collectors
    }

    fn collector_mut(&mut self, index: usize) -> Result<&mut Collector, EvaluationError> {
        let zone = self.id.clone();
        self.collectors
            .get_mut(index)
            .ok_or(EvaluationError::CollectorOutOfRange { zone, index })
    }

    /// 0 기반 인덱스의 집수기 체적을 기록한다.
    pub fn set_volume(&mut self, index: usize, volume_ml: Option<f64>) -> Result<(), EvaluationError> {
        self.collector_mut(index)?.volume_ml = volume_ml;
        Ok(())
    }

    pub fn set_observations(
        &mut self,
        index: usize,
        observations: impl Into<String>,
    ) -> Result<(), EvaluationError> {
        self.collector_mut(index)?.observations = observations.into();
        Ok(())
    }

    /// 모든 집수기에 같은 체적을 기록한다.
    pub fn fill_all(&mut self, volume_ml: f64) {
        for c in &mut self.collectors {
            c.volume_ml = Some(volume_ml);
        }
    }

    /// 간격 기준으로 이 반경에 있어야 하는 집수기 수.
    pub fn expected_collectors(&self, spacing_m: f64) -> Result<usize, ConversionError> {
        collector_count(self.radius_m, spacing_m)
    }

    /// 기대 위치 전체. 기록된 집수기가 기대 개수보다 적으면 나머지는 미측정으로 채운다.
    pub(crate) fn zone_samples(&self, spacing_m: f64) -> Result<ZoneSamples, ConversionError> {
        let expected = self.expected_collectors(spacing_m)?;
        let mut samples: Vec<(Position, Option<f64>)> = self
            .collectors
            .iter()
            .map(|c| {
                (
                    Position::Collector {
                        zone: self.id.clone(),
                        collector: c.label.clone(),
                        distance_m: c.distance_m,
                    },
                    c.volume_ml,
                )
            })
            .collect();
        for i in samples.len()..expected {
            samples.push((
                Position::Collector {
                    zone: self.id.clone(),
                    collector: format!("C{}", i + 1),
                    distance_m: self.radius_m,
                },
                None,
            ));
        }
        Ok(ZoneSamples {
            zone: self.id.clone(),
            samples,
        })
    }
}

/// 피벗 평가의 반경 목록.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotSweep {
    zones: Vec<RadiusZone>,
}

impl PivotSweep {
    pub fn new() -> Self {
        Self::default()
    }

    /// 반경을 추가한다. 이름은 R1, R2, ... 순으로 붙이며 삭제된 번호는 재사용하지 않는다.
    pub fn add_radius(&mut self, radius_m: f64, spacing_m: f64) -> Result<&mut RadiusZone, ConversionError> {
        let next = self
            .zones
            .iter()
            .filter_map(|z| z.id.strip_prefix('R').and_then(|n| n.parse::<usize>().ok()))
            .max()
            .unwrap_or(0)
            + 1;
        let zone = RadiusZone::with_radius(format!("R{next}"), radius_m, spacing_m)?;
        self.zones.push(zone);
        let last = self.zones.len() - 1;
        Ok(&mut self.zones[last])
    }

    /// 이미 만들어진 반경을 그대로 추가한다.
    pub fn push_zone(&mut self, zone: RadiusZone) {
        self.zones.push(zone);
    }

    pub fn remove_zone(&mut self, id: &str) -> Result<RadiusZone, EvaluationError> {
        let idx = self
            .zones
            .iter()
            .position(|z| z.id == id)
            .ok_or_else(|| EvaluationError::UnknownZone(id.to_string()))?;
        Ok(self.zones.remove(idx))
    }

    pub fn zone(&self, id: &str) -> Option<&RadiusZone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn zone_mut(&mut self, id: &str) -> Result<&mut RadiusZone, EvaluationError> {
        self.zones
            .iter_mut()
            .find(|z| z.id == id)
            .ok_or_else(|| EvaluationError::UnknownZone(id.to_string()))
    }

    pub fn zones(&self) -> &[RadiusZone] {
        &self.zones
    }

    /// 다음에 추가할 반경 제안값: 마지막 반경 + 50 m (없으면 100 m).
    pub fn suggested_next_radius(&self) -> f64 {
        self.zones
            .last()
            .map(|z| z.radius_m + RADIUS_STEP_M)
            .unwrap_or(DEFAULT_FIRST_RADIUS_M)
    }
}
