//! 격자점별 반복 측정과 대표 유량 산정.

use serde::{Deserialize, Serialize};

use crate::conversion::flow_rate_from_volume_time;
use crate::uniformity::round2;
use crate::units::TimeUnit;

/// 새 격자점에 미리 깔아두는 빈 반복 횟수.
pub const DEFAULT_REPETITIONS: usize = 3;
/// 격자점 하나에 기록할 수 있는 최대 반복 횟수.
pub const MAX_REPETITIONS: usize = 20;

/// 한 번의 시간 측정 반복.
///
/// 유량은 저장하지 않는다. 시간 단위는 평가 설정 하나로 고정되므로 유량이 필요할 때
/// 그 단위로 체적/시간에서 계산한다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRepetition {
    /// 채수 체적 [mL]
    pub volume_ml: f64,
    /// 경과 시간 (단위는 평가 설정의 `time_unit`)
    pub elapsed: f64,
}

impl MeasurementRepetition {
    pub fn new(volume_ml: f64, elapsed: f64) -> Self {
        Self { volume_ml, elapsed }
    }

    /// 아직 값이 없는 반복.
    pub fn empty() -> Self {
        Self::default()
    }

    /// 환산 유량 [L/h].
    pub fn flow_rate(&self, unit: TimeUnit) -> f64 {
        flow_rate_from_volume_time(self.volume_ml, self.elapsed, unit)
    }
}

/// 유량이 0 보다 큰 반복만 평균한다. 해당 반복이 없으면 0.
///
/// 모든 반복이 0 인 점은 미측정 점과 구분되지 않는다.
pub fn mean_flow_rate(repetitions: &[MeasurementRepetition], unit: TimeUnit) -> f64 {
    let valid: Vec<f64> = repetitions
        .iter()
        .map(|r| r.flow_rate(unit))
        .filter(|q| *q > 0.0)
        .collect();
    if valid.is_empty() {
        return 0.0;
    }
    round2(valid.iter().sum::<f64>() / valid.len() as f64)
}

/// 대화형 입력에서 받은 반복 횟수를 검사한다. 1 이상 [`MAX_REPETITIONS`] 이하의 정수만 받는다.
pub fn repetition_count(value: f64) -> Result<usize, RepetitionError> {
    if value.fract() != 0.0 || !(1.0..=MAX_REPETITIONS as f64).contains(&value) {
        return Err(RepetitionError::InvalidCount(value));
    }
    Ok(value as usize)
}

/// 반복 목록 편집 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum RepetitionError {
    /// 마지막 반복은 지울 수 없음
    LastRepetition,
    /// 범위를 벗어난 인덱스
    OutOfRange(usize),
    /// 1..=MAX_REPETITIONS 밖이거나 정수가 아닌 반복 횟수
    InvalidCount(f64),
}

impl std::fmt::Display for RepetitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepetitionError::LastRepetition => write!(f, "반복은 최소 1개가 필요합니다."),
            RepetitionError::OutOfRange(i) => write!(f, "반복 인덱스 범위 초과: {i}"),
            RepetitionError::InvalidCount(n) => {
                write!(f, "반복 횟수는 1~{MAX_REPETITIONS} 사이의 정수여야 합니다: {n}")
            }
        }
    }
}

impl std::error::Error for RepetitionError {}

/// 한 격자점의 반복 측정 묶음.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "Vec<MeasurementRepetition>",
    into = "Vec<MeasurementRepetition>"
)]
pub struct RepetitionSet {
    repetitions: Vec<MeasurementRepetition>,
}

impl From<Vec<MeasurementRepetition>> for RepetitionSet {
    fn from(value: Vec<MeasurementRepetition>) -> Self {
        RepetitionSet::from_repetitions(value)
    }
}

impl From<RepetitionSet> for Vec<MeasurementRepetition> {
    fn from(value: RepetitionSet) -> Self {
        value.repetitions
    }
}

impl Default for RepetitionSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RepetitionSet {
    /// 빈 반복 3개로 시작한다.
    pub fn new() -> Self {
        Self {
            repetitions: vec![MeasurementRepetition::empty(); DEFAULT_REPETITIONS],
        }
    }

    /// 이미 측정된 반복으로 만든다. 빈 목록이면 빈 반복 하나를 둔다.
    pub fn from_repetitions(repetitions: Vec<MeasurementRepetition>) -> Self {
        if repetitions.is_empty() {
            return Self {
                repetitions: vec![MeasurementRepetition::empty()],
            };
        }
        Self { repetitions }
    }

    pub fn repetitions(&self) -> &[MeasurementRepetition] {
        &self.repetitions
    }

    pub fn push(&mut self, repetition: MeasurementRepetition) {
        self.repetitions.push(repetition);
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut MeasurementRepetition, RepetitionError> {
        self.repetitions
            .get_mut(index)
            .ok_or(RepetitionError::OutOfRange(index))
    }

    pub fn remove(&mut self, index: usize) -> Result<MeasurementRepetition, RepetitionError> {
        if index >= self.repetitions.len() {
            return Err(RepetitionError::OutOfRange(index));
        }
        if self.repetitions.len() == 1 {
            return Err(RepetitionError::LastRepetition);
        }
        Ok(self.repetitions.remove(index))
    }

    pub fn mean_flow_rate(&self, unit: TimeUnit) -> f64 {
        mean_flow_rate(&self.repetitions, unit)
    }
}
