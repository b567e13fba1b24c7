//! 수리 구역(hydraulic sector) 4×4 격자 평가.
//!
//! 행은 라테랄 위치, 열은 라테랄 위 점적기 위치이며 둘 다 `1°, 1/3, 2/3, Últ.` 로 표기한다.

use serde::{Deserialize, Serialize};

use super::{EvaluationError, Position, ZoneSamples};
use crate::repetition::RepetitionSet;
use crate::units::TimeUnit;

/// 격자 한 변의 칸 수.
pub const GRID_SIZE: usize = 4;

/// 행/열 표기.
pub const GRID_LABELS: [&str; GRID_SIZE] = ["1°", "1/3", "2/3", "Últ."];

/// 격자 평가 전체를 하나의 구역으로 다룰 때의 이름.
pub const SECTOR_ZONE: &str = "setor";

/// 행/열 인덱스의 표기. 범위를 벗어나면 None.
pub fn label(index: usize) -> Option<&'static str> {
    GRID_LABELS.get(index).copied()
}

/// 측정이 기록된 격자점.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub row: usize,
    pub column: usize,
    pub repetitions: RepetitionSet,
}

impl GridPoint {
    /// 유효 반복의 평균 유량 [L/h].
    pub fn mean_flow_rate(&self, unit: TimeUnit) -> f64 {
        self.repetitions.mean_flow_rate(unit)
    }
}

/// 4×4 격자. 기록된 점만 보관하며 (행, 열) 순으로 정렬한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GridPoint>", into = "Vec<GridPoint>")]
pub struct SectorGrid {
    points: Vec<GridPoint>,
}

fn check_position(row: usize, column: usize) -> Result<(), EvaluationError> {
    if row >= GRID_SIZE || column >= GRID_SIZE {
        return Err(EvaluationError::InvalidPosition { row, column });
    }
    Ok(())
}

impl SectorGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// 격자점의 반복 측정을 기록한다. 이미 있으면 교체한다.
    pub fn record(
        &mut self,
        row: usize,
        column: usize,
        repetitions: RepetitionSet,
    ) -> Result<(), EvaluationError> {
        check_position(row, column)?;
        match self
            .points
            .binary_search_by_key(&(row, column), |p| (p.row, p.column))
        {
            Ok(idx) => self.points[idx].repetitions = repetitions,
            Err(idx) => self.points.insert(
                idx,
                GridPoint {
                    row,
                    column,
                    repetitions,
                },
            ),
        }
        Ok(())
    }

    /// 기록을 지운다. 지운 점이 있었으면 돌려준다.
    pub fn clear(&mut self, row: usize, column: usize) -> Result<Option<GridPoint>, EvaluationError> {
        check_position(row, column)?;
        Ok(self
            .points
            .iter()
            .position(|p| p.row == row && p.column == column)
            .map(|idx| self.points.remove(idx)))
    }

    pub fn point(&self, row: usize, column: usize) -> Option<&GridPoint> {
        self.points.iter().find(|p| p.row == row && p.column == column)
    }

    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    /// 16칸 전체를 행 우선으로 나열한다. 값은 설정 시간 단위로 환산한 평균 유량이다.
    pub(crate) fn zone_samples(&self, unit: TimeUnit) -> ZoneSamples {
        let mut samples = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
        for row in 0..GRID_SIZE {
            for column in 0..GRID_SIZE {
                let value = self.point(row, column).map(|p| p.mean_flow_rate(unit));
                samples.push((Position::Grid { row, column }, value));
            }
        }
        ZoneSamples {
            zone: SECTOR_ZONE.to_string(),
            samples,
        }
    }
}

impl TryFrom<Vec<GridPoint>> for SectorGrid {
    type Error = EvaluationError;

    fn try_from(value: Vec<GridPoint>) -> Result<Self, Self::Error> {
        let mut grid = SectorGrid::new();
        for p in value {
            grid.record(p.row, p.column, p.repetitions)?;
        }
        Ok(grid)
    }
}

impl From<SectorGrid> for Vec<GridPoint> {
    fn from(value: SectorGrid) -> Self {
        value.points
    }
}
