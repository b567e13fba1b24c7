//! 채수량 → 유량/수심 환산.
//!
//! 체적은 항상 mL, 유량은 L/h, 수심(lamina)은 mm 로 반환한다.

use std::f64::consts::PI;

use crate::uniformity::round2;
use crate::units::{LengthUnit, TimeUnit};

/// 환산 시 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// 설정값(집수기 직경, 간격 등)이 0 이하이거나 유한하지 않음
    InvalidConfiguration(&'static str),
    /// 알 수 없는 단위 문자열
    UnknownUnit(String),
}

impl std::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionError::InvalidConfiguration(msg) => write!(f, "잘못된 설정: {msg}"),
            ConversionError::UnknownUnit(u) => write!(f, "알 수 없는 단위: {u}"),
        }
    }
}

impl std::error::Error for ConversionError {}

/// 채수 체적과 경과 시간으로 유량[L/h]을 계산한다.
///
/// 시간이 0 이하(또는 NaN)이면 오류 대신 0 을 돌려준다. 결과는 소수 둘째 자리로 반올림한다.
pub fn flow_rate_from_volume_time(volume_ml: f64, elapsed: f64, unit: TimeUnit) -> f64 {
    if elapsed.is_nan() || elapsed <= 0.0 || !volume_ml.is_finite() {
        return 0.0;
    }
    round2((volume_ml / elapsed) * unit.flow_factor())
}

/// 직경[cm]으로 집수기 개구 면적[cm²]을 구한다.
pub fn collector_area_cm2(diameter_cm: f64) -> Result<f64, ConversionError> {
    if !diameter_cm.is_finite() || diameter_cm <= 0.0 {
        return Err(ConversionError::InvalidConfiguration(
            "집수기 직경은 0보다 커야 합니다.",
        ));
    }
    Ok(PI * (diameter_cm / 2.0).powi(2))
}

/// 임의 단위의 직경으로 집수기 면적[cm²]을 구한다.
pub fn collector_area_from(diameter: f64, unit: LengthUnit) -> Result<f64, ConversionError> {
    let cm = crate::units::convert_length(diameter, unit, LengthUnit::Centimeter);
    collector_area_cm2(cm)
}

/// 검증된 집수기 개구 면적. 항상 0 보다 크다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectorArea {
    cm2: f64,
}

impl CollectorArea {
    pub fn from_diameter_cm(diameter_cm: f64) -> Result<Self, ConversionError> {
        Ok(Self {
            cm2: collector_area_cm2(diameter_cm)?,
        })
    }

    pub fn cm2(&self) -> f64 {
        self.cm2
    }

    /// 체적[mL]을 수심[mm]으로 바꾼다. 면적이 양수임이 보장되므로 실패하지 않는다.
    pub fn depth_mm(&self, volume_ml: f64) -> f64 {
        (volume_ml / self.cm2) * 10.0
    }
}

/// 채수 체적[mL]과 집수기 면적[cm²]으로 수심[mm]을 구한다. 반올림하지 않는다.
pub fn depth_from_volume_area(volume_ml: f64, area_cm2: f64) -> Result<f64, ConversionError> {
    if !area_cm2.is_finite() || area_cm2 <= 0.0 {
        return Err(ConversionError::InvalidConfiguration(
            "집수기 면적은 0보다 커야 합니다.",
        ));
    }
    Ok((volume_ml / area_cm2) * 10.0)
}

/// 피벗 반경 원주를 간격으로 나눠 필요한 집수기 개수를 구한다.
pub fn collector_count(radius_m: f64, spacing_m: f64) -> Result<usize, ConversionError> {
    if !spacing_m.is_finite() || spacing_m <= 0.0 {
        return Err(ConversionError::InvalidConfiguration(
            "집수기 간격은 0보다 커야 합니다.",
        ));
    }
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(ConversionError::InvalidConfiguration(
            "반경은 0보다 커야 합니다.",
        ));
    }
    let circumference = 2.0 * PI * radius_m;
    Ok((circumference / spacing_m).ceil() as usize)
}

/// 문자열 단위명을 시간 단위로 변환한다.
pub fn parse_time_unit(s: &str) -> Result<TimeUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "s" | "sec" | "seg" | "second" | "segundo" => Ok(TimeUnit::Second),
        "min" | "minute" | "minuto" => Ok(TimeUnit::Minute),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}

/// 문자열 단위명을 길이 단위로 변환한다.
pub fn parse_length_unit(s: &str) -> Result<LengthUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "m" | "meter" | "metre" | "metro" => Ok(LengthUnit::Meter),
        "cm" => Ok(LengthUnit::Centimeter),
        "mm" => Ok(LengthUnit::Millimeter),
        "in" | "inch" | "\"" => Ok(LengthUnit::Inch),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}
