use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::coverage::DEFAULT_MINIMUM_COVERAGE_PERCENT;
use crate::units::TimeUnit;

/// 기본 설정 파일 이름.
pub const CONFIG_FILE: &str = "config.toml";

/// 평가 계산에 필요한 현장 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// 집수기 직경 [cm]
    pub collector_diameter_cm: f64,
    /// 구역별 최소 채움 비율 [%]
    pub minimum_coverage_percent: f64,
    /// 피벗 반경 위 집수기 간격 [m]
    pub inter_collector_spacing_m: f64,
    /// 반복 측정 시간 단위. 유량 환산 계수를 결정한다.
    pub time_unit: TimeUnit,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            collector_diameter_cm: 8.0,
            minimum_coverage_percent: DEFAULT_MINIMUM_COVERAGE_PERCENT,
            inter_collector_spacing_m: 10.0,
            time_unit: TimeUnit::Second,
        }
    }
}

impl EvaluationConfig {
    /// 계산 전에 설정값을 검증한다. 잘못된 값을 조용히 기본값으로 바꾸지 않는다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.collector_diameter_cm.is_finite() || self.collector_diameter_cm <= 0.0 {
            return Err(ConfigError::Invalid("collector_diameter_cm"));
        }
        if !self.inter_collector_spacing_m.is_finite() || self.inter_collector_spacing_m <= 0.0 {
            return Err(ConfigError::Invalid("inter_collector_spacing_m"));
        }
        if !(self.minimum_coverage_percent > 0.0 && self.minimum_coverage_percent <= 100.0) {
            return Err(ConfigError::Invalid("minimum_coverage_percent"));
        }
        Ok(())
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 표시 언어 코드(pt, en). 없으면 시스템 로케일을 따른다.
    pub language: Option<String>,
    pub evaluation: EvaluationConfig,
    #[serde(skip)]
    path: Option<PathBuf>,
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum ConfigError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// TOML 역직렬화 오류
    Serde(toml::de::Error),
    /// TOML 직렬화 오류
    Serialize(toml::ser::Error),
    /// 0 이하 등 허용되지 않는 설정값 (필드 이름)
    Invalid(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "파일 입출력 오류: {e}"),
            ConfigError::Serde(e) => write!(f, "설정 파싱 오류: {e}"),
            ConfigError::Serialize(e) => write!(f, "설정 직렬화 오류: {e}"),
            ConfigError::Invalid(field) => write!(f, "잘못된 설정값: {field}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Serde(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        ConfigError::Serialize(value)
    }
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_from(Path::new(CONFIG_FILE))
}

/// 지정한 경로의 설정을 읽는다. 파일이 없으면 기본 설정을 만들어 저장한다.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let mut cfg = if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        cfg
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        log::info!("기본 설정 파일 생성: {}", path.display());
        cfg
    };
    cfg.evaluation.validate()?;
    cfg.path = Some(path.to_path_buf());
    Ok(cfg)
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 설정을 읽어온 파일(기본 config.toml)에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        save_config(self, &path)
    }
}
