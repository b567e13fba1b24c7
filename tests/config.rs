//! 설정 파일 로드/검증 테스트.
use std::fs;
use std::path::PathBuf;

use irrigation_uniformity::config::{self, Config, ConfigError, EvaluationConfig};
use irrigation_uniformity::units::TimeUnit;

fn scratch_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("irrigation_uniformity_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    dir.join(name)
}

#[test]
fn defaults_match_field_practice() {
    let cfg = EvaluationConfig::default();
    assert_eq!(cfg.collector_diameter_cm, 8.0);
    assert_eq!(cfg.minimum_coverage_percent, 80.0);
    assert_eq!(cfg.inter_collector_spacing_m, 10.0);
    assert_eq!(cfg.time_unit, TimeUnit::Second);
    assert!(cfg.validate().is_ok());
}

#[test]
fn partial_toml_fills_defaults() {
    let cfg: Config = toml::from_str(
        r#"
language = "en"

[evaluation]
collector_diameter_cm = 10.0
time_unit = "Minute"
"#,
    )
    .expect("parse");
    assert_eq!(cfg.language.as_deref(), Some("en"));
    assert_eq!(cfg.evaluation.collector_diameter_cm, 10.0);
    assert_eq!(cfg.evaluation.time_unit, TimeUnit::Minute);
    assert_eq!(cfg.evaluation.inter_collector_spacing_m, 10.0);
}

#[test]
fn out_of_range_values_are_rejected() {
    let bad = [
        EvaluationConfig { collector_diameter_cm: -8.0, ..Default::default() },
        EvaluationConfig { inter_collector_spacing_m: 0.0, ..Default::default() },
        EvaluationConfig { minimum_coverage_percent: 0.0, ..Default::default() },
        EvaluationConfig { minimum_coverage_percent: 120.0, ..Default::default() },
        EvaluationConfig { collector_diameter_cm: f64::NAN, ..Default::default() },
    ];
    for cfg in bad {
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))), "{cfg:?}");
    }
}

#[test]
fn missing_file_is_created_with_defaults() {
    let path = scratch_path("created.toml");
    let _ = fs::remove_file(&path);

    let cfg = config::load_from(&path).expect("load");
    assert_eq!(cfg.evaluation, EvaluationConfig::default());
    assert!(path.exists());

    let again = config::load_from(&path).expect("reload");
    assert_eq!(again.evaluation, cfg.evaluation);
    let _ = fs::remove_file(&path);
}

#[test]
fn invalid_file_is_not_silently_replaced() {
    let path = scratch_path("invalid.toml");
    fs::write(&path, "[evaluation]\ncollector_diameter_cm = 0.0\n").expect("write");
    assert!(matches!(
        config::load_from(&path),
        Err(ConfigError::Invalid("collector_diameter_cm"))
    ));
    let _ = fs::remove_file(&path);
}
