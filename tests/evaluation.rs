//! 평가 검증/집계 통합 테스트.
use irrigation_uniformity::config::EvaluationConfig;
use irrigation_uniformity::conversion::CollectorArea;
use irrigation_uniformity::evaluation::interpretation::{interpret, Finding};
use irrigation_uniformity::evaluation::sector::SECTOR_ZONE;
use irrigation_uniformity::evaluation::{
    compute_evaluation, validate_completeness, EvaluationData, EvaluationDraft, EvaluationError,
    EvaluationResult, EvaluationStage, Field, PivotSweep, Position, SectorGrid, ValueKind,
};
use irrigation_uniformity::repetition::{MeasurementRepetition, RepetitionSet};
use irrigation_uniformity::units::TimeUnit;

fn assert_close(label: &str, actual: f64, expected: f64, tol: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {tol})"
    );
}

fn uniform_pivot(volume_ml: f64) -> PivotSweep {
    let mut sweep = PivotSweep::new();
    sweep.add_radius(100.0, 10.0).expect("radius").fill_all(volume_ml);
    sweep
}

fn single_rep(volume_ml: f64) -> RepetitionSet {
    RepetitionSet::from_repetitions(vec![MeasurementRepetition::new(volume_ml, 10.0)])
}

/// 13/16 칸: 12칸 36 L/h, (3,0) 18 L/h.
fn partial_sector() -> SectorGrid {
    let mut grid = SectorGrid::new();
    for row in 0..3 {
        for column in 0..4 {
            grid.record(row, column, single_rep(100.0)).expect("record");
        }
    }
    grid.record(3, 0, single_rep(50.0)).expect("record");
    grid
}

#[test]
fn uniform_pivot_is_perfect() {
    let cfg = EvaluationConfig::default();
    let data = EvaluationData::Pivot(uniform_pivot(300.0));
    let result = compute_evaluation(&data, &cfg).expect("compute");

    let area = CollectorArea::from_diameter_cm(8.0).expect("area");
    assert_eq!(result.kind(), ValueKind::Depth);
    assert_eq!(result.overall_cuc(), 100.0);
    assert_eq!(result.overall_cud(), 100.0);
    assert_close("mean", result.overall_mean(), area.depth_mm(300.0), 1e-9);
    assert_eq!(result.per_point().len(), 63);
    assert_eq!(result.per_zone().len(), 1);
    assert_eq!(result.per_zone()[0].zone, "R1");
    assert_close("area", result.collector_area_cm2().expect("area"), area.cm2(), 1e-12);
}

#[test]
fn recompute_is_idempotent() {
    let cfg = EvaluationConfig::default();
    let validated = EvaluationDraft::new("Pivô 1", EvaluationData::Pivot(uniform_pivot(280.0)))
        .validate(&cfg)
        .expect("validate");
    let first = validated.compute();
    let second = validated.compute();
    assert_eq!(first, second);
    assert_eq!(first.stage(), EvaluationStage::Computed);
}

#[test]
fn coverage_failure_names_the_zone() {
    let cfg = EvaluationConfig::default();
    let mut sweep = uniform_pivot(300.0);
    let r2 = sweep.add_radius(150.0, 10.0).expect("radius");
    assert_eq!(r2.collectors().len(), 95);
    for i in 0..10 {
        r2.set_volume(i, Some(250.0)).expect("set");
    }
    let data = EvaluationData::Pivot(sweep);

    let report = validate_completeness(&data, &cfg).expect("report");
    assert!(!report.ok);
    assert_eq!(report.failing_zones, vec!["R2".to_string()]);
    assert_eq!(report.zones[1].filled, 10);

    match compute_evaluation(&data, &cfg) {
        Err(EvaluationError::InsufficientCoverage {
            zone,
            required_percent,
            ..
        }) => {
            assert_eq!(zone, "R2");
            assert_eq!(required_percent, 80.0);
        }
        other => panic!("expected coverage failure, got {other:?}"),
    }
}

#[test]
fn coverage_boundary_on_sixty_three_collectors() {
    let cfg = EvaluationConfig::default();
    let mut sweep = PivotSweep::new();
    let zone = sweep.add_radius(100.0, 10.0).expect("radius");
    for i in 0..50 {
        zone.set_volume(i, Some(300.0)).expect("set");
    }
    let data = EvaluationData::Pivot(sweep.clone());
    assert!(!validate_completeness(&data, &cfg).expect("report").ok);

    sweep.zone_mut("R1").expect("zone").set_volume(50, Some(300.0)).expect("set");
    let data = EvaluationData::Pivot(sweep);
    let result = compute_evaluation(&data, &cfg).expect("compute");
    assert_eq!(result.per_point().len(), 51);
}

#[test]
fn zero_volumes_do_not_fill_collectors() {
    let cfg = EvaluationConfig::default();
    let mut sweep = PivotSweep::new();
    sweep.add_radius(100.0, 10.0).expect("radius").fill_all(0.0);
    let report = validate_completeness(&EvaluationData::Pivot(sweep), &cfg).expect("report");
    assert_eq!(report.zones[0].filled, 0);
    assert!(!report.ok);
}

#[test]
fn validation_order_and_draft_recovery() {
    let cfg = EvaluationConfig::default();

    let (draft, err) = EvaluationDraft::new("   ", EvaluationData::Pivot(uniform_pivot(300.0)))
        .validate(&cfg)
        .expect_err("missing name");
    assert_eq!(err, EvaluationError::MissingRequiredField(Field::EvaluationName));
    assert_eq!(draft.stage(), EvaluationStage::Draft);

    let (_, err) = EvaluationDraft::pivot("Pivô vazio")
        .validate(&cfg)
        .expect_err("no zones");
    assert_eq!(err, EvaluationError::MissingRequiredField(Field::Zones));

    let mut draft = EvaluationDraft::pivot("Pivô");
    if let EvaluationData::Pivot(sweep) = &mut draft.data {
        sweep.add_radius(100.0, 10.0).expect("radius");
    }
    let (mut draft, err) = draft.validate(&cfg).expect_err("empty radius");
    assert!(matches!(err, EvaluationError::InsufficientCoverage { .. }));

    // 돌려받은 초안을 고쳐 다시 검증한다.
    if let EvaluationData::Pivot(sweep) = &mut draft.data {
        sweep.zone_mut("R1").expect("zone").fill_all(300.0);
    }
    let validated = draft.validate(&cfg).expect("validate");
    assert_eq!(validated.stage(), EvaluationStage::Validated);
    assert_eq!(validated.name(), "Pivô");
}

#[test]
fn invalid_configuration_is_rejected_before_anything_else() {
    let cfg = EvaluationConfig {
        collector_diameter_cm: 0.0,
        ..EvaluationConfig::default()
    };
    let (_, err) = EvaluationDraft::pivot("")
        .validate(&cfg)
        .expect_err("invalid config");
    assert_eq!(err, EvaluationError::InvalidConfiguration("collector_diameter_cm"));

    let cfg = EvaluationConfig {
        inter_collector_spacing_m: -10.0,
        ..EvaluationConfig::default()
    };
    let data = EvaluationData::Pivot(uniform_pivot(300.0));
    assert!(matches!(
        compute_evaluation(&data, &cfg),
        Err(EvaluationError::InvalidConfiguration(_))
    ));
}

#[test]
fn sector_grid_known_values() {
    let cfg = EvaluationConfig::default();
    let data = EvaluationData::HydraulicSector(partial_sector());
    let result = compute_evaluation(&data, &cfg).expect("compute");

    assert_eq!(result.kind(), ValueKind::FlowRate);
    assert_eq!(result.collector_area_cm2(), None);
    assert_eq!(result.per_zone().len(), 1);
    assert_eq!(result.per_zone()[0].zone, SECTOR_ZONE);
    assert_eq!(result.per_point().len(), 13);
    assert_close("mean", result.overall_mean(), 450.0 / 13.0, 1e-9);
    assert_close("cuc", result.overall_cuc(), 92.62, 1e-9);
    assert_close("cud", result.overall_cud(), 91.0, 1e-9);

    let first = &result.per_point()[0];
    assert_eq!(first.position, Position::Grid { row: 0, column: 0 });
    assert_eq!(first.position.to_string(), "1° × 1°");
    assert_eq!(first.value, 36.0);
}

#[test]
fn sector_with_too_few_points_is_rejected() {
    let cfg = EvaluationConfig::default();
    let mut grid = partial_sector();
    grid.clear(3, 0).expect("clear");
    let (_, err) = EvaluationDraft::new("Setor", EvaluationData::HydraulicSector(grid))
        .validate(&cfg)
        .expect_err("12/16");
    match err {
        EvaluationError::InsufficientCoverage { zone, actual_percent, .. } => {
            assert_eq!(zone, SECTOR_ZONE);
            assert_eq!(actual_percent, 75.0);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn grid_rejects_positions_outside_four_by_four() {
    let mut grid = SectorGrid::new();
    assert_eq!(
        grid.record(4, 0, single_rep(100.0)),
        Err(EvaluationError::InvalidPosition { row: 4, column: 0 })
    );
}

#[test]
fn percent_deviations_average_to_zero() {
    let cfg = EvaluationConfig::default();
    let mut sweep = PivotSweep::new();
    let r1 = sweep.add_radius(100.0, 10.0).expect("radius");
    for i in 0..63 {
        r1.set_volume(i, Some(250.0 + (i % 7) as f64 * 15.0)).expect("set");
    }
    let r2 = sweep.add_radius(50.0, 10.0).expect("radius");
    for i in 0..32 {
        r2.set_volume(i, Some(180.0 + (i % 5) as f64 * 20.0)).expect("set");
    }
    let result = compute_evaluation(&EvaluationData::Pivot(sweep), &cfg).expect("compute");

    let n = result.per_point().len() as f64;
    let overall: f64 = result.per_point().iter().map(|p| p.percent_deviation).sum::<f64>() / n;
    assert_close("overall deviation", overall, 0.0, 1e-9);

    for zone in result.per_zone() {
        let points: Vec<_> = result.points_in(&zone.zone).collect();
        let avg = points.iter().map(|p| p.zone_percent_deviation).sum::<f64>() / points.len() as f64;
        assert_close(&zone.zone, avg, 0.0, 1e-9);
    }
}

#[test]
fn draft_and_result_survive_json() {
    let cfg = EvaluationConfig::default();
    let mut draft = EvaluationDraft::new("Setor 3", EvaluationData::HydraulicSector(partial_sector()));
    draft.add_comment("vento fraco");

    let json = draft.to_json().expect("serialize");
    let back = EvaluationDraft::from_json(&json).expect("parse");
    assert_eq!(back, draft);

    let result = back.validate(&cfg).expect("validate").compute();
    let value = serde_json::to_value(&result).expect("serialize");
    assert_eq!(value["kind"], "FlowRate");
    let parsed: EvaluationResult = serde_json::from_value(value).expect("parse");
    assert_eq!(parsed, result);
}

#[test]
fn draft_json_rejects_out_of_grid_points() {
    let json = r#"{
        "name": "Setor",
        "data": {
            "kind": "hydraulic_sector",
            "data": [{"row": 5, "column": 0, "repetitions": [{"volume_ml": 100, "elapsed": 10}]}]
        }
    }"#;
    assert!(EvaluationDraft::from_json(json).is_err());
}

#[test]
fn interpretation_of_uneven_pivot() {
    let cfg = EvaluationConfig::default();
    let mut sweep = uniform_pivot(300.0);
    let r2 = sweep.add_radius(50.0, 10.0).expect("radius");
    for i in 0..32 {
        let v = if i % 2 == 0 { 100.0 } else { 300.0 };
        r2.set_volume(i, Some(v)).expect("set");
    }
    let result = compute_evaluation(&EvaluationData::Pivot(sweep), &cfg).expect("compute");
    assert_close("r2 cuc", result.zone("R2").expect("R2").cuc, 50.0, 1e-9);

    let findings = interpret(&result);
    assert_eq!(findings.len(), 3);
    assert!(matches!(findings[0], Finding::CucBelowRecommended { .. }));
    assert!(matches!(findings[1], Finding::LowQuartileUnderIrrigated { .. }));
    match &findings[2] {
        Finding::ZoneNeedsAttention { zone, cuc, .. } => {
            assert_eq!(zone, "R2");
            assert_close("cuc", *cuc, 50.0, 1e-9);
        }
        other => panic!("unexpected finding {other:?}"),
    }
}

#[test]
fn interpretation_of_uniform_single_zone() {
    let cfg = EvaluationConfig::default();
    let result = compute_evaluation(&EvaluationData::Pivot(uniform_pivot(300.0)), &cfg).expect("compute");
    assert_eq!(
        interpret(&result),
        vec![Finding::CucWithinRecommended { cuc: 100.0 }]
    );
}

#[test]
fn pivot_file_with_missing_collectors_counts_them_as_unfilled() {
    let json = r#"{
        "name": "Pivô",
        "data": {
            "kind": "pivot",
            "data": {"zones": [{
                "id": "R1",
                "radius_m": 100.0,
                "collectors": [{"label": "C1", "distance_m": 100.0, "volume_ml": 300.0}]
            }]}
        }
    }"#;
    let draft = EvaluationDraft::from_json(json).expect("parse");
    let cfg = EvaluationConfig::default();

    let report = validate_completeness(&draft.data, &cfg).expect("report");
    assert_eq!(report.zones[0].expected, 63);
    assert_eq!(report.zones[0].filled, 1);
    assert_eq!(report.failing_zones, vec!["R1".to_string()]);

    assert!(matches!(
        compute_evaluation(&draft.data, &cfg),
        Err(EvaluationError::InsufficientCoverage { .. })
    ));
    let (_, err) = draft.validate(&cfg).expect_err("1 of 63");
    assert!(matches!(err, EvaluationError::InsufficientCoverage { .. }));
}

#[test]
fn pivot_expected_positions_follow_configured_spacing() {
    // 100 m 반경, 20 m 간격 → 32개 기대. 기록된 26개 채움(81.25%)이면 통과.
    let mut sweep = PivotSweep::new();
    let zone = sweep.add_radius(100.0, 10.0).expect("radius");
    for i in 0..26 {
        zone.set_volume(i, Some(300.0)).expect("set");
    }
    let data = EvaluationData::Pivot(sweep);

    let wide = EvaluationConfig {
        inter_collector_spacing_m: 20.0,
        ..EvaluationConfig::default()
    };
    // 기록된 목록(63개)이 기대 개수보다 많으면 목록 전체가 기대 위치가 된다.
    let report = validate_completeness(&data, &wide).expect("report");
    assert_eq!(report.zones[0].expected, 63);
    assert!(!report.ok);

    let mut sweep = PivotSweep::new();
    let zone = sweep.add_radius(100.0, 20.0).expect("radius");
    assert_eq!(zone.collectors().len(), 32);
    for i in 0..26 {
        zone.set_volume(i, Some(300.0)).expect("set");
    }
    let data = EvaluationData::Pivot(sweep);
    assert!(validate_completeness(&data, &wide).expect("report").ok);
    // 같은 반경을 10 m 간격 설정으로 보면 63개 중 26개뿐이다.
    let report = validate_completeness(&data, &EvaluationConfig::default()).expect("report");
    assert_eq!(report.zones[0].expected, 63);
    assert!(!report.ok);
}

#[test]
fn pivot_file_with_non_positive_radius_is_rejected() {
    let json = r#"{
        "name": "Pivô",
        "data": {"kind": "pivot", "data": {"zones": [{"id": "R1", "radius_m": 0.0, "collectors": []}]}}
    }"#;
    assert!(EvaluationDraft::from_json(json).is_err());
}

#[test]
fn sector_flow_rates_use_configured_minutes() {
    let cells: Vec<String> = (0..16)
        .map(|i| {
            format!(
                r#"{{"row": {}, "column": {}, "repetitions": [{{"volume_ml": 100, "elapsed": 10}}]}}"#,
                i / 4,
                i % 4
            )
        })
        .collect();
    let json = format!(
        r#"{{"name": "Setor", "data": {{"kind": "hydraulic_sector", "data": [{}]}}}}"#,
        cells.join(",")
    );
    let draft = EvaluationDraft::from_json(&json).expect("parse");

    let minutes = EvaluationConfig {
        time_unit: TimeUnit::Minute,
        ..EvaluationConfig::default()
    };
    let result = draft.clone().validate(&minutes).expect("validate").compute();
    assert_close("mean", result.overall_mean(), 0.6, 1e-9);
    assert!(result.per_point().iter().all(|p| p.value == 0.6));

    let seconds = compute_evaluation(&draft.data, &EvaluationConfig::default()).expect("compute");
    assert_close("mean", seconds.overall_mean(), 36.0, 1e-9);
}
