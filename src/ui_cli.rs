use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::app::{self, AppError};
use crate::config::{Config, ConfigError};
use crate::conversion::{self, CollectorArea};
use crate::evaluation::interpretation::{interpret, Finding};
use crate::evaluation::sector::SECTOR_ZONE;
use crate::evaluation::{CompletenessReport, EvaluationDraft, EvaluationError, EvaluationResult, Field};
use crate::i18n::{keys, Translator};
use crate::repetition::{self, MeasurementRepetition, RepetitionSet};
use crate::units::TimeUnit;
use crate::uniformity::{calculate_cud, calculate_cuc, classify, mean, UniformityClass};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    FlowRate,
    Depth,
    Coefficients,
    Evaluation,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    println!("{}", tr.t(keys::MAIN_MENU_FLOW));
    println!("{}", tr.t(keys::MAIN_MENU_DEPTH));
    println!("{}", tr.t(keys::MAIN_MENU_COEFFICIENTS));
    println!("{}", tr.t(keys::MAIN_MENU_EVALUATION));
    println!("{}", tr.t(keys::MAIN_MENU_SETTINGS));
    println!("{}", tr.t(keys::MAIN_MENU_EXIT));
    loop {
        let sel = read_line(tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::FlowRate),
            "2" => return Ok(MenuChoice::Depth),
            "3" => return Ok(MenuChoice::Coefficients),
            "4" => return Ok(MenuChoice::Evaluation),
            "5" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 격자점 반복 측정을 입력받아 유량과 평균 유량을 보여준다.
pub fn handle_flow_rate(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::FLOW_HEADING));
    let unit = cfg.evaluation.time_unit;
    let count = loop {
        match repetition::repetition_count(read_f64(tr, tr.t(keys::PROMPT_REPETITIONS))?) {
            Ok(n) => break n,
            Err(err) => println!("{}: {err}", tr.t(keys::ERROR_PREFIX)),
        }
    };
    let mut set = RepetitionSet::new();
    for i in 0..count {
        let volume = read_f64(tr, tr.t(keys::PROMPT_VOLUME))?;
        let time = read_f64(
            tr,
            &tr.tf(keys::PROMPT_TIME, &[("unit", unit.symbol().to_string())]),
        )?;
        if i < set.repetitions().len() {
            *set.get_mut(i)? = MeasurementRepetition::new(volume, time);
        } else {
            set.push(MeasurementRepetition::new(volume, time));
        }
    }
    // 입력하지 않은 기본 반복은 지운다.
    while set.repetitions().len() > count {
        set.remove(set.repetitions().len() - 1)?;
    }
    print_flow(tr, set.repetitions(), unit);
    Ok(())
}

/// 체적과 집수기 직경으로 수심을 계산한다.
pub fn handle_depth(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::DEPTH_HEADING));
    let diameter = read_line(tr.t(keys::PROMPT_DIAMETER))?;
    let diameter = match diameter.trim() {
        "" => cfg.evaluation.collector_diameter_cm,
        s => s
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|_| conversion::ConversionError::InvalidConfiguration("diameter"))?,
    };
    let area = CollectorArea::from_diameter_cm(diameter)?;
    let volume = read_f64(tr, tr.t(keys::PROMPT_VOLUME))?;
    print_depth(tr, area.cm2(), area.depth_mm(volume));
    Ok(())
}

/// 공백으로 구분된 값 목록의 CUC/CUD 를 계산한다.
pub fn handle_coefficients(tr: &Translator) -> Result<(), AppError> {
    println!("{}", tr.t(keys::COEFFICIENTS_HEADING));
    let line = read_line(tr.t(keys::PROMPT_VALUES))?;
    let values: Vec<f64> = line
        .split_whitespace()
        .filter_map(|s| s.replace(',', ".").parse::<f64>().ok())
        .collect();
    print_coefficients(tr, &values);
    Ok(())
}

/// 평가 파일을 읽어 채움 현황과 결과를 출력한다.
pub fn handle_evaluation(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::EVALUATION_HEADING));
    let path = read_line(tr.t(keys::PROMPT_DRAFT_PATH))?;
    let draft = app::load_draft(Path::new(path.trim()))?;
    let report = crate::evaluation::validate_completeness(&draft.data, &cfg.evaluation)?;
    print_completeness(tr, &draft, &report);
    let validated = draft.validate(&cfg.evaluation).map_err(|(_, err)| err)?;
    let result = validated.compute();
    print_result(tr, validated.name(), &result);
    Ok(())
}

/// 설정 메뉴를 처리한다.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    print_settings(tr, cfg);
    println!("{}", tr.t(keys::SETTINGS_OPTIONS));
    let sel = read_line(tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    if sel.trim().is_empty() {
        return Ok(());
    }
    let mut next = cfg.evaluation.clone();
    match sel.trim() {
        "1" => next.collector_diameter_cm = read_f64(tr, tr.t(keys::PROMPT_DIAMETER))?,
        "2" => next.inter_collector_spacing_m = read_f64(tr, "[m]: ")?,
        "3" => next.minimum_coverage_percent = read_f64(tr, "[%]: ")?,
        "4" => {
            let unit = read_line("s/min: ")?;
            match conversion::parse_time_unit(&unit) {
                Ok(u) => next.time_unit = u,
                Err(_) => {
                    println!("{}", tr.t(keys::SETTINGS_INVALID));
                    return Ok(());
                }
            }
        }
        _ => {
            println!("{}", tr.t(keys::SETTINGS_INVALID));
            return Ok(());
        }
    }
    if next.validate().is_err() {
        println!("{}", tr.t(keys::SETTINGS_INVALID));
        return Ok(());
    }
    cfg.evaluation = next;
    println!("{}", tr.t(keys::SETTINGS_SAVED));
    print_settings(tr, cfg);
    Ok(())
}

fn print_settings(tr: &Translator, cfg: &Config) {
    let e = &cfg.evaluation;
    println!(
        "{}",
        tr.tf(
            keys::SETTINGS_CURRENT,
            &[
                ("diameter", format!("{}", e.collector_diameter_cm)),
                ("spacing", format!("{}", e.inter_collector_spacing_m)),
                ("coverage", format!("{}", e.minimum_coverage_percent)),
                ("unit", e.time_unit.symbol().to_string()),
            ],
        )
    );
}

pub fn print_flow(tr: &Translator, repetitions: &[MeasurementRepetition], unit: TimeUnit) {
    for rep in repetitions {
        println!(
            "{}",
            tr.tf(keys::RESULT_FLOW, &[("value", format!("{:.2}", rep.flow_rate(unit)))])
        );
    }
    if repetitions.len() > 1 {
        let mean = repetition::mean_flow_rate(repetitions, unit);
        println!("{}", tr.tf(keys::RESULT_MEAN_FLOW, &[("value", format!("{mean:.2}"))]));
    }
}

pub fn print_depth(tr: &Translator, area_cm2: f64, depth_mm: f64) {
    println!("{}", tr.tf(keys::RESULT_AREA, &[("value", format!("{area_cm2:.2}"))]));
    println!("{}", tr.tf(keys::RESULT_DEPTH, &[("value", format!("{depth_mm:.2}"))]));
}

pub fn print_coefficients(tr: &Translator, values: &[f64]) {
    let cuc = calculate_cuc(values);
    let cud = calculate_cud(values);
    println!(
        "{}",
        tr.tf(keys::RESULT_MEAN, &[("value", format!("{:.2}", mean(values))), ("unit", String::new())])
    );
    println!(
        "{}",
        tr.tf(
            keys::RESULT_CUC,
            &[("value", format!("{cuc:.2}")), ("class", class_label(tr, classify(cuc)).to_string())]
        )
    );
    println!(
        "{}",
        tr.tf(
            keys::RESULT_CUD,
            &[("value", format!("{cud:.2}")), ("class", class_label(tr, classify(cud)).to_string())]
        )
    );
}

pub fn print_completeness(tr: &Translator, draft: &EvaluationDraft, report: &CompletenessReport) {
    println!("{}", draft.name);
    for z in &report.zones {
        println!(
            "{}",
            tr.tf(
                keys::REPORT_COVERAGE,
                &[
                    ("zone", z.zone.clone()),
                    ("filled", z.filled.to_string()),
                    ("expected", z.expected.to_string()),
                    ("percent", format!("{:.1}", z.percent_filled)),
                ],
            )
        );
    }
    match report.first_failure() {
        Some(err) => println!("{}", describe_evaluation_error(tr, &err)),
        None => println!("{}", tr.t(keys::REPORT_COVERAGE_OK)),
    }
}

/// 결과 표, 측정점 표, 자동 해석을 출력한다.
pub fn print_result(tr: &Translator, name: &str, result: &EvaluationResult) {
    let unit = result.kind().unit();
    println!("\n== {name} ==");
    println!("{}", tr.t(keys::REPORT_ZONE_HEADER));
    for z in result.per_zone() {
        println!(
            "{:<10} {:>8.2} {:<4} {:>7.2} {:>8.2} {:>7}",
            z.zone, z.mean, unit, z.cuc, z.cud, z.points
        );
    }
    println!(
        "{:<10} {:>8.2} {:<4} {:>7.2} {:>8.2} {:>7}",
        tr.t(keys::REPORT_OVERALL),
        result.overall_mean(),
        unit,
        result.overall_cuc(),
        result.overall_cud(),
        result.per_point().len()
    );
    println!(
        "{}",
        tr.tf(
            keys::RESULT_CUC,
            &[
                ("value", format!("{:.2}", result.overall_cuc())),
                ("class", class_label(tr, result.cuc_class()).to_string())
            ]
        )
    );
    println!(
        "{}",
        tr.tf(
            keys::RESULT_CUD,
            &[
                ("value", format!("{:.2}", result.overall_cud())),
                ("class", class_label(tr, result.cud_class()).to_string())
            ]
        )
    );

    println!("\n{}", tr.t(keys::REPORT_POINT_HEADER));
    for p in result.per_point() {
        println!(
            "{:<18} {:>8.2} {:>12.2}",
            p.position.to_string(),
            p.value,
            p.percent_deviation
        );
    }

    println!();
    for finding in interpret(result) {
        println!("{}", describe_finding(tr, &finding, unit));
    }
}

fn class_label(tr: &Translator, class: UniformityClass) -> &str {
    match class {
        UniformityClass::Poor => tr.t(keys::CLASS_POOR),
        UniformityClass::Fair => tr.t(keys::CLASS_FAIR),
        UniformityClass::Good => tr.t(keys::CLASS_GOOD),
        UniformityClass::Excellent => tr.t(keys::CLASS_EXCELLENT),
    }
}

fn describe_finding(tr: &Translator, finding: &Finding, unit: &str) -> String {
    match finding {
        Finding::CucBelowRecommended { cuc } => {
            tr.tf(keys::FINDING_CUC_BELOW, &[("cuc", format!("{cuc:.2}"))])
        }
        Finding::CucWithinRecommended { cuc } => {
            tr.tf(keys::FINDING_CUC_WITHIN, &[("cuc", format!("{cuc:.2}"))])
        }
        Finding::LowQuartileUnderIrrigated { cud } => {
            tr.tf(keys::FINDING_LOW_QUARTILE, &[("cud", format!("{cud:.2}"))])
        }
        Finding::ZoneNeedsAttention { zone, mean, cuc } => tr.tf(
            keys::FINDING_ZONE_ATTENTION,
            &[
                ("zone", zone.clone()),
                ("mean", format!("{mean:.2} {unit}")),
                ("cuc", format!("{cuc:.2}")),
            ],
        ),
    }
}

/// 평가 오류를 사용자 언어의 안내 문장으로 바꾼다.
pub fn describe_evaluation_error(tr: &Translator, err: &EvaluationError) -> String {
    match err {
        EvaluationError::InsufficientCoverage {
            zone,
            actual_percent,
            required_percent,
        } => {
            let key = if zone == SECTOR_ZONE {
                keys::ERR_COVERAGE_SECTOR
            } else {
                keys::ERR_COVERAGE_RADIUS
            };
            tr.tf(
                key,
                &[
                    ("zone", zone.clone()),
                    ("required", format!("{required_percent:.0}")),
                    ("actual", format!("{actual_percent:.1}")),
                ],
            )
        }
        EvaluationError::MissingRequiredField(Field::EvaluationName) => tr.t(keys::ERR_MISSING_NAME).to_string(),
        EvaluationError::MissingRequiredField(Field::Zones) => tr.t(keys::ERR_MISSING_ZONES).to_string(),
        EvaluationError::InvalidConfiguration(field) => {
            tr.tf(keys::ERR_INVALID_CONFIG, &[("field", field.to_string())])
        }
        other => other.to_string(),
    }
}

/// 애플리케이션 오류를 표시용 문장으로 바꾼다.
pub fn describe_error(tr: &Translator, err: &AppError) -> String {
    match err {
        AppError::Evaluation(e) => describe_evaluation_error(tr, e),
        AppError::Config(ConfigError::Invalid(field)) => {
            tr.tf(keys::ERR_INVALID_CONFIG, &[("field", field.to_string())])
        }
        other => other.to_string(),
    }
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    read_line_from(&mut io::stdin().lock(), prompt)
}

/// 프롬프트를 출력하고 한 줄을 읽는다. 입력이 끝났으면(EOF) `UnexpectedEof` 오류.
pub fn read_line_from<R: BufRead>(input: &mut R, prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush().map_err(AppError::Io)?;
    let mut buf = String::new();
    if input.read_line(&mut buf).map_err(AppError::Io)? == 0 {
        return Err(AppError::Io(io::Error::from(io::ErrorKind::UnexpectedEof)));
    }
    Ok(buf)
}

fn read_f64(tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    read_f64_from(&mut io::stdin().lock(), tr, prompt)
}

/// 숫자를 읽는다. 소수점 쉼표(29,33)도 받는다.
pub fn read_f64_from<R: BufRead>(input: &mut R, tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line_from(input, prompt)?;
        match s.trim().replace(',', ".").parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}
