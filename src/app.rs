use std::fs;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::Config;
use crate::conversion::{self, CollectorArea};
use crate::evaluation::{self, EvaluationDraft, EvaluationError};
use crate::i18n::{self, Translator};
use crate::repetition::{MeasurementRepetition, RepetitionError};
use crate::ui_cli::{self, MenuChoice};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum AppError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// 설정 저장/로드 오류
    Config(crate::config::ConfigError),
    /// 환산 오류
    Conversion(conversion::ConversionError),
    /// 평가 검증 오류
    Evaluation(EvaluationError),
    /// 반복 편집 오류
    Repetition(RepetitionError),
    /// 평가 파일(JSON) 파싱 오류
    Json(serde_json::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io(e) => write!(f, "입출력 오류: {e}"),
            AppError::Config(e) => write!(f, "설정 오류: {e}"),
            AppError::Conversion(e) => write!(f, "환산 오류: {e}"),
            AppError::Evaluation(e) => write!(f, "평가 오류: {e}"),
            AppError::Repetition(e) => write!(f, "반복 측정 오류: {e}"),
            AppError::Json(e) => write!(f, "평가 파일 오류: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(value: crate::config::ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<conversion::ConversionError> for AppError {
    fn from(value: conversion::ConversionError) -> Self {
        AppError::Conversion(value)
    }
}

impl From<EvaluationError> for AppError {
    fn from(value: EvaluationError) -> Self {
        AppError::Evaluation(value)
    }
}

impl From<RepetitionError> for AppError {
    fn from(value: RepetitionError) -> Self {
        AppError::Repetition(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        AppError::Json(value)
    }
}

/// 비대화형 하위 명령.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// 체적[mL]과 시간으로 유량[L/h]을 계산한다
    Flow {
        volume: f64,
        time: f64,
        /// 시간 단위(s, min). 생략 시 설정값
        #[arg(long)]
        unit: Option<String>,
    },
    /// 체적[mL]을 집수기 수심[mm]으로 환산한다
    Depth {
        volume: f64,
        /// 집수기 직경. 생략 시 설정값(cm)
        #[arg(long)]
        diameter: Option<f64>,
        /// 직경 단위(cm, mm, in)
        #[arg(long, default_value = "cm")]
        diameter_unit: String,
    },
    /// 값 목록의 CUC/CUD 를 계산한다
    Coefficients {
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },
    /// 평가 파일의 구역별 채움 비율을 점검한다
    Validate { draft: PathBuf },
    /// 평가 파일을 검증하고 결과를 계산한다
    Compute {
        draft: PathBuf,
        /// 결과를 JSON 으로 출력
        #[arg(long)]
        json: bool,
    },
}

/// 하위 명령이 있으면 실행하고, 없으면 대화형 메뉴를 띄운다.
pub fn run(command: Option<Command>, config: &mut Config, tr: &Translator) -> Result<(), AppError> {
    match command {
        Some(cmd) => run_command(cmd, config, tr),
        None => run_menu(config, tr),
    }
}

fn run_command(command: Command, config: &Config, tr: &Translator) -> Result<(), AppError> {
    match command {
        Command::Flow { volume, time, unit } => {
            let unit = match unit {
                Some(u) => conversion::parse_time_unit(&u)?,
                None => config.evaluation.time_unit,
            };
            let rep = MeasurementRepetition::new(volume, time);
            ui_cli::print_flow(tr, &[rep], unit);
        }
        Command::Depth {
            volume,
            diameter,
            diameter_unit,
        } => {
            let area = match diameter {
                Some(d) => {
                    let unit = conversion::parse_length_unit(&diameter_unit)?;
                    conversion::collector_area_from(d, unit)?
                }
                None => CollectorArea::from_diameter_cm(config.evaluation.collector_diameter_cm)?.cm2(),
            };
            let depth = conversion::depth_from_volume_area(volume, area)?;
            ui_cli::print_depth(tr, area, depth);
        }
        Command::Coefficients { values } => ui_cli::print_coefficients(tr, &values),
        Command::Validate { draft } => {
            let draft = load_draft(&draft)?;
            let report = evaluation::validate_completeness(&draft.data, &config.evaluation)?;
            ui_cli::print_completeness(tr, &draft, &report);
        }
        Command::Compute { draft, json } => {
            let draft = load_draft(&draft)?;
            let validated = draft
                .validate(&config.evaluation)
                .map_err(|(_, err)| err)?;
            let result = validated.compute();
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                ui_cli::print_result(tr, validated.name(), &result);
            }
        }
    }
    Ok(())
}

/// JSON 평가 파일을 읽는다.
pub fn load_draft(path: &Path) -> Result<EvaluationDraft, AppError> {
    let content = fs::read_to_string(path)?;
    let draft = EvaluationDraft::from_json(&content)?;
    log::debug!("평가 파일 로드: {} ({})", path.display(), draft.name);
    Ok(draft)
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
fn run_menu(config: &mut Config, tr: &Translator) -> Result<(), AppError> {
    loop {
        let outcome = match ui_cli::main_menu(tr)? {
            MenuChoice::FlowRate => ui_cli::handle_flow_rate(tr, config),
            MenuChoice::Depth => ui_cli::handle_depth(tr, config),
            MenuChoice::Coefficients => ui_cli::handle_coefficients(tr),
            MenuChoice::Evaluation => ui_cli::handle_evaluation(tr, config),
            MenuChoice::Settings => {
                ui_cli::handle_settings(tr, config)?;
                config.save().map_err(AppError::from)
            }
            MenuChoice::Exit => {
                config.save()?;
                println!("{}", tr.t(i18n::keys::APP_EXIT));
                break;
            }
        };
        // 메뉴 하나의 실패로 루프를 끝내지 않는다. 입출력 오류만 전파한다.
        match outcome {
            Err(AppError::Io(e)) => return Err(AppError::Io(e)),
            Err(err) => println!("{}: {}", tr.t(i18n::keys::ERROR_PREFIX), ui_cli::describe_error(tr, &err)),
            Ok(()) => {}
        }
    }
    Ok(())
}
