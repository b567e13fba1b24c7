//! 관개 균등도 평가 핵심 계산을 라이브러리로 분리하여 CLI 뿐 아니라 웹/보고서 계층에서도 그대로 쓴다.

pub mod app;
pub mod config;
pub mod conversion;
pub mod coverage;
pub mod evaluation;
pub mod i18n;
pub mod repetition;
pub mod ui_cli;
pub mod uniformity;
pub mod units;
