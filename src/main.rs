use std::path::PathBuf;

use clap::Parser;
use irrigation_uniformity::{app, config, i18n, ui_cli};

#[derive(Parser)]
#[command(
    name = "irrigation_uniformity",
    version,
    about = "Irrigation uniformity (CUC/CUD) evaluation toolkit"
)]
struct Cli {
    /// 표시 언어(pt, en, auto)
    #[arg(long, default_value = "auto")]
    lang: String,
    /// 설정 파일 경로
    #[arg(long, default_value = config::CONFIG_FILE)]
    config: PathBuf,
    /// 언어팩 디렉터리
    #[arg(long)]
    locales: Option<String>,
    #[command(subcommand)]
    command: Option<app::Command>,
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = try_run(cli) {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn try_run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = config::load_from(&cli.config)?;
    let lang = i18n::resolve_language(&cli.lang, cfg.language.as_deref());
    let tr = i18n::Translator::new_with_pack(&lang, cli.locales.as_deref());
    app::run(cli.command, &mut cfg, &tr).map_err(|e| ui_cli::describe_error(&tr, &e))?;
    Ok(())
}
