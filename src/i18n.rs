use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_FLOW: &str = "main_menu.flow";
    pub const MAIN_MENU_DEPTH: &str = "main_menu.depth";
    pub const MAIN_MENU_COEFFICIENTS: &str = "main_menu.coefficients";
    pub const MAIN_MENU_EVALUATION: &str = "main_menu.evaluation";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const FLOW_HEADING: &str = "flow.heading";
    pub const PROMPT_REPETITIONS: &str = "prompt.repetitions";
    pub const PROMPT_VOLUME: &str = "prompt.volume";
    pub const PROMPT_TIME: &str = "prompt.time";
    pub const RESULT_FLOW: &str = "result.flow";
    pub const RESULT_MEAN_FLOW: &str = "result.mean_flow";

    pub const DEPTH_HEADING: &str = "depth.heading";
    pub const PROMPT_DIAMETER: &str = "prompt.diameter";
    pub const RESULT_AREA: &str = "result.area";
    pub const RESULT_DEPTH: &str = "result.depth";

    pub const COEFFICIENTS_HEADING: &str = "coefficients.heading";
    pub const PROMPT_VALUES: &str = "prompt.values";
    pub const RESULT_CUC: &str = "result.cuc";
    pub const RESULT_CUD: &str = "result.cud";
    pub const RESULT_MEAN: &str = "result.mean";

    pub const EVALUATION_HEADING: &str = "evaluation.heading";
    pub const PROMPT_DRAFT_PATH: &str = "prompt.draft_path";
    pub const REPORT_ZONE_HEADER: &str = "report.zone_header";
    pub const REPORT_POINT_HEADER: &str = "report.point_header";
    pub const REPORT_OVERALL: &str = "report.overall";
    pub const REPORT_COVERAGE: &str = "report.coverage";
    pub const REPORT_COVERAGE_OK: &str = "report.coverage_ok";

    pub const CLASS_POOR: &str = "class.poor";
    pub const CLASS_FAIR: &str = "class.fair";
    pub const CLASS_GOOD: &str = "class.good";
    pub const CLASS_EXCELLENT: &str = "class.excellent";

    pub const FINDING_CUC_BELOW: &str = "finding.cuc_below";
    pub const FINDING_CUC_WITHIN: &str = "finding.cuc_within";
    pub const FINDING_LOW_QUARTILE: &str = "finding.low_quartile";
    pub const FINDING_ZONE_ATTENTION: &str = "finding.zone_attention";

    pub const ERR_COVERAGE_RADIUS: &str = "error.coverage_radius";
    pub const ERR_COVERAGE_SECTOR: &str = "error.coverage_sector";
    pub const ERR_MISSING_NAME: &str = "error.missing_name";
    pub const ERR_MISSING_ZONES: &str = "error.missing_zones";
    pub const ERR_INVALID_CONFIG: &str = "error.invalid_config";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT: &str = "settings.current";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Pt,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else {
            Language::Pt
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(pt/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 pt로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// 번역을 가져온다. 영어 번역이 없으면 포르투갈어 문자열로 폴백한다.
    pub fn t<'a>(&'a self, key: &str) -> &'a str {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v;
        }
        match self.lang {
            Language::En => en(key).unwrap_or_else(|| pt(key)),
            Language::Pt => pt(key),
        }
    }

    /// `{name}` 자리표시자를 채운 문장을 만든다.
    pub fn tf(&self, key: &str, args: &[(&str, String)]) -> String {
        let mut out = self.t(key).to_string();
        for (name, value) in args {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "pt".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("pt") => Some("pt".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    std::env::var("LANG")
        .ok()
        .and_then(|l| normalize_locale_string(&l))
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "pt" => Some("pt".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 로 구성된 플랫/중첩 맵.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let path = Path::new(dir).join(format!("{lang}.toml"));
    let content = fs::read_to_string(path).ok()?;
    parse_toml_to_map(&content)
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn pt(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "Erro",
        APP_EXIT => "Encerrando o programa.",
        MAIN_MENU_TITLE => "\n=== Avaliação de Uniformidade de Irrigação ===",
        MAIN_MENU_FLOW => "1) Vazão por repetições",
        MAIN_MENU_DEPTH => "2) Lâmina do coletor",
        MAIN_MENU_COEFFICIENTS => "3) CUC / CUD de uma lista de valores",
        MAIN_MENU_EVALUATION => "4) Calcular avaliação (arquivo JSON)",
        MAIN_MENU_SETTINGS => "5) Configurações",
        MAIN_MENU_EXIT => "0) Sair",
        PROMPT_MENU_SELECT => "Selecione: ",
        INVALID_SELECTION_RETRY => "Opção inválida. Tente novamente.",
        ERROR_INVALID_NUMBER => "Digite um número.",
        FLOW_HEADING => "\n-- Vazão --",
        PROMPT_REPETITIONS => "Número de repetições: ",
        PROMPT_VOLUME => "Volume [mL]: ",
        PROMPT_TIME => "Tempo [{unit}]: ",
        RESULT_FLOW => "Vazão: {value} L/h",
        RESULT_MEAN_FLOW => "Média vazão: {value} L/h",
        DEPTH_HEADING => "\n-- Lâmina --",
        PROMPT_DIAMETER => "Diâmetro do coletor [cm]: ",
        RESULT_AREA => "Área do coletor: {value} cm²",
        RESULT_DEPTH => "Lâmina: {value} mm",
        COEFFICIENTS_HEADING => "\n-- CUC / CUD --",
        PROMPT_VALUES => "Valores separados por espaço: ",
        RESULT_CUC => "CUC: {value}% ({class})",
        RESULT_CUD => "CUD: {value}% ({class})",
        RESULT_MEAN => "Média: {value} {unit}",
        EVALUATION_HEADING => "\n-- Avaliação --",
        PROMPT_DRAFT_PATH => "Arquivo da avaliação (JSON): ",
        REPORT_ZONE_HEADER => "Zona       Média        CUC%     CUD%   Pontos",
        REPORT_POINT_HEADER => "Posição            Valor     Dif. média%",
        REPORT_OVERALL => "Geral",
        REPORT_COVERAGE => "Zona {zone}: {filled}/{expected} preenchidos ({percent}%)",
        REPORT_COVERAGE_OK => "Preenchimento suficiente em todas as zonas.",
        CLASS_POOR => "RUIM",
        CLASS_FAIR => "REGULAR",
        CLASS_GOOD => "BOM",
        CLASS_EXCELLENT => "EXCELENTE",
        FINDING_CUC_BELOW => "A uniformidade (CUC) geral de {cuc}% está abaixo do recomendável (90%), indicando necessidade de ajuste nos aspersores.",
        FINDING_CUC_WITHIN => "A uniformidade (CUC) geral de {cuc}% está dentro do padrão recomendável.",
        FINDING_LOW_QUARTILE => "O CUD geral de {cud}% sugere que 25% dos pontos coletados apresentaram lâmina muito baixa.",
        FINDING_ZONE_ATTENTION => "Especial atenção ao {zone}, onde a média foi {mean} e o CUC = {cuc}%.",
        ERR_COVERAGE_RADIUS => "Por favor, preencha ao menos {required}% dos coletores no raio {zone} (atual: {actual}%)",
        ERR_COVERAGE_SECTOR => "Por favor, preencha ao menos {required}% dos pontos do setor (atual: {actual}%)",
        ERR_MISSING_NAME => "Por favor, preencha o nome da avaliação",
        ERR_MISSING_ZONES => "Por favor, adicione pelo menos um raio de avaliação",
        ERR_INVALID_CONFIG => "Configuração inválida: {field}",
        SETTINGS_HEADING => "\n-- Configurações --",
        SETTINGS_CURRENT => "Diâmetro do coletor: {diameter} cm, espaçamento: {spacing} m, preenchimento mínimo: {coverage}%, tempo: {unit}",
        SETTINGS_OPTIONS => "1) Diâmetro do coletor  2) Espaçamento  3) Preenchimento mínimo  4) Unidade de tempo (s/min)",
        SETTINGS_PROMPT_CHANGE => "Número a alterar (Enter para cancelar): ",
        SETTINGS_INVALID => "Valor inválido; configuração mantida.",
        SETTINGS_SAVED => "Configuração atualizada.",
        _ => "[tradução ausente]",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting application.",
        MAIN_MENU_TITLE => "\n=== Irrigation Uniformity Evaluation ===",
        MAIN_MENU_FLOW => "1) Flow rate from repetitions",
        MAIN_MENU_DEPTH => "2) Collector depth",
        MAIN_MENU_COEFFICIENTS => "3) CUC / CUD of a value list",
        MAIN_MENU_EVALUATION => "4) Compute evaluation (JSON file)",
        MAIN_MENU_SETTINGS => "5) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        FLOW_HEADING => "\n-- Flow rate --",
        PROMPT_REPETITIONS => "Number of repetitions: ",
        PROMPT_VOLUME => "Volume [mL]: ",
        PROMPT_TIME => "Time [{unit}]: ",
        RESULT_FLOW => "Flow rate: {value} L/h",
        RESULT_MEAN_FLOW => "Mean flow rate: {value} L/h",
        DEPTH_HEADING => "\n-- Depth --",
        PROMPT_DIAMETER => "Collector diameter [cm]: ",
        RESULT_AREA => "Collector area: {value} cm²",
        RESULT_DEPTH => "Depth: {value} mm",
        COEFFICIENTS_HEADING => "\n-- CUC / CUD --",
        PROMPT_VALUES => "Values separated by spaces: ",
        RESULT_CUC => "CUC: {value}% ({class})",
        RESULT_CUD => "CUD: {value}% ({class})",
        RESULT_MEAN => "Mean: {value} {unit}",
        EVALUATION_HEADING => "\n-- Evaluation --",
        PROMPT_DRAFT_PATH => "Evaluation file (JSON): ",
        REPORT_ZONE_HEADER => "Zone       Mean         CUC%     CUD%   Points",
        REPORT_POINT_HEADER => "Position           Value     Dev. mean%",
        REPORT_OVERALL => "Overall",
        REPORT_COVERAGE => "Zone {zone}: {filled}/{expected} filled ({percent}%)",
        REPORT_COVERAGE_OK => "Coverage sufficient in every zone.",
        CLASS_POOR => "POOR",
        CLASS_FAIR => "FAIR",
        CLASS_GOOD => "GOOD",
        CLASS_EXCELLENT => "EXCELLENT",
        FINDING_CUC_BELOW => "Overall uniformity (CUC) of {cuc}% is below the recommended 90%; emitters need adjustment.",
        FINDING_CUC_WITHIN => "Overall uniformity (CUC) of {cuc}% is within the recommended range.",
        FINDING_LOW_QUARTILE => "Overall CUD of {cud}% suggests the lowest 25% of points received very little water.",
        FINDING_ZONE_ATTENTION => "Pay special attention to {zone}: mean {mean}, CUC = {cuc}%.",
        ERR_COVERAGE_RADIUS => "Please fill at least {required}% of the collectors on radius {zone} (current: {actual}%)",
        ERR_COVERAGE_SECTOR => "Please fill at least {required}% of the sector points (current: {actual}%)",
        ERR_MISSING_NAME => "Please enter the evaluation name",
        ERR_MISSING_ZONES => "Please add at least one evaluation radius",
        ERR_INVALID_CONFIG => "Invalid configuration: {field}",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT => "Collector diameter: {diameter} cm, spacing: {spacing} m, minimum coverage: {coverage}%, time: {unit}",
        SETTINGS_OPTIONS => "1) Collector diameter  2) Spacing  3) Minimum coverage  4) Time unit (s/min)",
        SETTINGS_PROMPT_CHANGE => "Enter number to change (enter to cancel): ",
        SETTINGS_INVALID => "Invalid value; setting unchanged.",
        SETTINGS_SAVED => "Setting updated.",
        _ => return None,
    })
}
