use std::fs;
use std::path::Path;

use log::info;

use crate::admin::{AdminError, AdminService, CatalogStats};
use crate::catalog::{CatalogError, NewPump, Pump, PumpCatalog};
use crate::config::ConfigError;
use crate::i18n::{keys, Translator};
use crate::input::ScenarioInput;
use crate::scenario::{CalcError, Calculators, ScenarioKind, ScenarioResponse};
use crate::ui_cli::{self, MenuChoice};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    #[error("계산 오류: {0}")]
    Calc(#[from] CalcError),
    #[error("{0}")]
    Catalog(#[from] CatalogError),
    #[error("관리 오류: {0}")]
    Admin(#[from] AdminError),
    #[error("JSON 오류: {0}")]
    Json(#[from] serde_json::Error),
}

/// 대화형 메인 루프를 실행한다.
pub fn run(
    tr: &Translator,
    calculators: &Calculators,
    catalog: &dyn PumpCatalog,
    admin: &AdminService<'_>,
) -> Result<(), AppError> {
    loop {
        match ui_cli::main_menu(tr)? {
            MenuChoice::Scenario(kind) => ui_cli::handle_scenario(tr, calculators, catalog, kind)?,
            MenuChoice::Catalog => ui_cli::handle_catalog(tr, admin)?,
            MenuChoice::Exit => {
                println!("{}", tr.t(keys::APP_EXIT));
                break;
            }
        }
    }
    Ok(())
}

/// JSON 파일과 `key=value` 목록을 합쳐 입력 레코드를 만든다. 같은 키는 목록 쪽이 이긴다.
pub fn build_input(json_path: Option<&Path>, pairs: &[String]) -> Result<ScenarioInput, AppError> {
    let mut input = match json_path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            let value: serde_json::Value = serde_json::from_str(&content)?;
            ScenarioInput::from_json(&value)?
        }
        None => ScenarioInput::new(),
    };
    let overrides = ScenarioInput::from_pairs(pairs.iter().map(String::as_str))?;
    input.merge(overrides);
    Ok(input)
}

/// 시나리오를 계산하고 JSON 응답을 반환한다.
pub fn calculate(
    calculators: &Calculators,
    catalog: &dyn PumpCatalog,
    kind: ScenarioKind,
    input: &ScenarioInput,
) -> Result<ScenarioResponse, AppError> {
    info!("{kind} 계산 요청");
    let outcome = calculators.calculate(kind, input, catalog)?;
    Ok(outcome.response)
}

pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// 관리자 CLI 명령.
#[derive(Debug, Clone)]
pub enum PumpCommand {
    List,
    Stats,
    Add { token: String, pump: NewPump },
    Update { token: String, id: i64, pump: NewPump },
    Delete { token: String, id: i64 },
}

/// 관리자 명령 결과.
#[derive(Debug, Clone, PartialEq)]
pub enum PumpCommandOutput {
    Pumps(Vec<Pump>),
    Stats(CatalogStats),
    Pump(Pump),
}

pub fn run_pump_command(
    admin: &AdminService<'_>,
    command: PumpCommand,
) -> Result<PumpCommandOutput, AppError> {
    let output = match command {
        PumpCommand::List => PumpCommandOutput::Pumps(admin.list()?),
        PumpCommand::Stats => PumpCommandOutput::Stats(admin.stats()?),
        PumpCommand::Add { token, pump } => PumpCommandOutput::Pump(admin.add(&token, pump)?),
        PumpCommand::Update { token, id, pump } => {
            PumpCommandOutput::Pump(admin.update(&token, id, pump)?)
        }
        PumpCommand::Delete { token, id } => PumpCommandOutput::Pump(admin.delete(&token, id)?),
    };
    Ok(output)
}

impl PumpCommandOutput {
    pub fn to_json(&self) -> Result<String, AppError> {
        match self {
            PumpCommandOutput::Pumps(pumps) => to_json(pumps),
            PumpCommandOutput::Stats(stats) => to_json(stats),
            PumpCommandOutput::Pump(pump) => to_json(pump),
        }
    }
}
