use std::io::{self, Write};

use crate::admin::{AdminService, CatalogStats};
use crate::app::AppError;
use crate::catalog::{Pump, PumpCatalog, UNIVERSAL_POWER_LABEL};
use crate::i18n::{keys, Translator};
use crate::input::{FieldKind, ScenarioInput};
use crate::scenario::{
    format_flow, format_head, format_pressure, Calculators, PumpView, ScenarioKind,
    ScenarioOutcome,
};
use crate::units::lph_to_m3h;

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Scenario(ScenarioKind),
    Catalog,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    for key in [
        keys::MAIN_MENU_TITLE,
        keys::MAIN_MENU_IRRIGATION,
        keys::MAIN_MENU_GREENHOUSE,
        keys::MAIN_MENU_RESIDENTIAL,
        keys::MAIN_MENU_HEATING,
        keys::MAIN_MENU_SOLAR,
        keys::MAIN_MENU_CATALOG,
        keys::MAIN_MENU_EXIT,
    ] {
        println!("{}", tr.t(key));
    }
    loop {
        let sel = read_line(tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::Scenario(ScenarioKind::Irrigation)),
            "2" => return Ok(MenuChoice::Scenario(ScenarioKind::Greenhouse)),
            "3" => return Ok(MenuChoice::Scenario(ScenarioKind::Residential)),
            "4" => return Ok(MenuChoice::Scenario(ScenarioKind::Heating)),
            "5" => return Ok(MenuChoice::Scenario(ScenarioKind::Solar)),
            "6" => return Ok(MenuChoice::Catalog),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 시나리오 입력을 받아 계산하고 결과를 출력한다.
/// 입력 오류는 출력만 하고 메뉴로 돌아간다.
pub fn handle_scenario(
    tr: &Translator,
    calculators: &Calculators,
    catalog: &dyn PumpCatalog,
    kind: ScenarioKind,
) -> Result<(), AppError> {
    let calculator = calculators.get(kind);
    println!("{} {kind}", tr.t(keys::SCENARIO_HEADING));
    println!("{}", tr.t(keys::SCENARIO_INPUT_HINT));

    let mut input = ScenarioInput::new();
    for field in calculator.fields() {
        let hint = match field.default {
            Some(d) => format!("{}: {d}", tr.t(keys::PROMPT_DEFAULT)),
            None => tr.t(keys::PROMPT_REQUIRED).to_string(),
        };
        let unit = match field.kind {
            FieldKind::Number(_) if !field.unit.is_empty() => format!(" [{}]", field.unit),
            _ => String::new(),
        };
        let value = read_line(&format!("{}{unit} ({hint}): ", field.key))?;
        if !value.trim().is_empty() {
            input.set(field.key, value.trim());
        }
    }

    match calculator.calculate(&input, catalog) {
        Ok(outcome) => print_outcome(tr, &outcome),
        Err(err) if err.is_client_error() => {
            println!("{}: {err}", tr.t(keys::ERROR_PREFIX));
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/// 카탈로그 목록과 통계를 출력한다.
pub fn handle_catalog(tr: &Translator, admin: &AdminService<'_>) -> Result<(), AppError> {
    println!("{}", tr.t(keys::CATALOG_HEADING));
    let pumps = admin.list()?;
    if pumps.is_empty() {
        println!("{}", tr.t(keys::CATALOG_EMPTY));
        return Ok(());
    }
    for pump in &pumps {
        println!("{}", pump_line(pump));
    }
    print_stats(tr, &admin.stats()?);
    Ok(())
}

pub fn print_outcome(tr: &Translator, outcome: &ScenarioOutcome) {
    let calc = &outcome.calculation;
    let response = &outcome.response;
    println!("{}", tr.t(keys::RESULT_HEADING));
    println!("{} {}", tr.t(keys::RESULT_FLOW), format_flow(calc.flow_rate_m3h));
    println!("{} {}", tr.t(keys::RESULT_STATIC_HEAD), format_head(calc.static_head_m));
    println!("{} {}", tr.t(keys::RESULT_FRICTION), format_head(calc.friction_loss_m));
    println!("{} {}", tr.t(keys::RESULT_TOTAL_HEAD), format_head(calc.total_head_m));
    println!("{} {}", tr.t(keys::RESULT_PRESSURE), format_pressure(calc.pressure_bar));
    println!(
        "{} {}, {}",
        tr.t(keys::RESULT_DESIGN),
        format_flow(calc.design_flow_m3h),
        format_head(calc.design_head_m)
    );
    if !response.specifications.standards_applied.is_empty() {
        println!(
            "{} {}",
            tr.t(keys::RESULT_STANDARDS),
            response.specifications.standards_applied.join(", ")
        );
    }
    match (&response.pump, &response.warning) {
        (Some(pump), _) => println!("{} {}", tr.t(keys::RESULT_PUMP), view_line(pump)),
        (None, Some(warning)) => {
            println!("{} ({})", tr.t(keys::RESULT_NO_PUMP), warning.message);
            println!("{} {}", tr.t(keys::RESULT_SUGGESTION), warning.suggestion);
            if let Some(closest) = &warning.closest_match {
                println!("{} {}", tr.t(keys::RESULT_CLOSEST), view_line(closest));
            }
        }
        (None, None) => println!("{}", tr.t(keys::RESULT_NO_PUMP)),
    }
}

pub fn print_stats(tr: &Translator, stats: &CatalogStats) {
    let by_power: Vec<String> = stats
        .by_power
        .iter()
        .map(|(power, count)| format!("{power}={count}"))
        .collect();
    println!("{} {} ({})", tr.t(keys::CATALOG_TOTAL), stats.total, by_power.join(", "));
}

pub fn pump_line(pump: &Pump) -> String {
    let flow = pump
        .flow_rate
        .map(|lph| format_flow(lph_to_m3h(lph)))
        .unwrap_or_else(|| "-".into());
    let head = pump.head.map(format_head).unwrap_or_else(|| "-".into());
    let power = pump.power.map(|p| p.as_str()).unwrap_or(UNIVERSAL_POWER_LABEL);
    format!(
        "#{:<4} {} / {} | {flow} | {head} | {power} | {}",
        pump.id, pump.name, pump.brand, pump.price
    )
}

fn view_line(view: &PumpView) -> String {
    format!(
        "{} / {} | {} | {} | {} | {}",
        view.name,
        view.brand,
        view.flow_rate,
        view.head,
        view.power.as_deref().unwrap_or(UNIVERSAL_POWER_LABEL),
        view.price
    )
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf)
}
