//! 시나리오 계산기 모음.
//!
//! 각 시나리오는 수리 공식 라이브러리의 서로 다른 설정이다. 기준표, 안전율, 압력 환산 상수,
//! 카탈로그 검색 범위와 선택 정책을 모두 자체 설정 구조체에 가진다.
//! 안전율은 물리 계산이 끝난 뒤에만 적용한다.

pub mod greenhouse;
pub mod heating;
pub mod irrigation;
pub mod residential;
pub mod solar;

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogError, PowerSource, PumpCatalog};
use crate::input::{FieldSpec, ScenarioInput};
use crate::matcher::{Candidate, MatchOutcome, MatchRequest, PumpMatcher};
use crate::units::{lph_to_m3h, m3h_to_lph};

pub use greenhouse::{GreenhouseCalculator, GreenhouseStandards};
pub use heating::{HeatingCalculator, HeatingStandards};
pub use irrigation::{IrrigationCalculator, IrrigationStandards};
pub use residential::{ResidentialCalculator, ResidentialStandards};
pub use solar::{SolarCalculator, SolarStandards};

/// 계산 오류.
#[derive(Debug, thiserror::Error)]
pub enum CalcError {
    /// 숫자가 아니거나 범위를 벗어난 입력. 카탈로그 접근 전에 반환된다.
    #[error("입력 오류 [{field}]: {reason}")]
    InvalidInput { field: String, reason: String },
    /// 계산된 압력이 안전 한계를 넘음. 부분 결과를 반환하지 않는다.
    #[error("계산된 압력 {pressure_bar:.2} bar 가 허용 한계 {ceiling_bar:.2} bar 를 초과합니다")]
    PhysicalLimit { pressure_bar: f64, ceiling_bar: f64 },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl CalcError {
    /// 호출자 책임(4xx)인지. 카탈로그 오류는 서버 책임(5xx)이다.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. } | CalcError::PhysicalLimit { .. }
        )
    }
}

/// 지원하는 시나리오 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    Irrigation,
    Greenhouse,
    Residential,
    Heating,
    Solar,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 5] = [
        ScenarioKind::Irrigation,
        ScenarioKind::Greenhouse,
        ScenarioKind::Residential,
        ScenarioKind::Heating,
        ScenarioKind::Solar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioKind::Irrigation => "irrigation",
            ScenarioKind::Greenhouse => "greenhouse",
            ScenarioKind::Residential => "residential",
            ScenarioKind::Heating => "heating",
            ScenarioKind::Solar => "solar",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ScenarioKind::ALL
            .into_iter()
            .find(|k| k.as_str() == lower)
            .ok_or_else(|| format!("알 수 없는 시나리오: {s}"))
    }
}

/// 물리 계산 결과. 저장하지 않는다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationResult {
    /// 요구 유량 [m3/h]
    pub flow_rate_m3h: f64,
    pub static_head_m: f64,
    pub friction_loss_m: f64,
    /// 전양정 [m]
    pub total_head_m: f64,
    pub pressure_bar: f64,
    /// 안전율 적용 유량 [m3/h]
    pub design_flow_m3h: f64,
    /// 안전율 적용 양정 [m]
    pub design_head_m: f64,
}

impl CalculationResult {
    /// 유한하지 않은 첫 번째 값의 이름. 설계 유량은 카탈로그 단위(L/h)로도 확인한다.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        [
            ("flow_rate", self.flow_rate_m3h),
            ("design_flow", self.design_flow_m3h),
            ("design_flow", m3h_to_lph(self.design_flow_m3h)),
            ("static_head", self.static_head_m),
            ("friction_loss", self.friction_loss_m),
            ("total_head", self.total_head_m),
            ("pressure", self.pressure_bar),
            ("design_head", self.design_head_m),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(name, _)| name)
    }
}

/// 계산 값에 영향을 주는 입력 키. 결과가 넘치면 오류에 싣는다.
/// 양정 계열 값은 마찰손실을 통해 유량 입력에도 의존한다.
pub(crate) struct Drivers {
    pub flow: &'static [&'static str],
    pub head: &'static [&'static str],
}

/// 큰 입력으로 계산 값이 inf/NaN이 되면 카탈로그 조회 전에 입력 오류로 돌려준다.
pub(crate) fn ensure_finite(calculation: &CalculationResult, drivers: &Drivers) -> Result<(), CalcError> {
    let Some(quantity) = calculation.first_non_finite() else {
        return Ok(());
    };
    let fields: Vec<&str> = if quantity.contains("flow") {
        drivers.flow.to_vec()
    } else {
        drivers.flow.iter().chain(drivers.head).copied().collect()
    };
    Err(CalcError::InvalidInput {
        field: fields.join(", "),
        reason: format!("입력값이 너무 커서 {quantity} 계산 결과가 유한하지 않습니다"),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specifications {
    pub flow_rate: String,
    pub total_head: String,
    pub pressure: String,
    pub standards_applied: Vec<String>,
}

/// 응답용 펌프 표현. 유량은 m3/h로 변환된다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PumpView {
    pub name: String,
    pub brand: String,
    pub power: Option<String>,
    pub price: String,
    pub flow_rate: String,
    pub head: String,
}

impl PumpView {
    /// `null_power_label`: 카탈로그 동력원이 NULL일 때 표시할 값.
    pub fn from_candidate(candidate: &Candidate, null_power_label: Option<PowerSource>) -> Self {
        let pump = &candidate.pump;
        Self {
            name: pump.name.clone(),
            brand: pump.brand.clone(),
            power: pump
                .power
                .or(null_power_label)
                .map(|p| p.as_str().to_string()),
            price: pump.price.to_string(),
            flow_rate: format_flow(lph_to_m3h(candidate.flow_lph)),
            head: format_head(candidate.head_m),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningView {
    pub message: String,
    pub suggestion: String,
    pub closest_match: Option<PumpView>,
}

/// HTTP 계층으로 넘기는 JSON 응답.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResponse {
    pub specifications: Specifications,
    pub pump: Option<PumpView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<WarningView>,
}

/// 계산 결과와 응답을 함께 담는다.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    pub calculation: CalculationResult,
    pub response: ScenarioResponse,
}

/// 시나리오 계산기 공통 인터페이스.
pub trait ScenarioCalculator {
    fn kind(&self) -> ScenarioKind;
    /// 입력 필드 정의 (대화형 입력, 문서화에 사용)
    fn fields(&self) -> &'static [FieldSpec];
    fn calculate(
        &self,
        input: &ScenarioInput,
        catalog: &dyn PumpCatalog,
    ) -> Result<ScenarioOutcome, CalcError>;
}

/// 시나리오별 기준표 묶음. config.toml의 `[standards.*]` 섹션과 대응한다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioStandards {
    pub irrigation: IrrigationStandards,
    pub greenhouse: GreenhouseStandards,
    pub residential: ResidentialStandards,
    pub heating: HeatingStandards,
    pub solar: SolarStandards,
}

impl ScenarioStandards {
    /// 모든 계수/상수가 유한한 양수인지 검사한다.
    pub fn validate(&self) -> Result<(), String> {
        self.irrigation.validate()?;
        self.greenhouse.validate()?;
        self.residential.validate()?;
        self.heating.validate()?;
        self.solar.validate()?;
        Ok(())
    }
}

/// 설정에서 만들어진 계산기 집합.
pub struct Calculators {
    irrigation: IrrigationCalculator,
    greenhouse: GreenhouseCalculator,
    residential: ResidentialCalculator,
    heating: HeatingCalculator,
    solar: SolarCalculator,
}

impl Calculators {
    pub fn new(standards: &ScenarioStandards) -> Self {
        Self {
            irrigation: IrrigationCalculator::new(standards.irrigation.clone()),
            greenhouse: GreenhouseCalculator::new(standards.greenhouse.clone()),
            residential: ResidentialCalculator::new(standards.residential.clone()),
            heating: HeatingCalculator::new(standards.heating.clone()),
            solar: SolarCalculator::new(standards.solar.clone()),
        }
    }

    pub fn get(&self, kind: ScenarioKind) -> &dyn ScenarioCalculator {
        match kind {
            ScenarioKind::Irrigation => &self.irrigation,
            ScenarioKind::Greenhouse => &self.greenhouse,
            ScenarioKind::Residential => &self.residential,
            ScenarioKind::Heating => &self.heating,
            ScenarioKind::Solar => &self.solar,
        }
    }

    pub fn calculate(
        &self,
        kind: ScenarioKind,
        input: &ScenarioInput,
        catalog: &dyn PumpCatalog,
    ) -> Result<ScenarioOutcome, CalcError> {
        self.get(kind).calculate(input, catalog)
    }
}

impl Default for Calculators {
    fn default() -> Self {
        Self::new(&ScenarioStandards::default())
    }
}

pub fn format_flow(m3h: f64) -> String {
    format!("{m3h:.2} m³/h")
}

pub fn format_head(m: f64) -> String {
    format!("{m:.2} m")
}

pub fn format_pressure(bar: f64) -> String {
    format!("{bar:.2} bar")
}

/// 동력원 필드를 읽는다. 대소문자는 구분하지 않는다.
pub(crate) fn read_power(input: &ScenarioInput, spec: &FieldSpec) -> Result<Option<PowerSource>, CalcError> {
    let text = input.choice(spec);
    if text.is_empty() || text == "any" {
        return Ok(None);
    }
    text.parse::<PowerSource>()
        .map(Some)
        .map_err(|reason| CalcError::InvalidInput {
            field: spec.key.to_string(),
            reason,
        })
}

/// 매칭을 실행하고 응답을 조립한다.
pub(crate) fn finish(
    calculation: CalculationResult,
    request: &MatchRequest,
    catalog: &dyn PumpCatalog,
    standards_applied: &[String],
    null_power_label: Option<PowerSource>,
) -> Result<ScenarioOutcome, CalcError> {
    debug!(
        "카탈로그 조회 범위: flow [{:.1}, {:.1}] L/h, head [{:.2}, {:.2}] m, power {:?}",
        request.query.min_flow_lph,
        request.query.max_flow_lph,
        request.query.min_head_m,
        request.query.max_head_m,
        request.query.power
    );
    let MatchOutcome { pump, warning } = PumpMatcher::new(catalog).find(request)?;
    let response = ScenarioResponse {
        specifications: Specifications {
            flow_rate: format_flow(calculation.flow_rate_m3h),
            total_head: format_head(calculation.total_head_m),
            pressure: format_pressure(calculation.pressure_bar),
            standards_applied: standards_applied.to_vec(),
        },
        pump: pump
            .as_ref()
            .map(|c| PumpView::from_candidate(c, null_power_label)),
        warning: warning.map(|w| WarningView {
            message: w.message,
            suggestion: w.suggestion,
            closest_match: w
                .closest_match
                .as_ref()
                .map(|c| PumpView::from_candidate(c, null_power_label)),
        }),
    };
    Ok(ScenarioOutcome {
        calculation,
        response,
    })
}

pub(crate) fn require_positive(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("{name} 값은 0보다 큰 유한한 수여야 합니다 (현재 {value})"))
    }
}

pub(crate) fn require_positive_table<'a, I>(name: &str, values: I) -> Result<(), String>
where
    I: IntoIterator<Item = (&'a String, &'a f64)>,
{
    for (key, value) in values {
        require_positive(&format!("{name}.{key}"), *value)?;
    }
    Ok(())
}

pub(crate) fn require_finite_table<'a, I>(name: &str, values: I) -> Result<(), String>
where
    I: IntoIterator<Item = (&'a String, &'a f64)>,
{
    for (key, value) in values {
        if !value.is_finite() {
            return Err(format!("{name}.{key} 값은 유한한 수여야 합니다"));
        }
    }
    Ok(())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn table(items: &[(&str, f64)]) -> std::collections::BTreeMap<String, f64> {
    items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}
