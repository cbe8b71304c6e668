//! 태양광 양수 펌프 계산 (간이식).

use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    ensure_finite, finish, read_power, require_positive, CalcError, CalculationResult, Drivers,
    ScenarioCalculator, ScenarioKind, ScenarioOutcome,
};
use crate::catalog::{MatchTarget, PumpCatalog, PumpQuery};
use crate::hydraulics::{pressure_from_head, total_head, FixedVelocityDarcy, HeadPressureConstants, SafetyFactors};
use crate::input::{FieldSpec, ScenarioInput};
use crate::matcher::{MatchRequest, SelectionPolicy};
use crate::units::{convert_flow, m3h_to_lph, FlowUnit};

pub const PANEL_AREA: FieldSpec = FieldSpec::number("panelArea", None, "m²");
pub const SUNLIGHT_HOURS: FieldSpec = FieldSpec::number("sunlightHours", None, "h");
pub const STATIC_HEAD: FieldSpec = FieldSpec::non_negative("staticHead", Some("0"), "m");
pub const PIPE_LENGTH: FieldSpec = FieldSpec::number("pipeLength", None, "m");
pub const POWER_SOURCE: FieldSpec = FieldSpec::choice("powerSource", "solar");

const FIELDS: &[FieldSpec] = &[PANEL_AREA, SUNLIGHT_HOURS, STATIC_HEAD, PIPE_LENGTH, POWER_SOURCE];

const DRIVERS: Drivers = Drivers {
    flow: &[PANEL_AREA.key, SUNLIGHT_HOURS.key],
    head: &[STATIC_HEAD.key, PIPE_LENGTH.key],
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarStandards {
    /// 패널 단위 면적당 일사 출력 [W/m²]
    pub irradiance_w_per_m2: f64,
    /// 1 L/s 양수에 필요한 일 에너지 [Wh]
    pub wh_per_lps: f64,
    pub darcy: FixedVelocityDarcy,
    pub head_pressure: HeadPressureConstants,
    pub safety: SafetyFactors,
    pub standards_applied: Vec<String>,
    pub suggestion: String,
}

impl Default for SolarStandards {
    fn default() -> Self {
        Self {
            irradiance_w_per_m2: 1000.0,
            wh_per_lps: 100.0,
            darcy: FixedVelocityDarcy::new(0.02),
            head_pressure: HeadPressureConstants::symmetric(0.0981),
            safety: SafetyFactors::default(),
            standards_applied: Vec::new(),
            suggestion: "Contact support for a solar pump in this range".into(),
        }
    }
}

impl SolarStandards {
    pub fn validate(&self) -> Result<(), String> {
        require_positive("solar.irradiance_w_per_m2", self.irradiance_w_per_m2)?;
        require_positive("solar.wh_per_lps", self.wh_per_lps)?;
        require_positive("solar.darcy.friction_factor", self.darcy.friction_factor)?;
        require_positive("solar.darcy.diameter_m", self.darcy.diameter_m)?;
        require_positive("solar.darcy.gravity_m_per_s2", self.darcy.gravity_m_per_s2)?;
        require_positive("solar.head_pressure.head_to_pressure", self.head_pressure.head_to_pressure_bar_per_m)?;
        require_positive("solar.safety.flow", self.safety.flow)?;
        require_positive("solar.safety.head", self.safety.head)?;
        Ok(())
    }
}

pub struct SolarCalculator {
    standards: SolarStandards,
}

impl SolarCalculator {
    pub fn new(standards: SolarStandards) -> Self {
        Self { standards }
    }
}

impl Default for SolarCalculator {
    fn default() -> Self {
        Self::new(SolarStandards::default())
    }
}

impl ScenarioCalculator for SolarCalculator {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::Solar
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn calculate(
        &self,
        input: &ScenarioInput,
        catalog: &dyn PumpCatalog,
    ) -> Result<ScenarioOutcome, CalcError> {
        let s = &self.standards;

        let panel_area_m2 = input.number(&PANEL_AREA)?;
        let sunlight_h = input.number(&SUNLIGHT_HOURS)?;
        let static_head_m = input.number(&STATIC_HEAD)?;
        let pipe_length_m = input.number(&PIPE_LENGTH)?;
        let power = read_power(input, &POWER_SOURCE)?;

        let energy_wh = panel_area_m2 * s.irradiance_w_per_m2 * sunlight_h;
        let flow_lps = energy_wh / s.wh_per_lps;
        let flow_m3h = convert_flow(flow_lps, FlowUnit::LiterPerSecond, FlowUnit::CubicMeterPerHour);

        let friction_loss_m = s.darcy.loss_m(pipe_length_m);
        let total_head_m = total_head(static_head_m, friction_loss_m, 0.0);
        let pressure_bar = pressure_from_head(total_head_m, &s.head_pressure);
        debug!(
            "태양광: energy={energy_wh} Wh, flow={flow_m3h} m3/h, static={static_head_m}, friction={friction_loss_m}, total={total_head_m}, pressure={pressure_bar} bar"
        );

        let design = s.safety.apply(flow_m3h, total_head_m);
        let design_lph = m3h_to_lph(design.flow_m3h);
        let request = MatchRequest {
            query: PumpQuery {
                min_flow_lph: design_lph,
                max_flow_lph: f64::INFINITY,
                min_head_m: design.head_m,
                max_head_m: f64::INFINITY,
                power,
            },
            policy: SelectionPolicy::FirstSatisfying,
            target: MatchTarget {
                flow_lph: design_lph,
                head_m: design.head_m,
            },
            closest_fallback: false,
            suggestion: s.suggestion.clone(),
        };

        let calculation = CalculationResult {
            flow_rate_m3h: flow_m3h,
            static_head_m,
            friction_loss_m,
            total_head_m,
            pressure_bar,
            design_flow_m3h: design.flow_m3h,
            design_head_m: design.head_m,
        };
        ensure_finite(&calculation, &DRIVERS)?;
        finish(calculation, &request, catalog, &s.standards_applied, None)
    }
}
