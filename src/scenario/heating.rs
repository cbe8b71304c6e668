//! 난방 순환 펌프 계산 (간이식).

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

pub const ROOM_AREA: FieldSpec = FieldSpec::number("roomArea", None, "m²");
pub const TEMP_DIFF: FieldSpec = FieldSpec::number("tempDiff", None, "K");
pub const PIPE_LENGTH: FieldSpec = FieldSpec::number("pipeLength", None, "m");
pub const POWER_SOURCE: FieldSpec = FieldSpec::choice("powerSource", "electric");

const FIELDS: &[FieldSpec] = &[ROOM_AREA, TEMP_DIFF, PIPE_LENGTH, POWER_SOURCE];

const DRIVERS: Drivers = Drivers {
    flow: &[ROOM_AREA.key],
    head: &[TEMP_DIFF.key, PIPE_LENGTH.key],
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatingStandards {
    /// 단위 면적당 열부하 [W/m²]
    pub heat_load_w_per_m2: f64,
    /// 1 L/s 당 처리 열부하 [W]
    pub watts_per_lps: f64,
    /// 온도차 1 K당 양정 [m]
    pub head_per_kelvin_m: f64,
    pub darcy: FixedVelocityDarcy,
    pub head_pressure: HeadPressureConstants,
    pub safety: SafetyFactors,
    pub standards_applied: Vec<String>,
    pub suggestion: String,
}

impl Default for HeatingStandards {
    fn default() -> Self {
        Self {
            heat_load_w_per_m2: 50.0,
            watts_per_lps: 1000.0,
            head_per_kelvin_m: 0.1,
            darcy: FixedVelocityDarcy::new(0.025),
            head_pressure: HeadPressureConstants::symmetric(0.0981),
            safety: SafetyFactors::default(),
            standards_applied: Vec::new(),
            suggestion: "Contact support for a circulation pump in this range".into(),
        }
    }
}

impl HeatingStandards {
    pub fn validate(&self) -> Result<(), String> {
        require_positive("heating.heat_load_w_per_m2", self.heat_load_w_per_m2)?;
        require_positive("heating.watts_per_lps", self.watts_per_lps)?;
        require_positive("heating.head_per_kelvin_m", self.head_per_kelvin_m)?;
        require_positive("heating.darcy.friction_factor", self.darcy.friction_factor)?;
        require_positive("heating.darcy.diameter_m", self.darcy.diameter_m)?;
        require_positive("heating.darcy.gravity_m_per_s2", self.darcy.gravity_m_per_s2)?;
        require_positive("heating.head_pressure.head_to_pressure", self.head_pressure.head_to_pressure_bar_per_m)?;
        require_positive("heating.safety.flow", self.safety.flow)?;
        require_positive("heating.safety.head", self.safety.head)?;
        Ok(())
    }
}

pub struct HeatingCalculator {
    standards: HeatingStandards,
}

impl HeatingCalculator {
    pub fn new(standards: HeatingStandards) -> Self {
        Self { standards }
    }
}

impl Default for HeatingCalculator {
    fn default() -> Self {
        Self::new(HeatingStandards::default())
    }
}

impl ScenarioCalculator for HeatingCalculator {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::Heating
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

        let room_area_m2 = input.number(&ROOM_AREA)?;
        let temp_diff_k = input.number(&TEMP_DIFF)?;
        let pipe_length_m = input.number(&PIPE_LENGTH)?;
        let power = read_power(input, &POWER_SOURCE)?;

        let heat_load_w = room_area_m2 * s.heat_load_w_per_m2;
        let flow_lps = heat_load_w / s.watts_per_lps;
        let flow_m3h = convert_flow(flow_lps, FlowUnit::LiterPerSecond, FlowUnit::CubicMeterPerHour);

        let static_head_m = temp_diff_k * s.head_per_kelvin_m;
        let friction_loss_m = s.darcy.loss_m(pipe_length_m);
        let total_head_m = total_head(static_head_m, friction_loss_m, 0.0);
        let pressure_bar = pressure_from_head(total_head_m, &s.head_pressure);
        debug!(
            "난방: load={heat_load_w} W, flow={flow_m3h} m3/h, dT head={static_head_m}, friction={friction_loss_m}, total={total_head_m}, pressure={pressure_bar} bar"
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
