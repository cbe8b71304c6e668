//! 온실 관수 펌프 계산.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    ensure_finite, finish, read_power, require_positive, require_positive_table, strings, table,
    CalcError, CalculationResult, Drivers, ScenarioCalculator, ScenarioKind, ScenarioOutcome,
};
use crate::catalog::{MatchTarget, PumpCatalog, PumpQuery};
use crate::hydraulics::{
    lookup_factor, multiplicative_flow, pressure_from_head, total_head, HazenWilliams,
    HeadPressureConstants, SafetyFactors,
};
use crate::input::{FieldSpec, ScenarioInput};
use crate::matcher::{MatchRequest, SelectionPolicy};
use crate::units::{m3h_to_lph, mm_to_m};

pub const AREA: FieldSpec = FieldSpec::number("area", Some("100"), "m²");
pub const CROP_TYPE: FieldSpec = FieldSpec::choice("cropType", "other");
pub const IRRIGATION_TYPE: FieldSpec = FieldSpec::choice("irrigationType", "drip");
pub const IRRIGATION_TIME: FieldSpec = FieldSpec::number("irrigationTime", Some("1"), "h");
pub const STATIC_HEAD: FieldSpec = FieldSpec::non_negative("staticHead", Some("0"), "m");
pub const PIPE_LENGTH: FieldSpec = FieldSpec::number("pipeLength", Some("20"), "m");
pub const PIPE_DIAMETER: FieldSpec = FieldSpec::number("pipeDiameter", Some("50"), "mm");
pub const PIPE_MATERIAL: FieldSpec = FieldSpec::choice("pipeMaterial", "pvc");
pub const TARGET_HUMIDITY: FieldSpec = FieldSpec::number("targetHumidity", Some("70"), "%");
pub const TARGET_TEMP: FieldSpec = FieldSpec::number("targetTemp", Some("25"), "°C");
pub const POWER_SOURCE: FieldSpec = FieldSpec::choice("powerSource", "electric");

const FIELDS: &[FieldSpec] = &[
    AREA,
    CROP_TYPE,
    IRRIGATION_TYPE,
    IRRIGATION_TIME,
    STATIC_HEAD,
    PIPE_LENGTH,
    PIPE_DIAMETER,
    PIPE_MATERIAL,
    TARGET_HUMIDITY,
    TARGET_TEMP,
    POWER_SOURCE,
];

const DRIVERS: Drivers = Drivers {
    flow: &[AREA.key, IRRIGATION_TIME.key],
    head: &[STATIC_HEAD.key, PIPE_LENGTH.key, PIPE_DIAMETER.key],
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GreenhouseStandards {
    /// 관수 방식별 기준 유량 [m3/h/ha]
    pub irrigation_bases: BTreeMap<String, f64>,
    pub default_irrigation_base: f64,
    pub crop_factors: BTreeMap<String, f64>,
    pub default_crop_factor: f64,
    pub humidity_threshold_pct: f64,
    pub humidity_factor: f64,
    pub temperature_threshold_c: f64,
    pub temperature_factor: f64,
    /// 관 재질별 Hazen-Williams C
    pub material_roughness: BTreeMap<String, f64>,
    pub default_roughness: f64,
    pub hazen_williams: HazenWilliams,
    /// 관수 방식별 요구 압력수두 [m]
    pub required_pressure_heads: BTreeMap<String, f64>,
    pub default_pressure_head_m: f64,
    pub head_pressure: HeadPressureConstants,
    pub safety: SafetyFactors,
    pub flow_band: f64,
    pub standards_applied: Vec<String>,
    pub suggestion: String,
}

impl Default for GreenhouseStandards {
    fn default() -> Self {
        Self {
            irrigation_bases: table(&[("mist", 5.0), ("drip", 3.0)]),
            default_irrigation_base: 2.0,
            crop_factors: table(&[("tomato", 1.2), ("cucumber", 1.1)]),
            default_crop_factor: 1.0,
            humidity_threshold_pct: 70.0,
            humidity_factor: 1.1,
            temperature_threshold_c: 25.0,
            temperature_factor: 1.05,
            material_roughness: table(&[
                ("pvc", 140.0),
                ("pe", 150.0),
                ("steel", 120.0),
                ("cast_iron", 100.0),
            ]),
            default_roughness: 140.0,
            hazen_williams: HazenWilliams::IRRIGATION,
            required_pressure_heads: table(&[("mist", 20.0), ("drip", 15.0)]),
            default_pressure_head_m: 10.0,
            head_pressure: HeadPressureConstants::symmetric(0.098),
            // 온실은 유량 안전율 없이 양정에만 10%를 둔다
            safety: SafetyFactors {
                flow: 1.0,
                head: 1.10,
            },
            flow_band: 0.2,
            standards_applied: strings(&["EN 806-3", "ISO 3822"]),
            suggestion: "Review the calculated specifications with a consulting engineer".into(),
        }
    }
}

impl GreenhouseStandards {
    pub fn validate(&self) -> Result<(), String> {
        require_positive_table("greenhouse.irrigation_bases", &self.irrigation_bases)?;
        require_positive("greenhouse.default_irrigation_base", self.default_irrigation_base)?;
        require_positive_table("greenhouse.crop_factors", &self.crop_factors)?;
        require_positive("greenhouse.default_crop_factor", self.default_crop_factor)?;
        require_positive("greenhouse.humidity_factor", self.humidity_factor)?;
        require_positive("greenhouse.temperature_factor", self.temperature_factor)?;
        require_positive_table("greenhouse.material_roughness", &self.material_roughness)?;
        require_positive("greenhouse.default_roughness", self.default_roughness)?;
        require_positive_table("greenhouse.required_pressure_heads", &self.required_pressure_heads)?;
        require_positive("greenhouse.default_pressure_head_m", self.default_pressure_head_m)?;
        require_positive("greenhouse.head_pressure.head_to_pressure", self.head_pressure.head_to_pressure_bar_per_m)?;
        require_positive("greenhouse.safety.flow", self.safety.flow)?;
        require_positive("greenhouse.safety.head", self.safety.head)?;
        require_positive("greenhouse.flow_band", self.flow_band)?;
        Ok(())
    }
}

pub struct GreenhouseCalculator {
    standards: GreenhouseStandards,
}

impl GreenhouseCalculator {
    pub fn new(standards: GreenhouseStandards) -> Self {
        Self { standards }
    }
}

impl Default for GreenhouseCalculator {
    fn default() -> Self {
        Self::new(GreenhouseStandards::default())
    }
}

impl ScenarioCalculator for GreenhouseCalculator {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::Greenhouse
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

        let area_m2 = input.number(&AREA)?;
        let irrigation_time_h = input.number(&IRRIGATION_TIME)?;
        let static_head_m = input.number(&STATIC_HEAD)?;
        let pipe_length_m = input.number(&PIPE_LENGTH)?;
        let pipe_diameter_mm = input.number(&PIPE_DIAMETER)?;
        let humidity_pct = input.number(&TARGET_HUMIDITY)?;
        let temp_c = input.number(&TARGET_TEMP)?;
        let crop_key = input.choice(&CROP_TYPE);
        let irrigation_key = input.choice(&IRRIGATION_TYPE);
        let material_key = input.choice(&PIPE_MATERIAL);
        let power = read_power(input, &POWER_SOURCE)?;

        let area_ha = area_m2 / 10_000.0;
        let base = lookup_factor(&s.irrigation_bases, &irrigation_key, s.default_irrigation_base);
        let crop_factor = lookup_factor(&s.crop_factors, &crop_key, s.default_crop_factor);
        let time_factor = 1.0 / irrigation_time_h;
        let humidity_factor = if humidity_pct > s.humidity_threshold_pct {
            s.humidity_factor
        } else {
            1.0
        };
        let temp_factor = if temp_c > s.temperature_threshold_c {
            s.temperature_factor
        } else {
            1.0
        };
        let flow_m3h = multiplicative_flow(&[
            area_ha,
            base,
            crop_factor,
            time_factor,
            humidity_factor,
            temp_factor,
        ]);
        debug!(
            "온실 유량: area={area_ha} ha, base={base}, crop={crop_factor}, time={time_factor}, humidity={humidity_factor}, temp={temp_factor} -> {flow_m3h} m3/h"
        );

        let roughness = lookup_factor(&s.material_roughness, &material_key, s.default_roughness);
        let friction_loss_m = s
            .hazen_williams
            .with_roughness(roughness)
            .loss_m(flow_m3h, mm_to_m(pipe_diameter_mm), pipe_length_m);
        let required_head_m = lookup_factor(
            &s.required_pressure_heads,
            &irrigation_key,
            s.default_pressure_head_m,
        );
        let total_head_m = total_head(static_head_m, friction_loss_m, required_head_m);
        let pressure_bar = pressure_from_head(total_head_m, &s.head_pressure);
        debug!(
            "온실 수두: static={static_head_m}, friction={friction_loss_m} (C={roughness}), pressure_head={required_head_m}, total={total_head_m}, pressure={pressure_bar} bar"
        );

        let design = s.safety.apply(flow_m3h, total_head_m);
        let design_lph = m3h_to_lph(design.flow_m3h);
        let request = MatchRequest {
            query: PumpQuery {
                min_flow_lph: design_lph * (1.0 - s.flow_band),
                max_flow_lph: design_lph * (1.0 + s.flow_band),
                min_head_m: design.head_m,
                max_head_m: f64::INFINITY,
                power,
            },
            policy: SelectionPolicy::Nearest,
            // 양정 목표는 전양정 ±10% 밴드의 상한(= 설계 양정)
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
