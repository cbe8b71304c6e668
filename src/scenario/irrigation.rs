//! 농업 관개 펌프 계산.
//!
//! 유량은 곱셈형 모델(시스템 기준값 × 면적 × 작물 × 시간 × 시스템 보정 × 급수 패턴),
//! 마찰손실은 Hazen-Williams(SI), 요구 압력은 점적기 압력을 수두로 환산한 값이다.
//! 계산 압력이 10 bar를 넘으면 결과 없이 실패한다.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    ensure_finite, finish, read_power, require_finite_table, require_positive,
    require_positive_table, strings, table, CalcError, CalculationResult, Drivers,
    ScenarioCalculator, ScenarioKind, ScenarioOutcome,
};
use crate::catalog::{MatchTarget, PowerSource, PumpCatalog, PumpQuery};
use crate::hydraulics::{
    lookup_factor, multiplicative_flow, offset_static_head, pressure_from_head, pressure_head,
    total_head, HazenWilliams, HeadPressureConstants, SafetyFactors,
};
use crate::input::{FieldSpec, ScenarioInput};
use crate::matcher::{MatchRequest, SelectionPolicy};
use crate::units::{m3h_to_lph, mm_to_m};

pub const AREA: FieldSpec = FieldSpec::number("area", Some("1"), "m²");
pub const IRRIGATION_SYSTEM: FieldSpec = FieldSpec::choice("irrigationSystem", "drip");
pub const IRRIGATION_PATTERN: FieldSpec = FieldSpec::choice("irrigationPattern", "whole_field");
pub const CROP_TYPE: FieldSpec = FieldSpec::choice("cropType", "cereals");
pub const IRRIGATION_TIME: FieldSpec = FieldSpec::number("irrigationTime", Some("1"), "h");
pub const SLOPE_HEIGHT: FieldSpec = FieldSpec::choice("slopeHeight", "flat");
pub const DISTANCE_TO_SOURCE: FieldSpec = FieldSpec::choice("distanceToSource", "under_20m");
pub const SOURCE_ELEVATION: FieldSpec = FieldSpec::choice("sourceElevation", "below_field");
pub const PIPE_LENGTH: FieldSpec = FieldSpec::number("pipeLength", Some("20"), "m");
pub const PIPE_DIAMETER: FieldSpec = FieldSpec::number("pipeDiameter", Some("50"), "mm");
pub const DRIPPER_PRESSURE: FieldSpec = FieldSpec::number("dripperPressure", Some("1.5"), "bar");
pub const POWER_SOURCE: FieldSpec = FieldSpec::choice("powerSource", "electric");

const FIELDS: &[FieldSpec] = &[
    AREA,
    IRRIGATION_SYSTEM,
    IRRIGATION_PATTERN,
    CROP_TYPE,
    IRRIGATION_TIME,
    SLOPE_HEIGHT,
    DISTANCE_TO_SOURCE,
    SOURCE_ELEVATION,
    PIPE_LENGTH,
    PIPE_DIAMETER,
    DRIPPER_PRESSURE,
    POWER_SOURCE,
];

const DRIVERS: Drivers = Drivers {
    flow: &[AREA.key],
    head: &[PIPE_LENGTH.key, PIPE_DIAMETER.key, DRIPPER_PRESSURE.key],
};

/// 관개 방식별 유량 기준값 [m3/h/ha]과 보정계수.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemFlow {
    pub base: f64,
    pub adjustment: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrigationStandards {
    pub systems: BTreeMap<String, SystemFlow>,
    /// 알 수 없는 관개 방식일 때 쓰는 키
    pub default_system: String,
    pub crop_factors: BTreeMap<String, f64>,
    pub pattern_factors: BTreeMap<String, f64>,
    pub time_factor: f64,
    /// 경사 카테고리별 정수두 가산 [m]
    pub slope_heads: BTreeMap<String, f64>,
    /// 수원 높이 카테고리별 정수두 가산 [m]
    pub source_elevation_heads: BTreeMap<String, f64>,
    pub hazen_williams: HazenWilliams,
    pub head_pressure: HeadPressureConstants,
    pub pressure_ceiling_bar: f64,
    pub safety: SafetyFactors,
    /// 설계 유량 기준 ± 검색 폭 (0.2 = ±20%)
    pub flow_band: f64,
    /// 설계 양정 하한 폭 (0.1 = 설계값의 90% 이상)
    pub head_band: f64,
    pub standards_applied: Vec<String>,
    pub suggestion: String,
}

impl Default for IrrigationStandards {
    fn default() -> Self {
        Self {
            systems: [
                ("drip", SystemFlow { base: 7.5, adjustment: 1.0 }),
                ("sprinkler", SystemFlow { base: 12.0, adjustment: 1.5 }),
                ("surface", SystemFlow { base: 15.0, adjustment: 2.0 }),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
            default_system: "drip".into(),
            crop_factors: table(&[
                ("vegetables", 1.0),
                ("orchard", 1.2),
                ("cereals", 0.8),
                ("forage", 1.1),
                ("greenhouse", 1.5),
                ("other", 1.0),
            ]),
            pattern_factors: table(&[
                ("whole_field", 1.0),
                ("two_sections", 0.5),
                ("multi_zone", 0.33),
            ]),
            time_factor: 1.0,
            slope_heads: table(&[("flat", 0.0), ("gentle", 5.0), ("steep", 10.0)]),
            source_elevation_heads: table(&[
                ("above_field", -5.0),
                ("level", 0.0),
                ("below_field", 5.0),
            ]),
            hazen_williams: HazenWilliams::IRRIGATION,
            head_pressure: HeadPressureConstants::symmetric(0.0981),
            pressure_ceiling_bar: 10.0,
            safety: SafetyFactors::default(),
            flow_band: 0.2,
            head_band: 0.1,
            standards_applied: strings(&["EN 806-3", "ISO 3822"]),
            suggestion: "Review the calculated specifications with a consulting engineer or add a suitable pump to the catalog".into(),
        }
    }
}

impl IrrigationStandards {
    pub fn validate(&self) -> Result<(), String> {
        if !self.systems.contains_key(&self.default_system) {
            return Err(format!(
                "irrigation.default_system '{}' 이(가) systems 에 없습니다",
                self.default_system
            ));
        }
        for (key, sys) in &self.systems {
            require_positive(&format!("irrigation.systems.{key}.base"), sys.base)?;
            require_positive(&format!("irrigation.systems.{key}.adjustment"), sys.adjustment)?;
        }
        require_positive_table("irrigation.crop_factors", &self.crop_factors)?;
        require_positive_table("irrigation.pattern_factors", &self.pattern_factors)?;
        require_finite_table("irrigation.slope_heads", &self.slope_heads)?;
        require_finite_table("irrigation.source_elevation_heads", &self.source_elevation_heads)?;
        require_positive("irrigation.time_factor", self.time_factor)?;
        require_positive("irrigation.pressure_ceiling_bar", self.pressure_ceiling_bar)?;
        require_positive("irrigation.head_pressure.pressure_to_head", self.head_pressure.pressure_to_head_bar_per_m)?;
        require_positive("irrigation.head_pressure.head_to_pressure", self.head_pressure.head_to_pressure_bar_per_m)?;
        require_positive("irrigation.safety.flow", self.safety.flow)?;
        require_positive("irrigation.safety.head", self.safety.head)?;
        require_positive("irrigation.flow_band", self.flow_band)?;
        require_positive("irrigation.head_band", self.head_band)?;
        Ok(())
    }
}

pub struct IrrigationCalculator {
    standards: IrrigationStandards,
}

impl IrrigationCalculator {
    pub fn new(standards: IrrigationStandards) -> Self {
        Self { standards }
    }
}

impl Default for IrrigationCalculator {
    fn default() -> Self {
        Self::new(IrrigationStandards::default())
    }
}

impl ScenarioCalculator for IrrigationCalculator {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::Irrigation
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
        let pipe_length_m = input.number(&PIPE_LENGTH)?;
        let pipe_diameter_mm = input.number(&PIPE_DIAMETER)?;
        let dripper_pressure_bar = input.number(&DRIPPER_PRESSURE)?;
        let system_key = input.choice(&IRRIGATION_SYSTEM);
        let pattern_key = input.choice(&IRRIGATION_PATTERN);
        let crop_key = input.choice(&CROP_TYPE);
        let slope_key = input.choice(&SLOPE_HEIGHT);
        let source_key = input.choice(&SOURCE_ELEVATION);
        let distance_key = input.choice(&DISTANCE_TO_SOURCE);
        let power = read_power(input, &POWER_SOURCE)?;

        // 유량
        let area_ha = area_m2 / 10_000.0;
        let system = s
            .systems
            .get(&system_key)
            .or_else(|| s.systems.get(&s.default_system))
            .copied()
            .unwrap_or(SystemFlow {
                base: 1.0,
                adjustment: 1.0,
            });
        let crop_factor = lookup_factor(&s.crop_factors, &crop_key, 1.0);
        let pattern_factor = lookup_factor(&s.pattern_factors, &pattern_key, 1.0);
        let flow_m3h = multiplicative_flow(&[
            system.base,
            area_ha,
            crop_factor,
            s.time_factor,
            system.adjustment,
            pattern_factor,
        ]);
        debug!(
            "관개 유량: area={area_ha} ha, system={system:?}, crop={crop_factor}, time={} (입력 {irrigation_time_h} h), pattern={pattern_factor}, distance={distance_key} -> {flow_m3h} m3/h",
            s.time_factor
        );

        // 수두
        let static_head_m = offset_static_head([
            (&s.slope_heads, slope_key.as_str()),
            (&s.source_elevation_heads, source_key.as_str()),
        ]);
        let friction_loss_m =
            s.hazen_williams
                .loss_m(flow_m3h, mm_to_m(pipe_diameter_mm), pipe_length_m);
        let required_head_m = pressure_head(dripper_pressure_bar, &s.head_pressure);
        let total_head_m = total_head(static_head_m, friction_loss_m, required_head_m);
        let pressure_bar = pressure_from_head(total_head_m, &s.head_pressure);
        debug!(
            "관개 수두: static={static_head_m}, friction={friction_loss_m}, pressure_head={required_head_m}, total={total_head_m}, pressure={pressure_bar} bar"
        );

        let design = s.safety.apply(flow_m3h, total_head_m);
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

        if pressure_bar > s.pressure_ceiling_bar {
            return Err(CalcError::PhysicalLimit {
                pressure_bar,
                ceiling_bar: s.pressure_ceiling_bar,
            });
        }

        let design_lph = m3h_to_lph(design.flow_m3h);
        let request = MatchRequest {
            query: PumpQuery {
                min_flow_lph: design_lph * (1.0 - s.flow_band),
                max_flow_lph: design_lph * (1.0 + s.flow_band),
                min_head_m: design.head_m * (1.0 - s.head_band),
                max_head_m: f64::INFINITY,
                power,
            },
            policy: SelectionPolicy::Nearest,
            target: MatchTarget {
                flow_lph: design_lph,
                head_m: design.head_m,
            },
            closest_fallback: false,
            suggestion: s.suggestion.clone(),
        };

        finish(
            calculation,
            &request,
            catalog,
            &s.standards_applied,
            Some(PowerSource::Electric),
        )
    }
}
