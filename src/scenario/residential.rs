//! 주거용 건물 급수 펌프 계산.
//!
//! 다른 시나리오와 달리 최근접 선택이 아닌 first-fit 정책을 쓴다: 조회 순서대로
//! 처음으로 설계 유량/양정 이상인 펌프를 고른다. 범위 내 후보가 없으면 전체
//! 카탈로그에서 유클리드 최근접 펌프를 제안한다.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    ensure_finite, finish, read_power, require_positive, strings, CalcError, CalculationResult,
    Drivers, ScenarioCalculator, ScenarioKind, ScenarioOutcome,
};
use crate::catalog::{MatchTarget, PumpCatalog, PumpQuery};
use crate::hydraulics::{
    building_static_head, pressure_from_head, pressure_head, total_head, HazenWilliams,
    HeadPressureConstants, SafetyFactors,
};
use crate::input::{FieldSpec, ScenarioInput};
use crate::matcher::{MatchRequest, SelectionPolicy};
use crate::units::m3h_to_lph;

pub const FLOORS: FieldSpec = FieldSpec::number("floors", None, "");
pub const PARKING_FLOORS: FieldSpec = FieldSpec::non_negative("parkingFloors", Some("0"), "");
pub const UNITS: FieldSpec = FieldSpec::number("units", None, "");
pub const INLET_PIPE_SIZE: FieldSpec = FieldSpec::number("inletPipeSize", None, "");
pub const POWER_TYPE: FieldSpec = FieldSpec::choice("powerType", "electric");

const FIELDS: &[FieldSpec] = &[FLOORS, PARKING_FLOORS, UNITS, INLET_PIPE_SIZE, POWER_TYPE];

const DRIVERS: Drivers = Drivers {
    flow: &[UNITS.key],
    head: &[FLOORS.key, PARKING_FLOORS.key, INLET_PIPE_SIZE.key],
};

/// 세대 수 구간별 첨두계수. `max_units` 이하이면 적용한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakBand {
    pub max_units: f64,
    pub factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidentialStandards {
    /// 1인당 일 사용량 [m3]
    pub water_per_person_m3: f64,
    pub people_per_unit: f64,
    pub peak_hours: f64,
    /// 오름차순
    pub peak_bands: Vec<PeakBand>,
    pub default_peak_factor: f64,
    pub floor_height_m: f64,
    /// 정수두에 더하는 수평 배관 여유 길이 [m]
    pub extra_pipe_length_m: f64,
    pub hazen_williams: HazenWilliams,
    /// 최상층 요구 압력 [bar]
    pub delivery_pressure_bar: f64,
    pub head_pressure: HeadPressureConstants,
    pub safety: SafetyFactors,
    /// 설계값 대비 상한 폭 (0.2 = 설계값 ~ 120%)
    pub flow_band_upper: f64,
    pub head_band_upper: f64,
    pub standards_applied: Vec<String>,
    pub suggestion: String,
}

impl Default for ResidentialStandards {
    fn default() -> Self {
        Self {
            water_per_person_m3: 0.5,
            people_per_unit: 5.0,
            peak_hours: 5.0,
            peak_bands: vec![
                PeakBand { max_units: 10.0, factor: 1.2 },
                PeakBand { max_units: 20.0, factor: 1.1 },
                PeakBand { max_units: 50.0, factor: 1.0 },
            ],
            default_peak_factor: 1.0,
            floor_height_m: 3.3,
            extra_pipe_length_m: 10.0,
            hazen_williams: HazenWilliams::RESIDENTIAL,
            delivery_pressure_bar: 3.0,
            head_pressure: HeadPressureConstants::symmetric(0.0981),
            safety: SafetyFactors::default(),
            flow_band_upper: 0.2,
            head_band_upper: 0.2,
            standards_applied: strings(&["EN 806-3", "ISO 3822", "AWWA C900", "HI 9.6.7"]),
            suggestion: "Review the calculated specifications with a consulting engineer".into(),
        }
    }
}

impl ResidentialStandards {
    pub fn validate(&self) -> Result<(), String> {
        require_positive("residential.water_per_person_m3", self.water_per_person_m3)?;
        require_positive("residential.people_per_unit", self.people_per_unit)?;
        require_positive("residential.peak_hours", self.peak_hours)?;
        let mut previous = 0.0;
        for (i, band) in self.peak_bands.iter().enumerate() {
            let field = format!("residential.peak_bands[{i}].max_units");
            require_positive(&field, band.max_units)?;
            if band.max_units <= previous {
                return Err(format!("{field}: 구간 상한은 오름차순이어야 합니다 ({} <= {previous})", band.max_units));
            }
            previous = band.max_units;
            require_positive(&format!("residential.peak_bands[{i}].factor"), band.factor)?;
        }
        require_positive("residential.default_peak_factor", self.default_peak_factor)?;
        require_positive("residential.floor_height_m", self.floor_height_m)?;
        require_positive("residential.delivery_pressure_bar", self.delivery_pressure_bar)?;
        require_positive("residential.head_pressure.pressure_to_head", self.head_pressure.pressure_to_head_bar_per_m)?;
        require_positive("residential.head_pressure.head_to_pressure", self.head_pressure.head_to_pressure_bar_per_m)?;
        require_positive("residential.safety.flow", self.safety.flow)?;
        require_positive("residential.safety.head", self.safety.head)?;
        Ok(())
    }

    /// 세대 수에 맞는 첨두계수.
    pub fn peak_factor(&self, units: f64) -> f64 {
        self.peak_bands
            .iter()
            .find(|band| units <= band.max_units)
            .map(|band| band.factor)
            .unwrap_or(self.default_peak_factor)
    }
}

pub struct ResidentialCalculator {
    standards: ResidentialStandards,
}

impl ResidentialCalculator {
    pub fn new(standards: ResidentialStandards) -> Self {
        Self { standards }
    }
}

impl Default for ResidentialCalculator {
    fn default() -> Self {
        Self::new(ResidentialStandards::default())
    }
}

impl ScenarioCalculator for ResidentialCalculator {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::Residential
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

        let floors = input.number(&FLOORS)?;
        let parking_floors = input.number(&PARKING_FLOORS)?;
        let units = input.number(&UNITS)?;
        let inlet_pipe_size = input.number(&INLET_PIPE_SIZE)?;
        let power = read_power(input, &POWER_TYPE)?;

        let peak = s.peak_factor(units);
        let daily_m3 = units * s.people_per_unit * s.water_per_person_m3;
        let flow_m3h = daily_m3 * peak / s.peak_hours;
        debug!("주거 유량: units={units}, peak={peak}, daily={daily_m3} m3 -> {flow_m3h} m3/h");

        let static_head_m = building_static_head(floors, parking_floors, s.floor_height_m);
        let pipe_length_m = static_head_m + s.extra_pipe_length_m;
        let friction_loss_m = s.hazen_williams.loss_m(flow_m3h, inlet_pipe_size, pipe_length_m);
        let required_head_m = pressure_head(s.delivery_pressure_bar, &s.head_pressure);
        let total_head_m = total_head(static_head_m, friction_loss_m, required_head_m);
        let pressure_bar = pressure_from_head(total_head_m, &s.head_pressure);
        debug!(
            "주거 수두: static={static_head_m}, pipe={pipe_length_m} m, friction={friction_loss_m}, pressure_head={required_head_m}, total={total_head_m}, pressure={pressure_bar} bar"
        );

        let design = s.safety.apply(flow_m3h, total_head_m);
        let design_lph = m3h_to_lph(design.flow_m3h);
        let request = MatchRequest {
            query: PumpQuery {
                min_flow_lph: design_lph,
                max_flow_lph: design_lph * (1.0 + s.flow_band_upper),
                min_head_m: design.head_m,
                max_head_m: design.head_m * (1.0 + s.head_band_upper),
                power,
            },
            policy: SelectionPolicy::FirstSatisfying,
            target: MatchTarget {
                flow_lph: design_lph,
                head_m: design.head_m,
            },
            closest_fallback: true,
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
