use serde::{Deserialize, Serialize};

/// 체적 유량 단위. 내부 기준은 m3/h 이다.
/// 펌프 카탈로그는 L/h 로 저장되므로 비교는 항상 L/h 로 하고 응답에서만 m3/h 로 바꾼다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowUnit {
    CubicMeterPerHour,
    CubicMeterPerSecond,
    LiterPerHour,
    LiterPerSecond,
}

fn to_m3_per_h(value: f64, unit: FlowUnit) -> f64 {
    match unit {
        FlowUnit::CubicMeterPerHour => value,
        FlowUnit::CubicMeterPerSecond => value * 3600.0,
        FlowUnit::LiterPerHour => value / 1000.0,
        FlowUnit::LiterPerSecond => value * 3.6,
    }
}

fn from_m3_per_h(value_m3h: f64, unit: FlowUnit) -> f64 {
    match unit {
        FlowUnit::CubicMeterPerHour => value_m3h,
        FlowUnit::CubicMeterPerSecond => value_m3h / 3600.0,
        FlowUnit::LiterPerHour => value_m3h * 1000.0,
        FlowUnit::LiterPerSecond => value_m3h * 1000.0 / 3600.0,
    }
}

/// 유량을 다른 단위로 변환한다.
pub fn convert_flow(value: f64, from: FlowUnit, to: FlowUnit) -> f64 {
    let m3h = to_m3_per_h(value, from);
    from_m3_per_h(m3h, to)
}

/// m3/h -> L/h (카탈로그 저장 단위)
pub fn m3h_to_lph(value_m3h: f64) -> f64 {
    convert_flow(value_m3h, FlowUnit::CubicMeterPerHour, FlowUnit::LiterPerHour)
}

/// L/h -> m3/h (응답 표시 단위)
pub fn lph_to_m3h(value_lph: f64) -> f64 {
    convert_flow(value_lph, FlowUnit::LiterPerHour, FlowUnit::CubicMeterPerHour)
}
