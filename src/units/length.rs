use serde::{Deserialize, Serialize};

/// 길이 단위. 내부 기준은 미터이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    Meter,
    Millimeter,
}

fn to_meter(value: f64, unit: LengthUnit) -> f64 {
    match unit {
        LengthUnit::Meter => value,
        LengthUnit::Millimeter => value / 1000.0,
    }
}

fn from_meter(value_m: f64, unit: LengthUnit) -> f64 {
    match unit {
        LengthUnit::Meter => value_m,
        LengthUnit::Millimeter => value_m * 1000.0,
    }
}

/// 길이를 다른 단위로 변환한다.
pub fn convert_length(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
    let m = to_meter(value, from);
    from_meter(m, to)
}

/// 배관 내경 입력(mm)을 m로 바꾼다.
pub fn mm_to_m(value_mm: f64) -> f64 {
    convert_length(value_mm, LengthUnit::Millimeter, LengthUnit::Meter)
}
