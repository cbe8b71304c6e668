use serde::{Deserialize, Serialize};

/// 압력 <-> 수두 환산 상수 [bar/m].
///
/// 시나리오마다 값이 다르고(0.0981 / 0.098) 양방향이 정확한 역수도 아니어서
/// 두 방향을 따로 보관한다. 값을 통일하지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadPressureConstants {
    /// 요구 압력(bar)을 수두(m)로 바꿀 때 나누는 값
    pub pressure_to_head_bar_per_m: f64,
    /// 전양정(m)을 압력(bar)으로 바꿀 때 곱하는 값
    pub head_to_pressure_bar_per_m: f64,
}

impl HeadPressureConstants {
    pub const fn symmetric(bar_per_m: f64) -> Self {
        Self {
            pressure_to_head_bar_per_m: bar_per_m,
            head_to_pressure_bar_per_m: bar_per_m,
        }
    }
}

/// 요구 토출 압력(bar)에 해당하는 수두(m).
pub fn pressure_head(pressure_bar: f64, constants: &HeadPressureConstants) -> f64 {
    pressure_bar / constants.pressure_to_head_bar_per_m
}

/// 전양정(m)을 압력(bar)으로 환산한다.
pub fn pressure_from_head(head_m: f64, constants: &HeadPressureConstants) -> f64 {
    head_m * constants.head_to_pressure_bar_per_m
}

/// 전양정 = 정수두 + 마찰손실 + 요구 압력수두
pub fn total_head(static_head_m: f64, friction_loss_m: f64, pressure_head_m: f64) -> f64 {
    static_head_m + friction_loss_m + pressure_head_m
}
