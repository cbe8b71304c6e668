use serde::{Deserialize, Serialize};

use crate::units::{convert_flow, FlowUnit};

/// Hazen-Williams 근사식 파라미터.
///
/// 100 m당 손실 = (계수 × Q^유량지수) / (C^유량지수 × D^직경지수)
///
/// 관개용(10.67, 1.852, Q=m3/s, D=m)과 주거용(10400, 1.85, Q=L/s, D=입력값 그대로)은
/// 수치적으로 다른 식이므로 하나로 합치지 않고 각각의 상수 세트로 둔다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazenWilliams {
    pub coefficient: f64,
    pub flow_exponent: f64,
    pub diameter_exponent: f64,
    /// 관 재질 조도계수 C (PVC = 140)
    pub roughness_c: f64,
    /// 식에 대입하는 유량 단위
    pub flow_unit: FlowUnit,
}

impl HazenWilliams {
    /// 관개/온실 계산에 쓰는 SI 형태.
    pub const IRRIGATION: Self = Self {
        coefficient: 10.67,
        flow_exponent: 1.852,
        diameter_exponent: 4.87,
        roughness_c: 140.0,
        flow_unit: FlowUnit::CubicMeterPerSecond,
    };

    /// 주거용 급수 계산에 쓰는 형태.
    pub const RESIDENTIAL: Self = Self {
        coefficient: 10400.0,
        flow_exponent: 1.85,
        diameter_exponent: 4.87,
        roughness_c: 140.0,
        flow_unit: FlowUnit::LiterPerSecond,
    };

    /// 조도계수만 바꾼 사본을 만든다.
    pub fn with_roughness(self, roughness_c: f64) -> Self {
        Self {
            roughness_c,
            ..self
        }
    }

    /// 배관 100 m당 마찰손실 [m].
    pub fn loss_per_100m(&self, flow_m3h: f64, diameter: f64) -> f64 {
        let q = convert_flow(flow_m3h, FlowUnit::CubicMeterPerHour, self.flow_unit);
        (self.coefficient * q.powf(self.flow_exponent))
            / (self.roughness_c.powf(self.flow_exponent) * diameter.powf(self.diameter_exponent))
    }

    /// 배관 전체 길이에 대한 마찰손실 [m].
    pub fn loss_m(&self, flow_m3h: f64, diameter: f64, length_m: f64) -> f64 {
        self.loss_per_100m(flow_m3h, diameter) * length_m / 100.0
    }
}

/// 유속을 고정한 Darcy-Weisbach 근사. 난방/태양광 계산에서 쓴다.
///
/// hf = f × (L/D) × v² / (2g)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedVelocityDarcy {
    pub friction_factor: f64,
    pub diameter_m: f64,
    pub velocity_m_per_s: f64,
    pub gravity_m_per_s2: f64,
}

impl FixedVelocityDarcy {
    pub const fn new(friction_factor: f64) -> Self {
        Self {
            friction_factor,
            diameter_m: 0.05,
            velocity_m_per_s: 1.5,
            gravity_m_per_s2: 9.81,
        }
    }

    pub fn loss_m(&self, length_m: f64) -> f64 {
        self.friction_factor
            * (length_m / self.diameter_m)
            * (self.velocity_m_per_s * self.velocity_m_per_s)
            / (2.0 * self.gravity_m_per_s2)
    }
}
