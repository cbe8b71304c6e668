use serde::{Deserialize, Serialize};

/// 카탈로그 검색 전에 적용하는 안전율.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyFactors {
    pub flow: f64,
    pub head: f64,
}

impl Default for SafetyFactors {
    fn default() -> Self {
        Self {
            flow: 1.15,
            head: 1.10,
        }
    }
}

/// 안전율이 적용된 설계값. 카탈로그 검색에는 이 값을 쓴다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignValues {
    /// 설계 유량 [m3/h]
    pub flow_m3h: f64,
    /// 설계 양정 [m]
    pub head_m: f64,
}

impl SafetyFactors {
    /// 물리 계산이 끝난 값에만 안전율을 곱한다.
    pub fn apply(&self, flow_m3h: f64, total_head_m: f64) -> DesignValues {
        DesignValues {
            flow_m3h: flow_m3h * self.flow,
            head_m: total_head_m * self.head,
        }
    }
}
