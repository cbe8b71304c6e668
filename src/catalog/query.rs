use std::cmp::Ordering;

use super::{PowerSource, Pump};

/// 카탈로그 범위 조회 조건. 유량은 카탈로그 저장 단위(L/h)이다.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpQuery {
    pub min_flow_lph: f64,
    pub max_flow_lph: f64,
    pub min_head_m: f64,
    /// 상한이 없으면 `f64::INFINITY`
    pub max_head_m: f64,
    pub power: Option<PowerSource>,
}

impl PumpQuery {
    /// 유량/양정이 모두 있고 범위(양 끝 포함)와 동력원 조건을 만족하는지.
    pub fn matches(&self, pump: &Pump) -> bool {
        let (Some(flow), Some(head)) = (pump.flow_rate, pump.head) else {
            return false;
        };
        flow >= self.min_flow_lph
            && flow <= self.max_flow_lph
            && head >= self.min_head_m
            && head <= self.max_head_m
            && power_matches(self.power, pump.power)
    }
}

/// 요청 동력원 필터. NULL 동력원 펌프는 항상 일치한다.
pub fn power_matches(requested: Option<PowerSource>, pump_power: Option<PowerSource>) -> bool {
    match (requested, pump_power) {
        (None, _) | (_, None) => true,
        (Some(req), Some(p)) => req == p,
    }
}

/// 최적 선택 또는 임계값 비교에 쓰는 목표점 (L/h, m).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchTarget {
    pub flow_lph: f64,
    pub head_m: f64,
}

impl MatchTarget {
    /// 유량 거리를 먼저 비교하고, 같을 때만 양정 거리를 비교한다.
    /// 두 거리를 하나의 스칼라로 합치지 않는다.
    pub fn compare(&self, a: (f64, f64), b: (f64, f64)) -> Ordering {
        let flow_a = (a.0 - self.flow_lph).abs();
        let flow_b = (b.0 - self.flow_lph).abs();
        flow_a.total_cmp(&flow_b).then_with(|| {
            let head_a = (a.1 - self.head_m).abs();
            let head_b = (b.1 - self.head_m).abs();
            head_a.total_cmp(&head_b)
        })
    }

    /// (유량, 양정) 평면의 유클리드 거리. 제곱 합이 넘치지 않도록 `hypot`을 쓴다.
    pub fn distance(&self, flow_lph: f64, head_m: f64) -> f64 {
        (flow_lph - self.flow_lph).hypot(head_m - self.head_m)
    }
}

/// 후보를 목표에 가까운 순서로 안정 정렬한다. 동순위는 카탈로그 순서를 유지한다.
pub fn rank_nearest(pumps: &mut [Pump], target: &MatchTarget) {
    pumps.sort_by(|a, b| {
        target.compare(
            (a.flow_rate.unwrap_or(f64::INFINITY), a.head.unwrap_or(f64::INFINITY)),
            (b.flow_rate.unwrap_or(f64::INFINITY), b.head.unwrap_or(f64::INFINITY)),
        )
    });
}
