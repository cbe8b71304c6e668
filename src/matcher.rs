//! 펌프 매칭.
//!
//! 설계 유량/양정에서 유도한 범위로 카탈로그를 한 번 조회하고, 시나리오가 지정한 정책으로
//! 최대 한 개의 펌프를 고른다. 상태가 없으며 카탈로그를 변경하지 않는다.

use log::debug;

use crate::catalog::{CatalogError, MatchTarget, Pump, PumpCatalog, PumpQuery};
use crate::catalog::query::power_matches;

/// 범위 내 후보가 없을 때 경고에 싣는 고정 메시지.
pub const NO_SUITABLE_PUMP_MESSAGE: &str = "No suitable pump found for the calculated specifications";

/// 후보 선택 정책. 시나리오별로 다르며 통합하지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// 목표점에 가장 가까운 후보 (유량 거리 우선, 동률이면 양정 거리)
    Nearest,
    /// 카탈로그 순서대로 처음으로 유량 >= 목표 && 양정 >= 목표인 후보
    FirstSatisfying,
}

/// 유량/양정 값이 확정된 후보 펌프.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub pump: Pump,
    pub flow_lph: f64,
    pub head_m: f64,
}

impl Candidate {
    /// 유량이나 양정이 비어 있으면 후보가 될 수 없다.
    pub fn from_pump(pump: Pump) -> Option<Self> {
        let flow_lph = pump.flow_rate?;
        let head_m = pump.head?;
        Some(Self {
            pump,
            flow_lph,
            head_m,
        })
    }
}

/// 매칭 요청.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub query: PumpQuery,
    pub policy: SelectionPolicy,
    /// Nearest에서는 정렬 목표, FirstSatisfying에서는 하한 임계값.
    pub target: MatchTarget,
    /// 범위 내 후보가 없을 때 전체 카탈로그에서 최근접 펌프를 제안할지
    pub closest_fallback: bool,
    pub suggestion: String,
}

/// 범위 일치 실패 시 경고.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchWarning {
    pub message: String,
    pub suggestion: String,
    pub closest_match: Option<Candidate>,
}

/// 매칭 결과. `pump`와 `warning` 중 정확히 하나만 채워진다.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub pump: Option<Candidate>,
    pub warning: Option<MatchWarning>,
}

pub struct PumpMatcher<'a> {
    catalog: &'a dyn PumpCatalog,
}

impl<'a> PumpMatcher<'a> {
    pub fn new(catalog: &'a dyn PumpCatalog) -> Self {
        Self { catalog }
    }

    pub fn find(&self, request: &MatchRequest) -> Result<MatchOutcome, CatalogError> {
        let selected = match request.policy {
            SelectionPolicy::Nearest => {
                let found = self.catalog.find_pumps(&request.query, Some(&request.target))?;
                let candidates = into_candidates(found);
                select_nearest(&candidates, &request.target).cloned()
            }
            SelectionPolicy::FirstSatisfying => {
                let found = self.catalog.find_pumps(&request.query, None)?;
                let candidates = into_candidates(found);
                debug!("first-fit 후보 {}건", candidates.len());
                select_first_satisfying(&candidates, &request.target).cloned()
            }
        };

        if let Some(pump) = selected {
            debug!("선정 펌프: id={} {}", pump.pump.id, pump.pump.name);
            return Ok(MatchOutcome {
                pump: Some(pump),
                warning: None,
            });
        }

        let closest_match = if request.closest_fallback {
            let all = self.catalog.list_all()?;
            let pool: Vec<Candidate> = into_candidates(all)
                .into_iter()
                .filter(|c| power_matches(request.query.power, c.pump.power))
                .collect();
            closest_match(&pool, &request.target).cloned()
        } else {
            None
        };

        Ok(MatchOutcome {
            pump: None,
            warning: Some(MatchWarning {
                message: NO_SUITABLE_PUMP_MESSAGE.to_string(),
                suggestion: request.suggestion.clone(),
                closest_match,
            }),
        })
    }
}

fn into_candidates(pumps: Vec<Pump>) -> Vec<Candidate> {
    pumps.into_iter().filter_map(Candidate::from_pump).collect()
}

/// 사전식 (유량 거리, 양정 거리) 최소 후보. 동률이면 먼저 나온 후보를 유지한다.
pub fn select_nearest<'c>(candidates: &'c [Candidate], target: &MatchTarget) -> Option<&'c Candidate> {
    candidates.iter().fold(None, |best: Option<&Candidate>, c| match best {
        Some(b) if target.compare((c.flow_lph, c.head_m), (b.flow_lph, b.head_m)).is_lt() => Some(c),
        Some(b) => Some(b),
        None => Some(c),
    })
}

/// 카탈로그 순서상 처음으로 두 임계값을 모두 만족하는 후보.
pub fn select_first_satisfying<'c>(
    candidates: &'c [Candidate],
    threshold: &MatchTarget,
) -> Option<&'c Candidate> {
    candidates
        .iter()
        .find(|c| c.flow_lph >= threshold.flow_lph && c.head_m >= threshold.head_m)
}

/// (유량, 양정) 평면의 유클리드 최근접 후보. 동률이면 먼저 나온 후보가 이긴다.
pub fn closest_match<'c>(candidates: &'c [Candidate], target: &MatchTarget) -> Option<&'c Candidate> {
    candidates.iter().reduce(|closest, c| {
        if target.distance(c.flow_lph, c.head_m) < target.distance(closest.flow_lph, closest.head_m) {
            c
        } else {
            closest
        }
    })
}
