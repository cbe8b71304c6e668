//! 펌프 매칭 정책 테스트.
use pump_sizing_toolbox::catalog::{
    InMemoryCatalog, MatchTarget, NewPump, PowerSource, Pump, PumpQuery,
};
use pump_sizing_toolbox::matcher::{
    closest_match, select_first_satisfying, select_nearest, Candidate, MatchRequest,
    PumpMatcher, SelectionPolicy, NO_SUITABLE_PUMP_MESSAGE,
};

fn pump(name: &str, flow: f64, head: f64, power: Option<PowerSource>) -> NewPump {
    NewPump {
        name: name.into(),
        brand: "Test".into(),
        flow_rate: Some(flow),
        head: Some(head),
        power,
        price: 100.0,
    }
}

fn candidate(id: i64, flow: f64, head: f64) -> Candidate {
    Candidate::from_pump(pump(&format!("p{id}"), flow, head, None).into_pump(id))
        .expect("flow and head present")
}

fn request(query: PumpQuery, policy: SelectionPolicy, target: MatchTarget, fallback: bool) -> MatchRequest {
    MatchRequest {
        query,
        policy,
        target,
        closest_fallback: fallback,
        suggestion: "call us".into(),
    }
}

fn open_query(power: Option<PowerSource>) -> PumpQuery {
    PumpQuery {
        min_flow_lph: 0.0,
        max_flow_lph: f64::INFINITY,
        min_head_m: 0.0,
        max_head_m: f64::INFINITY,
        power,
    }
}

#[test]
fn nearest_prefers_flow_distance() {
    let target = MatchTarget { flow_lph: 1000.0, head_m: 20.0 };
    let candidates = [candidate(1, 1010.0, 25.0), candidate(2, 995.0, 19.0)];
    let best = select_nearest(&candidates, &target).expect("candidate");
    assert_eq!(best.flow_lph, 995.0);
    assert_eq!(best.head_m, 19.0);
}

#[test]
fn nearest_breaks_flow_ties_by_head() {
    let target = MatchTarget { flow_lph: 1000.0, head_m: 20.0 };
    let candidates = [candidate(1, 1050.0, 40.0), candidate(2, 950.0, 22.0)];
    assert_eq!(select_nearest(&candidates, &target).map(|c| c.pump.id), Some(2));
}

#[test]
fn nearest_flow_dominates_even_when_head_is_far() {
    let target = MatchTarget { flow_lph: 1000.0, head_m: 20.0 };
    let candidates = [candidate(1, 1100.0, 20.0), candidate(2, 1001.0, 80.0)];
    assert_eq!(select_nearest(&candidates, &target).map(|c| c.pump.id), Some(2));
}

#[test]
fn first_satisfying_is_not_best_fit() {
    let threshold = MatchTarget { flow_lph: 1000.0, head_m: 20.0 };
    let candidates = [candidate(1, 800.0, 15.0), candidate(2, 1200.0, 22.0), candidate(3, 1001.0, 20.0)];
    let chosen = select_first_satisfying(&candidates, &threshold).expect("candidate");
    assert_eq!((chosen.flow_lph, chosen.head_m), (1200.0, 22.0));
}

#[test]
fn closest_match_tie_keeps_first_seen() {
    let target = MatchTarget { flow_lph: 1000.0, head_m: 20.0 };
    let candidates = [candidate(7, 1003.0, 24.0), candidate(8, 997.0, 16.0), candidate(9, 2000.0, 20.0)];
    assert_eq!(closest_match(&candidates, &target).map(|c| c.pump.id), Some(7));
    assert!(closest_match(&[], &target).is_none());
}

#[test]
fn pumps_without_flow_or_head_are_never_candidates() {
    let mut p = pump("blank", 0.0, 0.0, None).into_pump(1);
    p.flow_rate = None;
    assert!(Candidate::from_pump(p).is_none());

    let catalog = InMemoryCatalog::from_pumps([NewPump {
        name: "blank".into(),
        brand: "Test".into(),
        flow_rate: None,
        head: Some(10.0),
        power: None,
        price: 0.0,
    }]);
    let target = MatchTarget { flow_lph: 1000.0, head_m: 20.0 };
    let outcome = PumpMatcher::new(&catalog)
        .find(&request(open_query(None), SelectionPolicy::Nearest, target, true))
        .expect("catalog");
    assert!(outcome.pump.is_none());
    let warning = outcome.warning.expect("warning");
    assert!(warning.closest_match.is_none());
}

#[test]
fn range_bounds_are_inclusive() {
    let catalog = InMemoryCatalog::from_pumps([pump("edge", 800.0, 18.0, None)]);
    let query = PumpQuery {
        min_flow_lph: 800.0,
        max_flow_lph: 1200.0,
        min_head_m: 18.0,
        max_head_m: 18.0,
        power: None,
    };
    let target = MatchTarget { flow_lph: 1000.0, head_m: 18.0 };
    let outcome = PumpMatcher::new(&catalog)
        .find(&request(query, SelectionPolicy::Nearest, target, false))
        .expect("catalog");
    assert_eq!(outcome.pump.map(|c| c.pump.name), Some("edge".to_string()));
    assert!(outcome.warning.is_none());
}

#[test]
fn power_filter_is_case_insensitive_and_null_power_is_universal() {
    assert_eq!("SOLAR".parse::<PowerSource>(), Ok(PowerSource::Solar));

    let catalog = InMemoryCatalog::from_pumps([
        pump("electric", 1000.0, 20.0, Some(PowerSource::Electric)),
        pump("any", 1500.0, 30.0, None),
    ]);
    let target = MatchTarget { flow_lph: 1000.0, head_m: 20.0 };
    let outcome = PumpMatcher::new(&catalog)
        .find(&request(
            open_query(Some(PowerSource::Diesel)),
            SelectionPolicy::Nearest,
            target,
            false,
        ))
        .expect("catalog");
    assert_eq!(outcome.pump.map(|c| c.pump.name), Some("any".to_string()));
}

#[test]
fn no_match_without_fallback_returns_bare_warning() {
    let catalog = InMemoryCatalog::from_pumps([pump("small", 100.0, 5.0, None)]);
    let query = PumpQuery {
        min_flow_lph: 800.0,
        max_flow_lph: 1200.0,
        min_head_m: 18.0,
        max_head_m: f64::INFINITY,
        power: None,
    };
    let target = MatchTarget { flow_lph: 1000.0, head_m: 20.0 };
    let outcome = PumpMatcher::new(&catalog)
        .find(&request(query, SelectionPolicy::Nearest, target, false))
        .expect("catalog");
    assert!(outcome.pump.is_none());
    let warning = outcome.warning.expect("warning");
    assert_eq!(warning.message, NO_SUITABLE_PUMP_MESSAGE);
    assert_eq!(warning.suggestion, "call us");
    assert!(warning.closest_match.is_none());
}

#[test]
fn fallback_respects_power_filter_but_ignores_range() {
    let catalog = InMemoryCatalog::from_pumps([
        pump("diesel near", 1001.0, 20.0, Some(PowerSource::Diesel)),
        pump("electric far", 3000.0, 60.0, Some(PowerSource::Electric)),
        pump("electric mid", 2000.0, 40.0, Some(PowerSource::Electric)),
    ]);
    let query = PumpQuery {
        min_flow_lph: 1000.0,
        max_flow_lph: 1200.0,
        min_head_m: 20.0,
        max_head_m: 24.0,
        power: Some(PowerSource::Electric),
    };
    let target = MatchTarget { flow_lph: 1000.0, head_m: 20.0 };
    let outcome = PumpMatcher::new(&catalog)
        .find(&request(query, SelectionPolicy::FirstSatisfying, target, true))
        .expect("catalog");
    assert!(outcome.pump.is_none());
    let closest = outcome
        .warning
        .and_then(|w| w.closest_match)
        .expect("closest match");
    assert_eq!(closest.pump.name, "electric mid");
}

#[test]
fn matching_does_not_mutate_catalog() {
    let catalog = InMemoryCatalog::from_pumps([pump("a", 1000.0, 20.0, None), pump("b", 900.0, 25.0, None)]);
    let before: Vec<Pump> = pumps_of(&catalog);
    let target = MatchTarget { flow_lph: 950.0, head_m: 20.0 };
    for policy in [SelectionPolicy::Nearest, SelectionPolicy::FirstSatisfying] {
        PumpMatcher::new(&catalog)
            .find(&request(open_query(None), policy, target, true))
            .expect("catalog");
    }
    assert_eq!(pumps_of(&catalog), before);
}

fn pumps_of(catalog: &InMemoryCatalog) -> Vec<Pump> {
    use pump_sizing_toolbox::catalog::PumpCatalog;
    catalog.list_all().expect("list")
}

#[test]
fn closest_match_survives_huge_distances() {
    let target = MatchTarget { flow_lph: 1e300, head_m: 20.0 };
    let candidates = [candidate(1, 1.0, 1.0), candidate(2, 1.1e300, 20.0)];
    assert_eq!(closest_match(&candidates, &target).map(|c| c.pump.id), Some(2));
    assert!(target.distance(1.0, 1.0).is_finite());
}
