//! 카탈로그 저장소 테스트 (메모리, SQLite).
use pump_sizing_toolbox::catalog::{
    parse_seed, InMemoryCatalog, MatchTarget, NewPump, PowerSource, PumpCatalog, PumpQuery,
    PumpStore, SqliteCatalog, UNIVERSAL_POWER_LABEL,
};

const SEED: &str = r#"
[[pump]]
name = "A"
brand = "Acme"
flow_rate = 1000.0
head = 20.0
power = "electric"
price = 100.0

[[pump]]
name = "B"
brand = "Acme"
flow_rate = 1010.0
head = 25.0
power = "solar"
price = 150.0

[[pump]]
name = "C"
brand = "Other"
flow_rate = 995.0
head = 19.0
price = 90.0

[[pump]]
name = "D"
brand = "Other"
price = 10.0
"#;

fn band(power: Option<PowerSource>) -> PumpQuery {
    PumpQuery {
        min_flow_lph: 900.0,
        max_flow_lph: 1100.0,
        min_head_m: 18.0,
        max_head_m: f64::INFINITY,
        power,
    }
}

fn sqlite_with_seed() -> SqliteCatalog {
    let catalog = SqliteCatalog::in_memory().expect("open");
    let inserted = catalog.seed_if_empty(parse_seed(SEED).expect("seed")).expect("seed insert");
    assert_eq!(inserted, 4);
    catalog
}

fn stores() -> Vec<(&'static str, Box<dyn PumpStore>)> {
    vec![
        (
            "memory",
            Box::new(InMemoryCatalog::from_pumps(parse_seed(SEED).expect("seed"))),
        ),
        ("sqlite", Box::new(sqlite_with_seed())),
    ]
}

#[test]
fn seed_parses_optional_fields() {
    let pumps = parse_seed(SEED).expect("seed");
    assert_eq!(pumps.len(), 4);
    assert_eq!(pumps[2].power, None);
    assert_eq!(pumps[3].flow_rate, None);
    assert!(parse_seed("[[pump]]\nname = 1").is_err());
}

#[test]
fn range_query_filters_power_and_nulls() {
    for (label, store) in stores() {
        let names = |power| -> Vec<String> {
            store
                .find_pumps(&band(power), None)
                .expect("query")
                .into_iter()
                .map(|p| p.name)
                .collect()
        };
        assert_eq!(names(None), vec!["A", "B", "C"], "{label}");
        assert_eq!(names(Some(PowerSource::Electric)), vec!["A", "C"], "{label}");
        assert_eq!(names(Some(PowerSource::Diesel)), vec!["C"], "{label}");
    }
}

#[test]
fn best_match_is_single_lexicographic_nearest() {
    let target = MatchTarget { flow_lph: 1000.0, head_m: 20.0 };
    for (label, store) in stores() {
        let found = store.find_pumps(&band(Some(PowerSource::Solar)), Some(&target)).expect("query");
        // A(electric) 제외, B(1010) 와 C(995, 범용) 중 유량 거리가 작은 C
        assert_eq!(found.len(), 1, "{label}");
        assert_eq!(found[0].name, "C", "{label}");
    }
}

#[test]
fn crud_round() {
    for (label, store) in stores() {
        let added = store
            .add(NewPump {
                name: "E".into(),
                brand: "New".into(),
                flow_rate: Some(2000.0),
                head: Some(30.0),
                power: Some(PowerSource::Diesel),
                price: 500.0,
            })
            .expect("add");
        assert_eq!(added.id, 5, "{label}");

        let updated = store
            .update(
                added.id,
                NewPump {
                    name: "E2".into(),
                    brand: "New".into(),
                    flow_rate: Some(2100.0),
                    head: Some(31.0),
                    power: None,
                    price: 520.0,
                },
            )
            .expect("update")
            .expect("exists");
        assert_eq!(updated.name, "E2", "{label}");
        assert!(store.update(999, updated_payload()).expect("update").is_none(), "{label}");

        let deleted = store.delete(added.id).expect("delete").expect("exists");
        assert_eq!(deleted.name, "E2", "{label}");
        assert!(store.delete(added.id).expect("delete").is_none(), "{label}");
        assert_eq!(store.list_all().expect("list").len(), 4, "{label}");
    }
}

fn updated_payload() -> NewPump {
    NewPump {
        name: "X".into(),
        brand: "X".into(),
        flow_rate: None,
        head: None,
        power: None,
        price: 0.0,
    }
}

#[test]
fn count_by_power_groups_universal_pumps() {
    for (label, store) in stores() {
        let counts = store.count_by_power().expect("counts");
        assert_eq!(counts.get("electric"), Some(&1), "{label}");
        assert_eq!(counts.get("solar"), Some(&1), "{label}");
        assert_eq!(counts.get(UNIVERSAL_POWER_LABEL), Some(&2), "{label}");
        assert_eq!(counts.get("diesel"), None, "{label}");
    }
}

#[test]
fn sqlite_seed_only_fills_empty_table() {
    let catalog = sqlite_with_seed();
    let again = catalog.seed_if_empty(parse_seed(SEED).expect("seed")).expect("seed");
    assert_eq!(again, 0);
    assert_eq!(catalog.list_all().expect("list").len(), 4);
}

#[test]
fn sqlite_file_persists_between_opens() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("catalog").join("pumps.sqlite3");
    {
        let catalog = SqliteCatalog::open(&path).expect("open");
        catalog.seed_if_empty(parse_seed(SEED).expect("seed")).expect("seed");
    }
    let reopened = SqliteCatalog::open(&path).expect("reopen");
    let names: Vec<String> = reopened.list_all().expect("list").into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["A", "B", "C", "D"]);
}
