//! 관리자 서비스 및 인증 테스트.
use pump_sizing_toolbox::admin::{
    validate_pump, AdminError, AdminService, AuthError, Authenticator, Role,
    StaticTokenAuthenticator,
};
use pump_sizing_toolbox::app::{run_pump_command, PumpCommand, PumpCommandOutput};
use pump_sizing_toolbox::catalog::{InMemoryCatalog, NewPump, PowerSource, PumpCatalog};

const TOKEN: &str = "s3cret";

fn payload(name: &str) -> NewPump {
    NewPump {
        name: name.into(),
        brand: "Acme".into(),
        flow_rate: Some(1200.0),
        head: Some(22.0),
        power: Some(PowerSource::Electric),
        price: 300.0,
    }
}

fn auth() -> StaticTokenAuthenticator {
    StaticTokenAuthenticator::new(Some(TOKEN.into())).with_user_tokens(["viewer"])
}

#[test]
fn verify_roles() {
    let auth = auth();
    assert_eq!(auth.verify(TOKEN), Ok(Role::Admin));
    assert_eq!(auth.verify(" s3cret "), Ok(Role::Admin));
    assert_eq!(auth.verify("viewer"), Ok(Role::User));
    assert_eq!(auth.verify("nope"), Err(AuthError::Unauthenticated));
    assert_eq!(auth.verify(""), Err(AuthError::Unauthenticated));
}

#[test]
fn no_configured_token_rejects_everything() {
    let auth = StaticTokenAuthenticator::new(None);
    assert_eq!(auth.verify(""), Err(AuthError::Unauthenticated));
    assert_eq!(auth.verify("anything"), Err(AuthError::Unauthenticated));

    let blank = StaticTokenAuthenticator::new(Some("  ".into()));
    assert_eq!(blank.verify("  "), Err(AuthError::Unauthenticated));
}

#[test]
fn writes_require_admin() {
    let store = InMemoryCatalog::new();
    let auth = auth();
    let admin = AdminService::new(&store, &auth);

    let err = admin.add("viewer", payload("P")).expect_err("user token");
    assert!(matches!(err, AdminError::Auth(AuthError::Forbidden)));
    let err = admin.add("wrong", payload("P")).expect_err("bad token");
    assert!(matches!(err, AdminError::Auth(AuthError::Unauthenticated)));
    assert!(store.list_all().expect("list").is_empty());

    let added = admin.add(TOKEN, payload("P")).expect("admin add");
    assert_eq!(added.id, 1);
    assert_eq!(admin.list().expect("list").len(), 1);
}

#[test]
fn update_and_delete_missing_ids() {
    let store = InMemoryCatalog::from_pumps([payload("P")]);
    let auth = auth();
    let admin = AdminService::new(&store, &auth);

    let updated = admin.update(TOKEN, 1, payload("Q")).expect("update");
    assert_eq!(updated.name, "Q");
    assert!(matches!(admin.update(TOKEN, 42, payload("R")), Err(AdminError::NotFound(42))));

    assert_eq!(admin.delete(TOKEN, 1).expect("delete").name, "Q");
    assert!(matches!(admin.delete(TOKEN, 1), Err(AdminError::NotFound(1))));
}

#[test]
fn payload_validation() {
    assert!(validate_pump(&payload("ok")).is_ok());

    let mut blank = payload("  ");
    assert!(matches!(validate_pump(&blank), Err(AdminError::InvalidPump { field: "name", .. })));
    blank.name = "ok".into();
    blank.brand = String::new();
    assert!(matches!(validate_pump(&blank), Err(AdminError::InvalidPump { field: "brand", .. })));

    let mut negative = payload("neg");
    negative.head = Some(-1.0);
    assert!(matches!(validate_pump(&negative), Err(AdminError::InvalidPump { field: "head", .. })));

    let mut nan_price = payload("nan");
    nan_price.price = f64::NAN;
    assert!(matches!(validate_pump(&nan_price), Err(AdminError::InvalidPump { field: "price", .. })));

    let mut unspecified = payload("bare");
    unspecified.flow_rate = None;
    unspecified.head = None;
    unspecified.power = None;
    assert!(validate_pump(&unspecified).is_ok());
}

#[test]
fn stats_count_by_power() {
    let mut universal = payload("U");
    universal.power = None;
    let mut solar = payload("S");
    solar.power = Some(PowerSource::Solar);
    let store = InMemoryCatalog::from_pumps([payload("E1"), payload("E2"), universal, solar]);
    let auth = auth();
    let admin = AdminService::new(&store, &auth);

    let stats = admin.stats().expect("stats");
    assert_eq!(stats.total, 4);
    assert_eq!(stats.by_power.get("electric"), Some(&2));
    assert_eq!(stats.by_power.get("solar"), Some(&1));
    assert_eq!(stats.by_power.get("any"), Some(&1));
}

#[test]
fn pump_commands_render_json() {
    let store = InMemoryCatalog::new();
    let auth = auth();
    let admin = AdminService::new(&store, &auth);

    let output = run_pump_command(
        &admin,
        PumpCommand::Add {
            token: TOKEN.into(),
            pump: payload("CLI"),
        },
    )
    .expect("add");
    assert!(matches!(&output, PumpCommandOutput::Pump(p) if p.name == "CLI"));

    let json: serde_json::Value =
        serde_json::from_str(&run_pump_command(&admin, PumpCommand::List).expect("list").to_json().expect("json"))
            .expect("parse");
    assert_eq!(json[0]["name"], "CLI");
    assert_eq!(json[0]["power"], "electric");
    assert_eq!(json[0]["flow_rate"], 1200.0);

    let err = run_pump_command(
        &admin,
        PumpCommand::Delete {
            token: "viewer".into(),
            id: 1,
        },
    )
    .expect_err("forbidden");
    assert!(err.to_string().contains("관리자 권한"));
}
