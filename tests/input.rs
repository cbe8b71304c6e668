//! 입력 레코드 파싱/검증 테스트.
use pump_sizing_toolbox::input::{normalize_choice, parse_number, FieldSpec, ScenarioInput};
use pump_sizing_toolbox::scenario::CalcError;

const AREA: FieldSpec = FieldSpec::number("area", Some("1"), "m²");
const FLOORS: FieldSpec = FieldSpec::number("floors", None, "");
const PARKING: FieldSpec = FieldSpec::non_negative("parkingFloors", Some("0"), "");
const CROP: FieldSpec = FieldSpec::choice("cropType", "cereals");

fn reason_for(err: CalcError) -> (String, String) {
    match err {
        CalcError::InvalidInput { field, reason } => (field, reason),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn localized_digits_and_unit_suffix() {
    assert_eq!(parse_number("1.5"), Some(1.5));
    assert_eq!(parse_number(" 1.5 bar "), Some(1.5));
    assert_eq!(parse_number("۱٫۵"), Some(1.5));
    assert_eq!(parse_number("٢٠"), Some(20.0));
    assert_eq!(parse_number("bar"), None);
    assert_eq!(parse_number(""), None);
}

#[test]
fn numeric_prefix_without_separator() {
    assert_eq!(parse_number("1.5bar"), Some(1.5));
    assert_eq!(parse_number("1.5بار"), Some(1.5));
    assert_eq!(parse_number("۱٫۵بار"), Some(1.5));
    assert_eq!(parse_number("2e1 m"), Some(20.0));
    assert_eq!(parse_number("3.e"), Some(3.0));
    assert_eq!(parse_number("-4kg"), Some(-4.0));
    assert_eq!(parse_number("e5"), None);
    assert_eq!(parse_number(".x"), None);
}

#[test]
fn defaults_apply_when_absent_or_blank() {
    let input = ScenarioInput::new().with("cropType", "  ");
    assert_eq!(input.number(&AREA).expect("default"), 1.0);
    assert_eq!(input.choice(&CROP), "cereals");
}

#[test]
fn required_field_without_default() {
    let (field, _) = reason_for(ScenarioInput::new().number(&FLOORS).expect_err("missing"));
    assert_eq!(field, "floors");
}

#[test]
fn bounds() {
    let zero = ScenarioInput::new().with("area", 0).with("parkingFloors", 0);
    assert!(zero.number(&AREA).is_err());
    assert_eq!(zero.number(&PARKING).expect("zero allowed"), 0.0);

    let negative = ScenarioInput::new().with("parkingFloors", -1);
    assert!(negative.number(&PARKING).is_err());

    let infinite = ScenarioInput::new().with("area", "inf");
    assert!(infinite.number(&AREA).is_err());
    let nan = ScenarioInput::new().with("area", "NaN");
    assert!(nan.number(&AREA).is_err());
}

#[test]
fn choices_are_normalized() {
    assert_eq!(normalize_choice(" Two Sections "), "two_sections");
    assert_eq!(normalize_choice("multi-zone"), "multi_zone");
    let input = ScenarioInput::new().with("cropType", "Orchard");
    assert_eq!(input.choice(&CROP), "orchard");
}

#[test]
fn pairs_and_json() {
    let input = ScenarioInput::from_pairs(["area=250", "cropType = tomato"]).expect("pairs");
    assert_eq!(input.raw("area"), Some("250"));
    assert_eq!(input.raw("cropType"), Some("tomato"));
    assert!(ScenarioInput::from_pairs(["area"]).is_err());

    let json = serde_json::json!({ "area": 250, "cropType": "tomato", "note": null });
    let from_json = ScenarioInput::from_json(&json).expect("json");
    assert_eq!(from_json, input);
    assert!(ScenarioInput::from_json(&serde_json::json!([1, 2])).is_err());
    assert!(ScenarioInput::from_json(&serde_json::json!({ "area": [1] })).is_err());
}

#[test]
fn merge_overrides_existing_keys() {
    let mut base = ScenarioInput::new().with("area", 100).with("cropType", "tomato");
    base.merge(ScenarioInput::new().with("area", 200));
    assert_eq!(base.raw("area"), Some("200"));
    assert_eq!(base.raw("cropType"), Some("tomato"));
}
