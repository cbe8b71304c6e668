//! 수리 공식 회귀 테스트.
use std::collections::BTreeMap;

use pump_sizing_toolbox::hydraulics::{
    building_static_head, lookup_factor, multiplicative_flow, offset_static_head,
    pressure_from_head, pressure_head, total_head, FixedVelocityDarcy, HazenWilliams,
    HeadPressureConstants, SafetyFactors,
};
use pump_sizing_toolbox::units::{convert_flow, convert_length, lph_to_m3h, m3h_to_lph, FlowUnit, LengthUnit};

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1e-12);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.9} got {actual:.9} (diff {diff:.3e}, tol {rel_tol})"
    );
}

#[test]
fn hazen_williams_irrigation_variant() {
    // Q = 3.6 m3/h = 0.001 m3/s, D = 50 mm, C = 140
    let hw = HazenWilliams::IRRIGATION;
    let per_100 = hw.loss_per_100m(3.6, 0.05);
    assert_close("per100", per_100, 0.006_816_342_060_2, 1e-6);
    assert_close("200m", hw.loss_m(3.6, 0.05, 200.0), per_100 * 2.0, 1e-12);
}

#[test]
fn hazen_williams_residential_variant_differs() {
    // Q = 3.6 m3/h = 1 L/s, 관경 50 은 입력값 그대로 대입
    let res = HazenWilliams::RESIDENTIAL;
    assert_close("res per100", res.loss_per_100m(3.6, 50.0), 5.925_330_131_19e-9, 1e-6);

    let irr = HazenWilliams::IRRIGATION;
    assert_ne!(res.coefficient, irr.coefficient);
    assert_ne!(res.flow_exponent, irr.flow_exponent);
}

#[test]
fn roughness_override_changes_loss() {
    let pvc = HazenWilliams::IRRIGATION;
    let steel = pvc.with_roughness(120.0);
    assert!(steel.loss_m(10.0, 0.05, 100.0) > pvc.loss_m(10.0, 0.05, 100.0));
    assert_eq!(steel.coefficient, pvc.coefficient);
}

#[test]
fn fixed_velocity_darcy() {
    // 0.025 × (20 / 0.05) × 1.5² / (2 × 9.81)
    let darcy = FixedVelocityDarcy::new(0.025);
    assert_close("hf", darcy.loss_m(20.0), 22.5 / 19.62, 1e-12);
    assert_eq!(darcy.loss_m(0.0), 0.0);
}

#[test]
fn pressure_head_round_trip_uses_separate_constants() {
    let c = HeadPressureConstants::symmetric(0.0981);
    assert_close("head", pressure_head(1.5, &c), 15.290_519_877_675_84, 1e-9);
    assert_close("bar", pressure_from_head(10.0, &c), 0.981, 1e-12);

    let skewed = HeadPressureConstants {
        pressure_to_head_bar_per_m: 0.0981,
        head_to_pressure_bar_per_m: 0.098,
    };
    let head = pressure_head(3.0, &skewed);
    assert!(pressure_from_head(head, &skewed) < 3.0);
}

#[test]
fn total_head_is_a_sum() {
    assert_eq!(total_head(5.0, 1.5, 15.0), 21.5);
}

#[test]
fn static_head_offsets_ignore_unknown_categories() {
    let slope: BTreeMap<String, f64> = [("flat", 0.0), ("steep", 10.0)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    let source: BTreeMap<String, f64> = [("above_field", -5.0), ("below_field", 5.0)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

    assert_eq!(offset_static_head([(&slope, "steep"), (&source, "below_field")]), 15.0);
    assert_eq!(offset_static_head([(&slope, "steep"), (&source, "above_field")]), 5.0);
    assert_eq!(offset_static_head([(&slope, "cliff"), (&source, "unknown")]), 0.0);
}

#[test]
fn building_static_head_counts_parking_floors() {
    assert_close("static", building_static_head(10.0, 2.0, 3.3), 39.6, 1e-12);
    assert_close("no parking", building_static_head(4.0, 0.0, 3.3), 13.2, 1e-12);
}

#[test]
fn multiplicative_flow_is_order_independent() {
    let a = multiplicative_flow(&[7.5, 2.0, 0.8, 1.0, 1.0, 0.5]);
    let b = multiplicative_flow(&[0.5, 1.0, 0.8, 2.0, 7.5, 1.0]);
    assert_close("flow", a, 6.0, 1e-12);
    assert_close("order", a, b, 1e-12);
}

#[test]
fn lookup_falls_back_for_unknown_key() {
    let table: BTreeMap<String, f64> = [("tomato".to_string(), 1.2)].into_iter().collect();
    assert_eq!(lookup_factor(&table, "tomato", 1.0), 1.2);
    assert_eq!(lookup_factor(&table, "lettuce", 1.0), 1.0);
}

#[test]
fn safety_factors_apply_after_physics() {
    let design = SafetyFactors::default().apply(10.0, 20.0);
    assert_close("flow", design.flow_m3h, 11.5, 1e-12);
    assert_close("head", design.head_m, 22.0, 1e-12);
}

#[test]
fn flow_and_length_units() {
    assert_close("lph", m3h_to_lph(1.5), 1500.0, 1e-12);
    assert_close("m3h", lph_to_m3h(1500.0), 1.5, 1e-12);
    assert_close(
        "lps",
        convert_flow(5.0, FlowUnit::LiterPerSecond, FlowUnit::CubicMeterPerHour),
        18.0,
        1e-12,
    );
    assert_close(
        "m3s",
        convert_flow(3.6, FlowUnit::CubicMeterPerHour, FlowUnit::CubicMeterPerSecond),
        0.001,
        1e-12,
    );
    assert_close(
        "mm",
        convert_length(50.0, LengthUnit::Millimeter, LengthUnit::Meter),
        0.05,
        1e-12,
    );
}
