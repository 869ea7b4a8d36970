use super::*;
use serde_json::json;

#[test]
fn merge_is_shallow_and_last_writer_wins() {
    let mut base = Parameters::new().with("count", 10.0).with("color", "#ffffff");
    base.merge(&Parameters::new().with("count", 20.0).with("trails", true));
    assert_eq!(base.number("count", 0.0), 20.0);
    assert_eq!(base.text("color", ""), "#ffffff");
    assert!(base.boolean("trails", false));
    assert_eq!(base.len(), 3);
}

#[test]
fn typed_lookups_fall_back_on_mismatch() {
    let p = Parameters::new().with("speed", "fast").with("tint", "#zz0000");
    assert_eq!(p.number("speed", 1.5), 1.5);
    assert_eq!(p.color("tint", Rgba8::WHITE), Rgba8::WHITE);
    assert_eq!(p.color("missing", Rgba8::BLACK), Rgba8::BLACK);
}

#[test]
fn parse_loose_picks_the_narrowest_type() {
    assert_eq!(ParamValue::parse_loose("true"), ParamValue::Bool(true));
    assert_eq!(ParamValue::parse_loose(" 2.5 "), ParamValue::Number(2.5));
    assert_eq!(
        ParamValue::parse_loose("#00ff00"),
        ParamValue::Text("#00ff00".to_owned())
    );
    assert_eq!(
        ParamValue::parse_loose("NaN"),
        ParamValue::Text("NaN".to_owned())
    );
}

#[test]
fn json_shape_is_a_flat_object() {
    let p: Parameters =
        serde_json::from_value(json!({"count": 3, "mode": "grid", "glow": false})).unwrap();
    assert_eq!(p.number("count", 0.0), 3.0);
    assert_eq!(p.text("mode", ""), "grid");
    assert!(!p.boolean("glow", true));
    assert_eq!(
        serde_json::to_value(&p).unwrap(),
        json!({"count": 3.0, "glow": false, "mode": "grid"})
    );
}
