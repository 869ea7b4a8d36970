use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CanvasFxError::construction("x")
            .to_string()
            .contains("construction error:")
    );
    assert!(CanvasFxError::load("x").to_string().contains("load error:"));
    assert!(
        CanvasFxError::module("x")
            .to_string()
            .contains("module error:")
    );
    assert!(
        CanvasFxError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CanvasFxError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CanvasFxError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_construction_is_fatal() {
    assert!(CanvasFxError::construction("no context").is_fatal());
    assert!(!CanvasFxError::load("x").is_fatal());
    assert!(!CanvasFxError::module("x").is_fatal());
}
