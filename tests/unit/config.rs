use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg = GalleryConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, GalleryConfig::default());
    assert_eq!(cfg.hover.max_concurrent, 3);
    assert_eq!(cfg.engine.fps_window_ms, 1000.0);
}

#[test]
fn partial_sections_merge_with_defaults() {
    let cfg = GalleryConfig::from_json_str(
        r#"{
            "engine": {"device": {"cpu_cores": 2, "user_agent": "Mozilla/5.0 (iPhone)"}},
            "hover": {"max_concurrent": 5},
            "pool": {"max_idle": 32}
        }"#,
    )
    .unwrap();
    let device = cfg.engine.device.as_ref().unwrap();
    assert!(device.is_low_end());
    assert_eq!(cfg.engine.degraded_below_fps, 30);
    assert_eq!(cfg.hover.max_concurrent, 5);
    assert_eq!(cfg.pool.max_idle, 32);
    assert_eq!(cfg.pool.max_idle_per_size, PixmapPoolOpts::default().max_idle_per_size);
}

#[test]
fn invalid_values_are_rejected() {
    for bad in [
        r#"{"hover": {"max_concurrent": 0}}"#,
        r#"{"engine": {"fps_window_ms": 0}}"#,
        r#"{"pool": {"max_idle": 1, "max_idle_per_size": 2}}"#,
        r#"{"engine": {"device": {"device_memory_gb": -1}}}"#,
    ] {
        let err = GalleryConfig::from_json_str(bad).unwrap_err();
        assert!(matches!(err, CanvasFxError::Validation(_)), "{bad}: {err}");
    }
}

#[test]
fn malformed_json_is_a_serde_error() {
    for bad in ["{", r#"{"unknown": 1}"#, r#"{"hover": {"max_concurrent": "x"}}"#] {
        let err = GalleryConfig::from_json_str(bad).unwrap_err();
        assert!(matches!(err, CanvasFxError::Serde(_)), "{bad}: {err}");
    }
}

#[test]
fn from_path_reads_files_and_reports_missing_ones() {
    let dir = std::env::temp_dir().join(format!("canvasfx-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("gallery.json");
    std::fs::write(&path, r#"{"hover": {"max_concurrent": 2}}"#).unwrap();
    assert_eq!(GalleryConfig::from_path(&path).unwrap().hover.max_concurrent, 2);

    let missing = GalleryConfig::from_path(dir.join("nope.json")).unwrap_err();
    assert!(missing.to_string().contains("nope.json"));
    let _ = std::fs::remove_dir_all(&dir);
}
