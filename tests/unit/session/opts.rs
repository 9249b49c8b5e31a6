use super::*;

#[test]
fn empty_config_takes_defaults() {
    let opts = EngineOpts::from_json("{}").unwrap();
    assert_eq!(opts, EngineOpts::default());
    assert_eq!(opts.sync.debounce_ms, 2_000);
    assert_eq!(opts.history_depth, DEFAULT_HISTORY_DEPTH);
    assert!(opts.ripple.link_video);
    assert!(!opts.ripple.link_audio);
    assert!(opts.snap.enabled);
}

#[test]
fn partial_sections_keep_sibling_defaults() {
    let opts = EngineOpts::from_json(
        r#"{"sync":{"debounceMs":500},"ripple":{"link_audio":true},"history_depth":5}"#,
    );
    // Field names are snake_case; unknown keys are ignored.
    let opts = opts.unwrap();
    assert_eq!(opts.sync.debounce_ms, 2_000);
    assert!(opts.ripple.link_audio);
    assert!(opts.ripple.link_video);
    assert_eq!(opts.history_depth, 5);
}

#[test]
fn loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reelcut.json");
    std::fs::write(&path, r#"{"sync":{"debounce_ms":250,"backup_dir":"/tmp/rc"}}"#).unwrap();
    let opts = EngineOpts::from_path(&path).unwrap();
    assert_eq!(opts.sync.debounce_ms, 250);
    assert_eq!(
        opts.sync.backup_dir.as_deref(),
        Some(std::path::Path::new("/tmp/rc"))
    );
    assert!(EngineOpts::from_path(&dir.path().join("missing.json")).is_err());
    assert!(EngineOpts::from_json("{not json").is_err());
}
