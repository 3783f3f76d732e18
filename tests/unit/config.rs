use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg: WorkbenchConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, WorkbenchConfig::default());
    assert_eq!(cfg.window.title, "Generative Art Workbench");
    assert_eq!((cfg.window.width, cfg.window.height), (500, 800));
    assert_eq!(cfg.storage_key, "orders");
    assert_eq!(cfg.error_timeout_ms, 2000);
    assert_eq!(cfg.seed, None);
}

#[test]
fn partial_overrides_keep_other_defaults() {
    let cfg: WorkbenchConfig =
        serde_json::from_str(r#"{"seed": 42, "window": {"height": 600}, "preview": {"width": 64}}"#)
            .unwrap();
    assert_eq!(cfg.seed, Some(42));
    assert_eq!(cfg.window.height, 600);
    assert_eq!(cfg.window.width, 500);
    assert_eq!(cfg.preview, PreviewSize { width: 64, height: 512 });
}

#[test]
fn missing_file_is_an_error() {
    let err = WorkbenchConfig::from_json_file(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(err.to_string().contains("read config"));
}
