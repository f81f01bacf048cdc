use serde_json::json;
use verity_domain::config::{LoggingConfig, RegistryConfig, VerityConfig};

#[test]
fn config_defaults_are_sane() {
    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.console);
    assert!(logging.path.is_none());
    assert_eq!(logging.max_files, 10);

    assert!(RegistryConfig::default().link_handling_default);
}

#[test]
fn verity_config_deserializes() {
    let raw = json!({
        "logging": { "level": "debug", "json": true, "path": "/tmp/verity-logs" },
        "registry": { "link_handling_default": false }
    });

    let cfg: VerityConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.json);
    assert!(cfg.logging.console, "unspecified fields keep their defaults");
    assert_eq!(cfg.logging.path, Some(std::path::PathBuf::from("/tmp/verity-logs")));
    assert!(!cfg.registry.link_handling_default);
}

#[test]
fn empty_document_yields_defaults() {
    let cfg: VerityConfig = serde_json::from_value(json!({})).expect("config deserialize");
    assert_eq!(cfg.logging.level, "info");
    assert!(cfg.registry.link_handling_default);
}
