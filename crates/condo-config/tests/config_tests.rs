use condo_config::{Config, ConfigError, ConfigManager, UnroutablePolicy};
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert!(!cfg.locale.is_empty());
    assert!(!cfg.api_base_url.is_empty());
    assert!(!cfg.generic_error_message.is_empty());
    assert_eq!(cfg.unroutable_issues, UnroutablePolicy::Warn);
    assert!(cfg.request_timeout_secs.is_none());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.api_base_url, Config::default_api_base_url());
    assert!(!manager.config_path().exists());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let cfg = Config {
        api_base_url: "https://condo.example.com/api".into(),
        unroutable_issues: UnroutablePolicy::Drop,
        organization_id: Some("org-42".into()),
        request_timeout_secs: Some(20),
        ..Config::default()
    };

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.api_base_url, "https://condo.example.com/api");
    assert_eq!(loaded.unroutable_issues, UnroutablePolicy::Drop);
    assert_eq!(loaded.organization_id.as_deref(), Some("org-42"));
    assert_eq!(loaded.request_timeout_secs, Some(20));
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn save_refuses_invalid_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    let cfg = Config {
        generic_error_message: "   ".into(),
        ..Config::default()
    };

    let err = manager.save(&cfg).unwrap_err();

    assert!(matches!(
        err,
        ConfigError::Invalid {
            key: "generic_error_message",
            ..
        }
    ));
    assert!(!manager.config_path().exists());
}

#[test]
fn corrupt_file_reports_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").expect("write");

    let err = ConfigManager::new(path).load().unwrap_err();

    assert!(matches!(err, ConfigError::Serde(_)));
}
