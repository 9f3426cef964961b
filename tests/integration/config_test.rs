use levelcheck::core::config::Config;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(config.store_path.is_none());
    assert!(!config.state_markers);
    assert_eq!(config.average_backlog_minutes, 15.0);
}

#[test]
fn test_config_load_nonexistent_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_from(&temp_dir.path().join("config.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_corrupt_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "not json at all").unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("levelcheck").join("config.json");

    let mut config = Config::default();
    config.set_store_path("/var/lib/levelcheck/counters.json".to_string());
    config.set_state_markers(true);
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(
        loaded.get_store_path(),
        Some(&"/var/lib/levelcheck/counters.json".to_string())
    );
}
