use std::fs;
use tempfile::TempDir;
use umrah::utils::toml_config::{ConfigError, RuntimeMode};
use umrah::ConfigManager;

fn write_config(dir: &TempDir, key_env: &str, port: u16) -> std::path::PathBuf {
    let path = dir.path().join("umrah.toml");
    fs::write(
        &path,
        format!(
            r#"
[server]
port = {port}

[auth]
api_key_env = "{key_env}"

[planner]
min_advance_days = 14
"#
        ),
    )
    .unwrap();
    path
}

#[test]
fn test_manager_loads_file() {
    std::env::set_var("UMRAH_CONFIG_TEST_LOAD", "k");
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "UMRAH_CONFIG_TEST_LOAD", 4100);

    let manager = ConfigManager::new(&path).unwrap();
    let config = manager.config();
    assert_eq!(config.server.port, 4100);
    assert_eq!(config.planner.min_advance_days, 14);
    assert_eq!(config.runtime.mode, RuntimeMode::Local);
    assert_eq!(manager.path(), path.as_path());
}

#[test]
fn test_reload_picks_up_changes() {
    std::env::set_var("UMRAH_CONFIG_TEST_RELOAD", "k");
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "UMRAH_CONFIG_TEST_RELOAD", 4100);
    let manager = ConfigManager::new(&path).unwrap();

    write_config(&dir, "UMRAH_CONFIG_TEST_RELOAD", 4200);
    manager.reload().unwrap();
    assert_eq!(manager.config().server.port, 4200);
}

#[test]
fn test_invalid_reload_keeps_previous_config() {
    std::env::set_var("UMRAH_CONFIG_TEST_BAD_RELOAD", "k");
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "UMRAH_CONFIG_TEST_BAD_RELOAD", 4100);
    let manager = ConfigManager::new(&path).unwrap();

    fs::write(&path, "[server\nport = ").unwrap();
    assert!(matches!(manager.reload(), Err(ConfigError::ParseError(_))));
    assert_eq!(manager.config().server.port, 4100);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = ConfigManager::new(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(_)));
}

#[test]
fn test_missing_api_key_env_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "UMRAH_CONFIG_TEST_NEVER_SET", 4100);
    assert!(ConfigManager::new(&path).is_err());
}
