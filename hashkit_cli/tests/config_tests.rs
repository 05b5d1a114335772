//! Configuration manager and `hashkit config` behavior

use assert_cmd::Command;
use hashkit_cli::config::ConfigManager;
use hashkit_core::DEEP_WEB_HASH;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn create_test_config_manager(temp_dir: &TempDir) -> ConfigManager {
    ConfigManager::with_path(temp_dir.path().join("config.toml"))
}

#[test]
fn test_set_and_get_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = create_test_config_manager(&temp_dir);

    manager.set("engine.chunk_size", "4096").unwrap();
    manager.set("output.default_format", "JSON").unwrap();

    assert!(temp_dir.path().join("config.toml").exists());
    assert_eq!(manager.get("engine.chunk_size").unwrap(), "4096");
    assert_eq!(manager.get("output.default_format").unwrap(), "json");

    let config = manager.load().unwrap();
    assert_eq!(config.engine.chunk_size, 4096);
}

#[test]
fn test_set_targets_normalizes_hex() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = create_test_config_manager(&temp_dir);

    manager.set("matching.targets", "ABCD, 0011").unwrap();
    assert_eq!(manager.get("matching.targets").unwrap(), "abcd,0011");

    let content = fs::read_to_string(temp_dir.path().join("config.toml")).unwrap();
    assert!(content.contains("[matching]"));
}

#[test]
fn test_invalid_values_are_not_written() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = create_test_config_manager(&temp_dir);

    assert!(manager.set("engine.chunk_size", "0").is_err());
    assert!(manager.set("matching.targets", "xyz").is_err());
    assert!(manager.set("network.timeout_seconds", "5").is_err());
    assert!(!temp_dir.path().join("config.toml").exists());
}

#[test]
fn test_list_includes_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let manager = create_test_config_manager(&temp_dir);

    let items = manager.list().unwrap();
    let keys: Vec<_> = items.iter().map(|(k, _)| k.as_str()).collect();
    assert!(keys.contains(&"engine.memory_limit"));
    assert!(keys.contains(&"output.color_enabled"));
    assert!(items.contains(&("matching.targets".to_string(), DEEP_WEB_HASH.to_string())));
}

#[test]
fn test_unknown_key_errors() {
    let temp_dir = TempDir::new().unwrap();
    let manager = create_test_config_manager(&temp_dir);
    assert!(manager.get("engine.nope").is_err());
}

#[test]
fn test_config_command_uses_xdg_path() {
    let home = TempDir::new().unwrap();

    Command::cargo_bin("hashkit")
        .unwrap()
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "set", "engine.chunk_size", "2048"])
        .assert()
        .success();
    assert!(home.path().join("hashkit").join("config.toml").exists());

    Command::cargo_bin("hashkit")
        .unwrap()
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "get", "engine.chunk_size"])
        .assert()
        .success()
        .stdout("2048\n");

    Command::cargo_bin("hashkit")
        .unwrap()
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hashkit"));
}

#[test]
fn test_config_file_changes_default_format() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("hashkit");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), "[output]\ndefault_format = \"csv\"\n").unwrap();

    let input = home.path().join("input.bin");
    fs::write(&input, b"abc").unwrap();

    Command::cargo_bin("hashkit")
        .unwrap()
        .env("XDG_CONFIG_HOME", home.path())
        .arg("hash")
        .arg(&input)
        .args(["-a", "sha512"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("source,size,algorithm,digest"));
}

#[test]
fn test_env_overrides_file() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("input.bin");
    fs::write(&input, b"abc").unwrap();

    Command::cargo_bin("hashkit")
        .unwrap()
        .env("XDG_CONFIG_HOME", home.path())
        .env("HASHKIT_OUTPUT__DEFAULT_FORMAT", "json")
        .arg("hash")
        .arg(&input)
        .args(["-a", "sha512"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));
}
