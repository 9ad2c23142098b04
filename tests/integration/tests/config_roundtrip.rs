//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! and loaded back with identical field values.

use promptlab_core::config::{Config, MIN_KDF_ITERATIONS};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("promptlab.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.vault.kdf_iterations, MIN_KDF_ITERATIONS);
    assert!(loaded.vault.auto_cleanup);
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("promptlab.json5");

    let mut config = Config::default();
    config.vault.kdf_iterations = 250_000;
    config.vault.auto_cleanup = false;
    config.validation.timeout_secs = 5;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.vault.kdf_iterations, 250_000);
    assert!(!loaded.vault.auto_cleanup);
    assert_eq!(loaded.validation.timeout_secs, 5);
}

#[test]
fn test_config_json5_with_comments() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("promptlab.json5");
    std::fs::write(
        &path,
        r#"{
            // keep the key across sessions
            vault: { auto_cleanup: false },
        }"#,
    )
    .unwrap();

    let loaded = Config::load(&path).unwrap();
    assert!(!loaded.vault.auto_cleanup);
    assert_eq!(loaded.vault.kdf_iterations, MIN_KDF_ITERATIONS);
}

#[test]
fn test_config_rejects_weak_kdf_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("promptlab.json5");
    std::fs::write(&path, r#"{ vault: { kdf_iterations: 1000 } }"#).unwrap();

    assert!(Config::load(&path).is_err());
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/promptlab.json5"));
    assert!(result.is_err());
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json");
    assert!(result.is_err());
}
