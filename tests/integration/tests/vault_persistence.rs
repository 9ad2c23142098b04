//! Credential vault integration tests.
//!
//! These tests drive the store over real files: a key saved by one store
//! instance is read back by another, and the unload hook erases it.

use promptlab_integration_tests::{file_store, gemini_key, openai_key};
use promptlab_vault::{CredentialConfig, Provider, STORAGE_KEY};
use tempfile::TempDir;

#[tokio::test]
async fn test_saved_key_survives_new_store_instance() {
    let dir = TempDir::new().unwrap();
    let key = gemini_key();

    let writer = file_store(dir.path(), "integration-passphrase");
    let config = CredentialConfig::unverified(Provider::Gemini, key.as_str());
    assert!(writer.save_config(&config).await);

    let reader = file_store(dir.path(), "integration-passphrase");
    let loaded = reader.load_config().await.expect("config should load");
    assert_eq!(loaded.provider, Provider::Gemini);
    assert_eq!(loaded.api_key.expose_secret(), key);
}

#[tokio::test]
async fn test_stored_blob_hides_key() {
    let dir = TempDir::new().unwrap();
    let key = openai_key();

    let store = file_store(dir.path(), "integration-passphrase");
    let config = CredentialConfig::unverified(Provider::OpenAi, key.as_str());
    assert!(store.save_config(&config).await);

    let on_disk = std::fs::read_to_string(dir.path().join(STORAGE_KEY)).unwrap();
    assert!(!on_disk.contains(&key));
    assert!(!on_disk.contains("openai"));
}

#[tokio::test]
async fn test_other_passphrase_reads_nothing() {
    let dir = TempDir::new().unwrap();

    let writer = file_store(dir.path(), "first-passphrase");
    let config = CredentialConfig::unverified(Provider::Gemini, gemini_key());
    assert!(writer.save_config(&config).await);

    let reader = file_store(dir.path(), "second-passphrase");
    assert!(reader.load_config().await.is_none());
}

#[tokio::test]
async fn test_session_end_erases_auto_cleanup_key() {
    let dir = TempDir::new().unwrap();

    let store = file_store(dir.path(), "integration-passphrase");
    let config = CredentialConfig::unverified(Provider::Gemini, gemini_key());
    assert!(store.save_config(&config).await);

    // A later session rehydrates and arms the hook.
    let session = file_store(dir.path(), "integration-passphrase");
    assert!(session.rehydrate().await.is_some());
    assert!(session.auto_cleanup_enabled());
    assert!(session.on_unload().await);

    assert!(session.load_config().await.is_none());
    assert!(!dir.path().join(STORAGE_KEY).exists());
}

#[tokio::test]
async fn test_session_end_keeps_persistent_key() {
    let dir = TempDir::new().unwrap();

    let store = file_store(dir.path(), "integration-passphrase");
    let config =
        CredentialConfig::unverified(Provider::OpenAi, openai_key()).with_auto_cleanup(false);
    assert!(store.save_config(&config).await);

    let session = file_store(dir.path(), "integration-passphrase");
    assert!(session.rehydrate().await.is_some());
    assert!(!session.on_unload().await);
    assert!(session.load_config().await.is_some());
}
