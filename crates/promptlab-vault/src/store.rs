//! The secure credential store.
//!
//! [`SecureStorage`] keeps one [`CredentialConfig`] encrypted under
//! [`STORAGE_KEY`]. Its public operations never fail loudly: storage,
//! crypto and parse errors are logged and turned into `None` or `false`, so
//! callers treat a broken store exactly like a first run.

use std::sync::Arc;

use promptlab_core::{Config, SecretString};
use tracing::{debug, info, warn};

use crate::cleanup::AutoCleanup;
use crate::crypto::{self, KdfParams};
use crate::error::{Result, VaultError};
use crate::passphrase;
use crate::storage::{FileStorage, KeyValueStorage};
use crate::types::CredentialConfig;

/// Fixed slot the credential lives under.
pub const STORAGE_KEY: &str = "ai-prompt-improver-secure-config";

/// Encrypted single-slot credential store.
///
/// Cloning is cheap and clones share the same backend and auto-cleanup
/// registration.
#[derive(Clone)]
pub struct SecureStorage {
    storage: Arc<dyn KeyValueStorage>,
    passphrase: Arc<SecretString>,
    kdf: KdfParams,
    cleanup: Arc<AutoCleanup>,
}

impl SecureStorage {
    /// Create a store over `storage` using `passphrase` and default KDF params.
    pub fn new(storage: Arc<dyn KeyValueStorage>, passphrase: SecretString) -> Self {
        Self {
            storage,
            passphrase: Arc::new(passphrase),
            kdf: KdfParams::default(),
            cleanup: Arc::new(AutoCleanup::new()),
        }
    }

    /// Override the key derivation parameters.
    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    /// Build the file-backed store described by `config`.
    ///
    /// The passphrase comes from [`passphrase::resolve_passphrase`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage_dir = config
            .storage_dir()
            .map_err(|e| VaultError::Storage(e.to_string()))?;
        let key_file = promptlab_core::paths::passphrase_file()
            .map_err(|e| VaultError::Passphrase(e.to_string()))?;

        let kdf = KdfParams::new(config.vault.kdf_iterations)?;
        let passphrase = passphrase::resolve_passphrase(&key_file)?;

        debug!(
            dir = %storage_dir.display(),
            iterations = kdf.iterations(),
            "opening credential store"
        );
        Ok(Self::new(Arc::new(FileStorage::new(storage_dir)), passphrase).with_kdf(kdf))
    }

    /// Encrypt `plaintext` into a storage blob. `None` on failure.
    pub async fn encrypt(&self, plaintext: &str) -> Option<String> {
        self.try_encrypt(plaintext)
            .await
            .map_err(|e| warn!("encryption failed: {e}"))
            .ok()
    }

    /// Decrypt a storage blob. `None` on corrupt input or wrong passphrase.
    pub async fn decrypt(&self, blob: &str) -> Option<String> {
        self.try_decrypt(blob)
            .await
            .map_err(|e| debug!("decryption failed: {e}"))
            .ok()
    }

    async fn try_encrypt(&self, plaintext: &str) -> Result<String> {
        let passphrase = Arc::clone(&self.passphrase);
        let plaintext = SecretString::new(plaintext);
        let kdf = self.kdf;

        tokio::task::spawn_blocking(move || {
            crypto::encrypt(
                passphrase.expose_secret().as_bytes(),
                plaintext.expose_secret(),
                kdf,
            )
        })
        .await
        .map_err(|e| VaultError::EncryptionFailed(format!("crypto task failed: {e}")))?
    }

    async fn try_decrypt(&self, blob: &str) -> Result<String> {
        let passphrase = Arc::clone(&self.passphrase);
        let blob = blob.to_string();
        let kdf = self.kdf;

        tokio::task::spawn_blocking(move || {
            crypto::decrypt(passphrase.expose_secret().as_bytes(), &blob, kdf)
        })
        .await
        .map_err(|e| VaultError::DecryptionFailed(format!("crypto task failed: {e}")))?
    }

    /// Encrypt and persist `config`, replacing any stored one.
    ///
    /// Returns `false` without touching storage when the key does not match
    /// the provider's format, and `false` with the previous value intact
    /// when encryption or the write fails.
    pub async fn save_config(&self, config: &CredentialConfig) -> bool {
        if !config.has_valid_format() {
            warn!(
                provider = %config.provider,
                "refusing to store key that does not match the provider format"
            );
            return false;
        }

        match self.try_save(config).await {
            Ok(()) => {
                info!(
                    provider = %config.provider,
                    key = %config.masked_key(),
                    "credential saved"
                );
                true
            }
            Err(e) => {
                warn!(provider = %config.provider, "failed to save credential: {e}");
                false
            }
        }
    }

    async fn try_save(&self, config: &CredentialConfig) -> Result<()> {
        let json = SecretString::new(serde_json::to_string(config)?);
        let blob = self.try_encrypt(json.expose_secret()).await?;
        self.storage.set(STORAGE_KEY, &blob).await
    }

    /// Load and decrypt the stored config.
    ///
    /// `None` when nothing is stored or the stored blob cannot be read back.
    pub async fn load_config(&self) -> Option<CredentialConfig> {
        match self.try_load().await {
            Ok(config) => config,
            Err(e) => {
                warn!("failed to load credential: {e}");
                None
            }
        }
    }

    async fn try_load(&self) -> Result<Option<CredentialConfig>> {
        let Some(blob) = self.storage.get(STORAGE_KEY).await? else {
            return Ok(None);
        };

        let json = SecretString::new(self.try_decrypt(&blob).await?);
        let config = serde_json::from_str(json.expose_secret())?;
        Ok(Some(config))
    }

    /// Remove the stored config. Safe to call when nothing is stored.
    ///
    /// Returns `false` if the backend could not remove it.
    pub async fn clear_config(&self) -> bool {
        match self.storage.remove(STORAGE_KEY).await {
            Ok(()) => {
                debug!("credential cleared");
                true
            }
            Err(e) => {
                warn!("failed to clear credential: {e}");
                false
            }
        }
    }

    /// Arm erase-on-unload. Returns `true` only on the first registration.
    pub fn enable_auto_cleanup(&self) -> bool {
        let registered = self.cleanup.register();
        if registered {
            debug!("auto-cleanup registered");
        }
        registered
    }

    /// Disarm erase-on-unload. Returns `true` if it was armed.
    pub fn disable_auto_cleanup(&self) -> bool {
        self.cleanup.cancel()
    }

    pub fn auto_cleanup_enabled(&self) -> bool {
        self.cleanup.is_registered()
    }

    /// The unload event: clears the stored config if auto-cleanup is armed.
    ///
    /// Returns `true` only if the hook fired and the config was erased. A
    /// failed erase leaves the hook armed so the caller can retry.
    pub async fn on_unload(&self) -> bool {
        if !self.cleanup.take() {
            return false;
        }
        info!("session ending, erasing stored credential");
        if self.clear_config().await {
            return true;
        }
        self.cleanup.register();
        false
    }

    /// Load the stored config at session start, arming auto-cleanup when the
    /// config asks for it.
    pub async fn rehydrate(&self) -> Option<CredentialConfig> {
        let config = self.load_config().await?;
        if config.auto_cleanup {
            self.enable_auto_cleanup();
        }
        Some(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::types::Provider;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn gemini_key() -> String {
        format!("AIza{}", "Xy9_-".repeat(7))
    }

    fn openai_key() -> String {
        format!("sk-{}", "AbC123".repeat(8))
    }

    fn test_store() -> (SecureStorage, Arc<MemoryStorage>) {
        let backend = Arc::new(MemoryStorage::new());
        let store = SecureStorage::new(backend.clone(), SecretString::new("test-passphrase"));
        (store, backend)
    }

    fn validated_config() -> CredentialConfig {
        let tested_at = Utc.with_ymd_and_hms(2024, 3, 9, 8, 30, 0).unwrap();
        CredentialConfig::validated(Provider::Gemini, gemini_key(), tested_at)
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let (store, _backend) = test_store();
        let config = validated_config();

        assert!(store.save_config(&config).await);
        assert_eq!(store.load_config().await, Some(config));
    }

    #[tokio::test]
    async fn test_round_trip_without_optional_fields() {
        let (store, _backend) = test_store();
        let config = CredentialConfig::unverified(Provider::OpenAi, openai_key())
            .with_auto_cleanup(false);

        assert!(store.save_config(&config).await);
        assert_eq!(store.load_config().await, Some(config));
    }

    #[tokio::test]
    async fn test_stored_blob_has_no_plaintext() {
        let (store, backend) = test_store();
        store.save_config(&validated_config()).await;

        let blob = backend.get(STORAGE_KEY).await.unwrap().unwrap();
        assert!(!blob.contains(&gemini_key()));
        assert!(!blob.contains("provider"));
        assert!(STANDARD.decode(&blob).is_ok());
    }

    #[tokio::test]
    async fn test_save_overwrites_single_slot() {
        let (store, _backend) = test_store();
        store.save_config(&validated_config()).await;

        let replacement = CredentialConfig::unverified(Provider::OpenAi, openai_key());
        assert!(store.save_config(&replacement).await);
        assert_eq!(store.load_config().await, Some(replacement));
    }

    #[tokio::test]
    async fn test_encrypt_is_not_deterministic() {
        let (store, _backend) = test_store();
        let a = store.encrypt("same plaintext").await.unwrap();
        let b = store.encrypt("same plaintext").await.unwrap();

        assert_ne!(a, b);
        assert_eq!(store.decrypt(&a).await.as_deref(), Some("same plaintext"));
        assert_eq!(store.decrypt(&b).await.as_deref(), Some("same plaintext"));
    }

    #[tokio::test]
    async fn test_decrypt_garbage_is_none() {
        let (store, _backend) = test_store();
        assert_eq!(store.decrypt("definitely not a blob").await, None);
        assert_eq!(store.encrypt("").await, None);
    }

    #[tokio::test]
    async fn test_tampered_blob_loads_as_none() {
        let (store, backend) = test_store();
        store.save_config(&validated_config()).await;

        let blob = backend.get(STORAGE_KEY).await.unwrap().unwrap();
        let raw = STANDARD.decode(&blob).unwrap();

        for idx in [0, 20, raw.len() / 2, raw.len() - 1] {
            let mut tampered = raw.clone();
            tampered[idx] ^= 0x80;
            backend
                .set(STORAGE_KEY, &STANDARD.encode(&tampered))
                .await
                .unwrap();
            assert_eq!(store.load_config().await, None, "byte {idx} tampered");
        }
    }

    #[tokio::test]
    async fn test_wrong_passphrase_loads_as_none() {
        let (store, backend) = test_store();
        store.save_config(&validated_config()).await;

        let other = SecureStorage::new(backend, SecretString::new("another-passphrase"));
        assert_eq!(other.load_config().await, None);
    }

    #[tokio::test]
    async fn test_malformed_json_loads_as_none() {
        let (store, backend) = test_store();
        let blob = store.encrypt("{\"provider\": 42}").await.unwrap();
        backend.set(STORAGE_KEY, &blob).await.unwrap();

        assert_eq!(store.load_config().await, None);
    }

    #[tokio::test]
    async fn test_empty_store_loads_as_none() {
        let (store, _backend) = test_store();
        assert_eq!(store.load_config().await, None);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let (store, _backend) = test_store();
        assert!(store.clear_config().await);
        assert_eq!(store.load_config().await, None);

        store.save_config(&validated_config()).await;
        assert!(store.clear_config().await);
        assert!(store.clear_config().await);
        assert_eq!(store.load_config().await, None);
    }

    #[tokio::test]
    async fn test_invalid_format_is_never_written() {
        let (store, backend) = test_store();
        let bad = CredentialConfig::unverified(Provider::Gemini, "AIzaShort");

        assert!(!store.save_config(&bad).await);
        assert_eq!(backend.get(STORAGE_KEY).await.unwrap(), None);

        // Gemini-shaped key under the OpenAI provider is rejected too.
        let mismatched = CredentialConfig::unverified(Provider::OpenAi, gemini_key());
        assert!(!store.save_config(&mismatched).await);
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_previous_config() {
        let (store, backend) = test_store();
        let original = validated_config();
        store.save_config(&original).await;

        backend.set_failing(true);
        let replacement = CredentialConfig::unverified(Provider::OpenAi, openai_key());
        assert!(!store.save_config(&replacement).await);
        assert!(!store.clear_config().await);

        backend.set_failing(false);
        assert_eq!(store.load_config().await, Some(original));
    }

    #[tokio::test]
    async fn test_auto_cleanup_on_unload() {
        let (store, _backend) = test_store();
        store.save_config(&validated_config()).await;

        assert!(store.enable_auto_cleanup());
        assert!(!store.enable_auto_cleanup());
        assert!(store.auto_cleanup_enabled());

        assert!(store.on_unload().await);
        assert_eq!(store.load_config().await, None);
        assert!(!store.on_unload().await);
    }

    #[tokio::test]
    async fn test_failed_unload_erase_reports_and_stays_armed() {
        let (store, backend) = test_store();
        let config = validated_config();
        store.save_config(&config).await;
        store.enable_auto_cleanup();

        backend.set_failing(true);
        assert!(!store.on_unload().await);
        assert!(store.auto_cleanup_enabled());

        backend.set_failing(false);
        assert_eq!(store.load_config().await, Some(config));
        assert!(store.on_unload().await);
        assert_eq!(store.load_config().await, None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_file_saves_last_write_wins() {
        let tmp = TempDir::new().unwrap();
        let backend = Arc::new(FileStorage::new(tmp.path().join("storage")));
        let store = SecureStorage::new(backend, SecretString::new("file-passphrase"));

        let configs: Vec<CredentialConfig> = (0..8)
            .map(|i| {
                let key = format!("sk-{}{:02}xxxx", "AbC123".repeat(7), i);
                CredentialConfig::unverified(Provider::OpenAi, key)
            })
            .collect();

        let handles: Vec<_> = configs
            .iter()
            .cloned()
            .map(|config| {
                let store = store.clone();
                tokio::spawn(async move { store.save_config(&config).await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        let loaded = store.load_config().await.unwrap();
        assert!(configs.contains(&loaded));
    }

    #[tokio::test]
    async fn test_unload_without_registration_keeps_config() {
        let (store, _backend) = test_store();
        let config = validated_config();
        store.save_config(&config).await;

        assert!(!store.on_unload().await);
        assert_eq!(store.load_config().await, Some(config));
    }

    #[tokio::test]
    async fn test_disable_auto_cleanup() {
        let (store, _backend) = test_store();
        store.save_config(&validated_config()).await;

        store.enable_auto_cleanup();
        assert!(store.disable_auto_cleanup());
        assert!(!store.on_unload().await);
        assert!(store.load_config().await.is_some());
    }

    #[tokio::test]
    async fn test_clones_share_cleanup_registration() {
        let (store, _backend) = test_store();
        store.save_config(&validated_config()).await;

        let handle = store.clone();
        assert!(handle.enable_auto_cleanup());
        assert!(!store.enable_auto_cleanup());
        assert!(store.on_unload().await);
        assert_eq!(handle.load_config().await, None);
    }

    #[tokio::test]
    async fn test_rehydrate_arms_cleanup_when_requested() {
        let (store, _backend) = test_store();
        store.save_config(&validated_config()).await;

        let loaded = store.rehydrate().await.unwrap();
        assert!(loaded.auto_cleanup);
        assert!(store.auto_cleanup_enabled());
    }

    #[tokio::test]
    async fn test_rehydrate_respects_disabled_cleanup() {
        let (store, _backend) = test_store();
        let config = validated_config().with_auto_cleanup(false);
        store.save_config(&config).await;

        assert_eq!(store.rehydrate().await, Some(config));
        assert!(!store.auto_cleanup_enabled());
    }

    #[tokio::test]
    async fn test_file_backed_round_trip() {
        let tmp = TempDir::new().unwrap();
        let backend = Arc::new(FileStorage::new(tmp.path().join("storage")));
        let store = SecureStorage::new(backend, SecretString::new("file-passphrase"));
        let config = validated_config();

        assert!(store.save_config(&config).await);

        let on_disk =
            std::fs::read_to_string(tmp.path().join("storage").join(STORAGE_KEY)).unwrap();
        assert!(!on_disk.contains(&gemini_key()));
        assert_eq!(store.load_config().await, Some(config));
    }

    #[tokio::test]
    async fn test_custom_kdf_must_match() {
        let (store, backend) = test_store();
        let stronger = store.clone().with_kdf(KdfParams::new(150_000).unwrap());
        assert!(stronger.save_config(&validated_config()).await);

        let default_kdf = SecureStorage::new(backend, SecretString::new("test-passphrase"));
        assert_eq!(default_kdf.load_config().await, None);
        assert!(stronger.load_config().await.is_some());
    }
}
