//! Configuration loading and persistence.

use super::{Config, MIN_KDF_ITERATIONS};
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

impl Config {
    /// Load configuration from the default path.
    ///
    /// A missing file is not an error: first runs get [`Config::default`].
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        match Self::load(&path) {
            Err(ConfigError::NotFound(_)) => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to the default path.
    pub fn save_default(&self) -> Result<(), ConfigError> {
        let path = paths::config_file()?;
        self.save(&path)
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let content = self.to_json()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to a pretty JSON string (valid JSON5).
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.vault.kdf_iterations < MIN_KDF_ITERATIONS {
            errors.push(format!(
                "vault.kdf_iterations must be at least {}, got {}",
                MIN_KDF_ITERATIONS, self.vault.kdf_iterations
            ));
        }

        if self.validation.timeout_secs == 0 {
            errors.push("validation.timeout_secs cannot be 0".to_string());
        }

        for (field, url) in [
            ("validation.gemini_base_url", &self.validation.gemini_base_url),
            ("validation.openai_base_url", &self.validation.openai_base_url),
        ] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                errors.push(format!("{} must be an http(s) URL, got '{}'", field, url));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// Resolve the storage directory, honouring `vault.storage_dir`.
    pub fn storage_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.vault.storage_dir {
            Some(dir) => Ok(paths::expand_tilde(&dir.to_string_lossy())),
            None => paths::storage_dir(),
        }
    }
}
