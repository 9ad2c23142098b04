//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lowest PBKDF2 iteration count the vault accepts.
pub const MIN_KDF_ITERATIONS: u32 = 100_000;

/// Main Promptlab configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Credential vault settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Remote key validation settings.
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Credential vault section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iteration count.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Override for the storage directory (defaults to `{base}/storage`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,

    /// Whether newly saved keys are erased when the session ends.
    #[serde(default = "default_true")]
    pub auto_cleanup: bool,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
            storage_dir: None,
            auto_cleanup: true,
        }
    }
}

/// Remote key validation section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Gemini REST base URL.
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// OpenAI REST base URL.
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            gemini_base_url: default_gemini_base_url(),
            openai_base_url: default_openai_base_url(),
        }
    }
}

fn default_kdf_iterations() -> u32 {
    MIN_KDF_ITERATIONS
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
