//! Shared fixtures for Promptlab integration tests.

use std::path::Path;

use promptlab_core::SecretString;
use promptlab_vault::{FileStorage, SecureStorage};
use std::sync::Arc;

/// A Gemini key with the expected shape.
pub fn gemini_key() -> String {
    format!("AIza{}", "Xy9_-".repeat(7))
}

/// An OpenAI key with the expected shape.
pub fn openai_key() -> String {
    format!("sk-{}", "AbC123".repeat(8))
}

/// A store over `dir` with a fixed passphrase.
pub fn file_store(dir: &Path, passphrase: &str) -> SecureStorage {
    SecureStorage::new(
        Arc::new(FileStorage::new(dir)),
        SecretString::new(passphrase),
    )
}
