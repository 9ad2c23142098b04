//! Error types for the credential vault.

use thiserror::Error;

/// Errors raised below the [`SecureStorage`](crate::SecureStorage) boundary.
///
/// The store itself absorbs these into `None`/`false`; they surface only
/// from the `crypto`, `storage` and `passphrase` modules.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid KDF parameters: {0}")]
    InvalidKdf(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Passphrase error: {0}")]
    Passphrase(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
