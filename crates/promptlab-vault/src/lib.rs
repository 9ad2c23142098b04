//! Encrypted local credential store for Promptlab.
//!
//! Holds a single provider API key encrypted with AES-256-GCM under a
//! PBKDF2-SHA256 derived key, plus the helpers the settings flow needs:
//! key masking, provider format checks and erase-on-exit.

pub mod cleanup;
pub mod crypto;
pub mod error;
pub mod format;
pub mod passphrase;
pub mod storage;
pub mod store;
pub mod types;

pub use cleanup::AutoCleanup;
pub use crypto::KdfParams;
pub use error::{Result, VaultError};
pub use format::{mask_api_key, validate_key_format};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{SecureStorage, STORAGE_KEY};
pub use types::{CredentialConfig, Provider};
