//! AES-256-GCM encryption with PBKDF2-HMAC-SHA256 key derivation.
//!
//! Every call to [`encrypt`] draws a fresh 16-byte salt and 12-byte nonce,
//! so the same plaintext never encrypts to the same blob. The output is a
//! single base64 string laid out as `salt || nonce || ciphertext+tag`,
//! which is all [`decrypt`] needs besides the passphrase.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};

pub const SALT_SIZE: usize = 16;
pub const NONCE_SIZE: usize = 12;
const KEY_SIZE: usize = 32;
const TAG_SIZE: usize = 16;

/// Lowest accepted PBKDF2 iteration count.
pub const MIN_ITERATIONS: u32 = promptlab_core::config::MIN_KDF_ITERATIONS;

/// Key derivation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    iterations: u32,
}

impl KdfParams {
    /// Build params with a custom iteration count (must be >= [`MIN_ITERATIONS`]).
    pub fn new(iterations: u32) -> Result<Self> {
        if iterations < MIN_ITERATIONS {
            return Err(VaultError::InvalidKdf(format!(
                "iteration count {iterations} is below the minimum of {MIN_ITERATIONS}"
            )));
        }
        Ok(Self { iterations })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: MIN_ITERATIONS,
        }
    }
}

/// Derive a 256-bit key from `passphrase` and `salt`.
fn derive_key(passphrase: &[u8], salt: &[u8], params: KdfParams) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    pbkdf2::pbkdf2_hmac::<Sha256>(passphrase, salt, params.iterations, &mut key[..]);
    key
}

/// Encrypt `plaintext` and return the base64 blob.
pub fn encrypt(passphrase: &[u8], plaintext: &str, params: KdfParams) -> Result<String> {
    if plaintext.is_empty() {
        return Err(VaultError::EncryptionFailed(
            "plaintext must not be empty".to_string(),
        ));
    }

    let mut salt = [0u8; SALT_SIZE];
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    let mut rng = rand::thread_rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(passphrase, &salt, params);
    let cipher = Aes256Gcm::new_from_slice(&key[..])
        .map_err(|e| VaultError::EncryptionFailed(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
        .map_err(|e| VaultError::EncryptionFailed(e.to_string()))?;

    let mut blob = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);

    Ok(STANDARD.encode(blob))
}

/// Decrypt a blob produced by [`encrypt`].
///
/// Malformed base64, truncated input, a wrong passphrase and any tampered
/// byte all come back as [`VaultError::DecryptionFailed`].
pub fn decrypt(passphrase: &[u8], blob: &str, params: KdfParams) -> Result<String> {
    let raw = STANDARD
        .decode(blob)
        .map_err(|e| VaultError::DecryptionFailed(format!("base64 decode failed: {e}")))?;

    if raw.len() < SALT_SIZE + NONCE_SIZE + TAG_SIZE {
        return Err(VaultError::DecryptionFailed(format!(
            "blob too short: {} bytes",
            raw.len()
        )));
    }

    let (salt, rest) = raw.split_at(SALT_SIZE);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);

    let key = derive_key(passphrase, salt, params);
    let cipher = Aes256Gcm::new_from_slice(&key[..])
        .map_err(|e| VaultError::DecryptionFailed(e.to_string()))?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| VaultError::DecryptionFailed("authentication failed".to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|e| VaultError::DecryptionFailed(format!("invalid UTF-8: {e}")))
}
