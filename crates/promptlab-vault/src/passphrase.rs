//! Vault passphrase resolution.
//!
//! The passphrase feeding PBKDF2 is resolved in priority order:
//! 1. `PROMPTLAB_PASSPHRASE` environment variable
//! 2. OS keychain (macOS Keychain via Security.framework)
//! 3. A generated key file (`{base}/vault.key`, mode `0600`)
//!
//! Whatever source wins, the value never leaves this process in plaintext
//! except through the keychain or the key file it came from.

use std::io::Write;
use std::path::Path;

use promptlab_core::env::{self, vars};
use promptlab_core::SecretString;
use rand::RngCore;
use tracing::{debug, warn};

use crate::error::{Result, VaultError};

#[cfg(target_os = "macos")]
const SERVICE_NAME: &str = "promptlab";
#[cfg(target_os = "macos")]
const ACCOUNT_NAME: &str = "vault_passphrase";

/// Random bytes in a generated passphrase.
const GENERATED_LEN: usize = 32;

/// Resolve the vault passphrase, creating one on first use.
pub fn resolve_passphrase(key_file: &Path) -> Result<SecretString> {
    resolve_from(env::get_var(vars::PROMPTLAB_PASSPHRASE), key_file)
}

fn resolve_from(env_value: Option<String>, key_file: &Path) -> Result<SecretString> {
    if let Some(value) = env_value {
        debug!("using vault passphrase from environment variable");
        return Ok(SecretString::new(value));
    }

    if let Some(value) = get_from_keychain()? {
        debug!("using vault passphrase from OS keychain");
        return Ok(value);
    }

    let value = load_or_create_key_file(key_file)?;
    match store_in_keychain(&value) {
        Ok(true) => debug!("vault passphrase copied into OS keychain"),
        Ok(false) => {}
        Err(e) => warn!("keeping vault passphrase in key file only: {e}"),
    }
    Ok(value)
}

/// Read the passphrase from `path`, generating it if the file is missing.
pub fn load_or_create_key_file(path: &Path) -> Result<SecretString> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let value = content.trim();
            if value.is_empty() {
                return Err(VaultError::Passphrase(format!(
                    "key file {} is empty",
                    path.display()
                )));
            }
            debug!(path = %path.display(), "using vault passphrase from key file");
            return Ok(SecretString::new(value));
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let mut bytes = [0u8; GENERATED_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    let value = SecretString::new(hex::encode(bytes));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_key_file(path, value.expose_secret())?;
    debug!(path = %path.display(), "generated new vault passphrase");
    Ok(value)
}

/// Create the key file exclusively with mode 0600 on Unix.
fn write_key_file(path: &Path, contents: &str) -> Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|e| {
        VaultError::Passphrase(format!("cannot create key file {}: {e}", path.display()))
    })?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// macOS keychain implementation
// ---------------------------------------------------------------------------

#[cfg(target_os = "macos")]
fn is_not_found(e: &security_framework::base::Error) -> bool {
    let msg = e.to_string();
    msg.contains("not found") || msg.contains("-25300")
}

#[cfg(target_os = "macos")]
fn get_from_keychain() -> Result<Option<SecretString>> {
    use security_framework::passwords::get_generic_password;

    match get_generic_password(SERVICE_NAME, ACCOUNT_NAME) {
        Ok(data) => String::from_utf8(data)
            .map(|s| Some(SecretString::new(s)))
            .map_err(|e| VaultError::Passphrase(format!("keychain data is not valid UTF-8: {e}"))),
        Err(e) if is_not_found(&e) => Ok(None),
        Err(e) => Err(VaultError::Passphrase(format!("keychain read failed: {e}"))),
    }
}

#[cfg(target_os = "macos")]
fn store_in_keychain(value: &SecretString) -> Result<bool> {
    use security_framework::passwords::set_generic_password;

    set_generic_password(SERVICE_NAME, ACCOUNT_NAME, value.expose_secret().as_bytes())
        .map(|()| true)
        .map_err(|e| VaultError::Passphrase(format!("keychain write failed: {e}")))
}

// ---------------------------------------------------------------------------
// Other platforms: key file only
// ---------------------------------------------------------------------------

#[cfg(not(target_os = "macos"))]
fn get_from_keychain() -> Result<Option<SecretString>> {
    Ok(None)
}

#[cfg(not(target_os = "macos"))]
fn store_in_keychain(_value: &SecretString) -> Result<bool> {
    Ok(false)
}
