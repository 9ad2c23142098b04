//! Path resolution utilities.

use crate::env::{self, vars};
use crate::error::ConfigError;
use std::path::PathBuf;

/// Get the Promptlab base directory.
///
/// `$PROMPTLAB_HOME` wins when set; otherwise `~/.promptlab`.
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    if let Some(home) = env::get_var(vars::PROMPTLAB_HOME) {
        return Ok(expand_tilde(&home));
    }
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".promptlab"))
}

/// Get the main config file path.
///
/// `$PROMPTLAB_CONFIG` overrides the default `{base}/promptlab.json5`.
pub fn config_file() -> Result<PathBuf, ConfigError> {
    if let Some(path) = env::get_var(vars::PROMPTLAB_CONFIG) {
        return Ok(expand_tilde(&path));
    }
    Ok(base_dir()?.join("promptlab.json5"))
}

/// Get the local storage directory ({base}/storage).
pub fn storage_dir() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("storage"))
}

/// Get the generated vault passphrase file ({base}/vault.key).
pub fn passphrase_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("vault.key"))
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/keys");
        assert!(!expanded.to_string_lossy().contains('~'));
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }

    #[test]
    fn test_storage_dir_is_under_base() {
        let base = base_dir().unwrap();
        assert!(storage_dir().unwrap().starts_with(&base));
        assert!(passphrase_file().unwrap().ends_with("vault.key"));
    }
}
