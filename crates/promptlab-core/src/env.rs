//! Environment variable handling.

use std::env;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
pub fn get_var_or(name: &str, default: &str) -> String {
    get_var(name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable as a boolean.
pub fn get_bool(name: &str) -> bool {
    get_var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Common environment variable names.
pub mod vars {
    /// Promptlab home directory override.
    pub const PROMPTLAB_HOME: &str = "PROMPTLAB_HOME";

    /// Promptlab config file override.
    pub const PROMPTLAB_CONFIG: &str = "PROMPTLAB_CONFIG";

    /// Vault passphrase override.
    pub const PROMPTLAB_PASSPHRASE: &str = "PROMPTLAB_PASSPHRASE";

    /// Promptlab log filter.
    pub const PROMPTLAB_LOG: &str = "PROMPTLAB_LOG";

    /// Emit logs as JSON lines instead of the human format.
    pub const PROMPTLAB_LOG_JSON: &str = "PROMPTLAB_LOG_JSON";
}
