//! Credential types persisted by the vault.

use chrono::{DateTime, Utc};
use promptlab_core::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::format;

/// External AI service a key authenticates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    OpenAi,
}

impl Provider {
    /// Wire name, as stored in the config JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
        }
    }

    /// Human-facing product name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Google Gemini",
            Provider::OpenAi => "OpenAI GPT",
        }
    }

    /// Short description of the expected key shape, for error messages.
    pub fn key_format_hint(&self) -> &'static str {
        match self {
            Provider::Gemini => "'AIza' followed by 35 letters, digits, '_' or '-'",
            Provider::OpenAi => "'sk-' followed by 48 letters or digits",
        }
    }

    /// Whether `key` has this provider's key shape.
    pub fn matches_key_format(&self, key: &str) -> bool {
        format::key_pattern(*self).is_match(key)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            other => Err(format!("unsupported provider: {other}")),
        }
    }
}

/// The single credential the vault persists.
///
/// Field names serialize in camelCase (`apiKey`, `isValid`, `lastTested`,
/// `autoCleanup`). Older payloads that omit the optional fields still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialConfig {
    pub provider: Provider,

    pub api_key: SecretString,

    /// Set only after a successful remote validation.
    #[serde(default)]
    pub is_valid: bool,

    /// When the key last passed remote validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_tested: Option<DateTime<Utc>>,

    /// Erase the stored key when the session ends.
    #[serde(default = "default_auto_cleanup")]
    pub auto_cleanup: bool,
}

fn default_auto_cleanup() -> bool {
    true
}

impl CredentialConfig {
    /// A config whose key has not been checked remotely.
    pub fn unverified(provider: Provider, api_key: impl Into<SecretString>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            is_valid: false,
            last_tested: None,
            auto_cleanup: default_auto_cleanup(),
        }
    }

    /// A config whose key passed remote validation at `tested_at`.
    pub fn validated(
        provider: Provider,
        api_key: impl Into<SecretString>,
        tested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            is_valid: true,
            last_tested: Some(tested_at),
            ..Self::unverified(provider, api_key)
        }
    }

    pub fn with_auto_cleanup(mut self, enabled: bool) -> Self {
        self.auto_cleanup = enabled;
        self
    }

    /// Whether the stored key has the provider's key shape.
    pub fn has_valid_format(&self) -> bool {
        self.provider.matches_key_format(self.api_key.expose_secret())
    }

    /// Key suitable for display.
    pub fn masked_key(&self) -> String {
        format::mask_api_key(self.api_key.expose_secret())
    }
}
