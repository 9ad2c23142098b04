//! Remote API key validation for Promptlab.
//!
//! The vault only checks a key's shape. Whether the provider actually
//! accepts it is decided here, by making one cheap authenticated request:
//! - Google Gemini: list models with the key as a query parameter
//! - OpenAI: list models with the key as a bearer token
//!
//! # Example
//!
//! ```rust,ignore
//! use promptlab_providers::{verify_credential, HttpKeyValidator};
//! use promptlab_vault::Provider;
//!
//! let validator = HttpKeyValidator::new(&config.validation)?;
//! let credential = verify_credential(&validator, Provider::Gemini, key.into(), true).await?;
//! store.save_config(&credential).await;
//! ```

mod error;
pub mod http;

pub use error::{Result, ValidationError};
pub use http::HttpKeyValidator;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use promptlab_core::SecretString;
use promptlab_vault::{CredentialConfig, Provider};
use tracing::info;

/// Outcome of a successful remote check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub provider: Provider,
    pub tested_at: DateTime<Utc>,
    /// Number of models the key can see, when the provider reports it.
    pub model_count: Option<usize>,
}

/// Checks a key against its provider.
#[async_trait]
pub trait KeyValidator: Send + Sync {
    async fn validate(&self, provider: Provider, api_key: &SecretString)
        -> Result<ValidationReport>;
}

/// Run the settings flow for a submitted key.
///
/// Trims the key, rejects it locally if the shape is wrong, validates it
/// remotely, and returns the config ready to be saved.
pub async fn verify_credential(
    validator: &dyn KeyValidator,
    provider: Provider,
    api_key: SecretString,
    auto_cleanup: bool,
) -> Result<CredentialConfig> {
    let api_key = api_key.trimmed();
    if !provider.matches_key_format(api_key.expose_secret()) {
        return Err(ValidationError::Format {
            provider,
            hint: provider.key_format_hint(),
        });
    }

    let report = validator.validate(provider, &api_key).await?;
    info!(provider = %provider, models = ?report.model_count, "API key validated");

    Ok(CredentialConfig::validated(provider, api_key, report.tested_at)
        .with_auto_cleanup(auto_cleanup))
}
