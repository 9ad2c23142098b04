//! HTTP key validator backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use promptlab_core::config::ValidationConfig;
use promptlab_core::SecretString;
use promptlab_vault::Provider;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::{KeyValidator, Result, ValidationError, ValidationReport};

/// Validates keys by listing models on the provider's REST API.
pub struct HttpKeyValidator {
    client: Client,
    gemini_base: String,
    openai_base: String,
}

/// Both providers wrap failures as `{"error": {"message": ...}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Gemini lists under `models`, OpenAI under `data`.
#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    data: Option<Vec<serde_json::Value>>,
}

impl HttpKeyValidator {
    /// Build a validator from the `validation` config section.
    pub fn new(config: &ValidationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ValidationError::Config(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            gemini_base: normalize_base(&config.gemini_base_url)?,
            openai_base: normalize_base(&config.openai_base_url)?,
        })
    }

    fn request(&self, provider: Provider, api_key: &SecretString) -> RequestBuilder {
        match provider {
            Provider::Gemini => self
                .client
                .get(format!("{}/models", self.gemini_base))
                .query(&[("key", api_key.expose_secret())]),
            Provider::OpenAi => self
                .client
                .get(format!("{}/models", self.openai_base))
                .bearer_auth(api_key.expose_secret()),
        }
    }
}

fn normalize_base(raw: &str) -> Result<String> {
    let url = Url::parse(raw)
        .map_err(|e| ValidationError::Config(format!("invalid base URL '{raw}': {e}")))?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[async_trait]
impl KeyValidator for HttpKeyValidator {
    async fn validate(
        &self,
        provider: Provider,
        api_key: &SecretString,
    ) -> Result<ValidationReport> {
        if !provider.matches_key_format(api_key.expose_secret()) {
            return Err(ValidationError::Format {
                provider,
                hint: provider.key_format_hint(),
            });
        }

        debug!(provider = %provider, "validating API key remotely");
        let response = self.request(provider, api_key).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|env| env.error.message)
                .unwrap_or(body);
            let err = ValidationError::classify(status.as_u16(), message);
            warn!(provider = %provider, status = status.as_u16(), "API key rejected: {err}");
            return Err(err);
        }

        let model_count = serde_json::from_str::<ModelList>(&body)
            .ok()
            .and_then(|list| list.models.or(list.data))
            .map(|models| models.len());

        Ok(ValidationReport {
            provider,
            tested_at: Utc::now(),
            model_count,
        })
    }
}
