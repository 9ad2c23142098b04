//! Error types for remote key validation.

use promptlab_vault::Provider;
use thiserror::Error;

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Why a key was rejected.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The key does not have the provider's shape; no request was sent.
    #[error("Invalid {provider} key format: expected {hint}")]
    Format {
        provider: Provider,
        hint: &'static str,
    },

    /// The provider rejected the key.
    #[error("Invalid API key: {0}")]
    InvalidKey(String),

    /// Rate limit or usage quota exhausted.
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The key lacks access to the model API.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The account needs billing attention.
    #[error("Billing issue: {0}")]
    Billing(String),

    /// Any other non-success response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Network error. The request URL is stripped since it can carry the key.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ValidationError {
    fn from(e: reqwest::Error) -> Self {
        ValidationError::Network(e.without_url())
    }
}

impl ValidationError {
    /// Short explanation suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Format { .. } => "The API key format does not match the selected provider.",
            Self::InvalidKey(_) => "The API key is not valid.",
            Self::QuotaExceeded(_) => "The API usage limit has been exceeded.",
            Self::PermissionDenied(_) => "The API key does not have the required permissions.",
            Self::Billing(_) => "Please check the billing details for this account.",
            Self::Api { .. } | Self::Network(_) | Self::Config(_) => {
                "API key validation failed."
            }
        }
    }

    /// Map a failed provider response onto a rejection reason.
    ///
    /// Message text takes priority over the status code, because Gemini
    /// reports bad keys as `400 Bad Request`.
    pub fn classify(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();

        if lower.contains("api key not valid") || lower.contains("incorrect api key") {
            Self::InvalidKey(message)
        } else if lower.contains("quota") {
            Self::QuotaExceeded(message)
        } else if lower.contains("billing") {
            Self::Billing(message)
        } else if lower.contains("permission") {
            Self::PermissionDenied(message)
        } else {
            match status {
                401 => Self::InvalidKey(message),
                402 => Self::Billing(message),
                403 => Self::PermissionDenied(message),
                429 => Self::QuotaExceeded(message),
                _ => Self::Api { status, message },
            }
        }
    }
}
