//! API key commands.
//!
//! Provides `promptlab key set|show|remove|check|mask`. Stored keys are
//! never printed in full.

use std::path::Path;
use std::str::FromStr;

use clap::Args;
use console::style;
use promptlab_core::SecretString;
use promptlab_providers::{verify_credential, HttpKeyValidator};
use promptlab_vault::{
    mask_api_key, validate_key_format, CredentialConfig, Provider, SecureStorage,
};

use crate::render;

/// Key command arguments.
#[derive(Args)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeyCommand,
}

#[derive(clap::Subcommand)]
pub enum KeyCommand {
    /// Validate and store an API key (prompts for the key)
    Set {
        /// Provider: gemini or openai
        #[arg(short, long, value_parser = Provider::from_str)]
        provider: Provider,

        /// API key (if omitted, prompts for hidden input)
        #[arg(long)]
        key: Option<String>,

        /// Store without contacting the provider
        #[arg(long)]
        skip_validation: bool,

        /// Keep the key after the session ends
        #[arg(long)]
        no_auto_cleanup: bool,
    },

    /// Show the stored credential with the key masked
    Show,

    /// Erase the stored credential
    Remove,

    /// Check whether a key has the expected shape for a provider
    Check {
        /// Provider name
        provider: String,

        /// API key
        key: String,
    },

    /// Print a masked form of a key
    Mask {
        /// API key
        key: String,
    },
}

/// Run the key command.
pub async fn run(args: KeyArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    match args.command {
        KeyCommand::Set {
            provider,
            key,
            skip_validation,
            no_auto_cleanup,
        } => set(config_path, provider, key, skip_validation, no_auto_cleanup).await?,

        KeyCommand::Show => {
            let store = open_store(config_path)?;
            match store.load_config().await {
                Some(credential) => render::print_credential(&credential),
                None => println!("No API key stored."),
            }
        }

        KeyCommand::Remove => {
            let store = open_store(config_path)?;
            if !store.clear_config().await {
                anyhow::bail!("Failed to remove stored API key");
            }
            println!("Stored API key removed.");
        }

        KeyCommand::Check { provider, key } => {
            if !validate_key_format(&provider, key.trim()) {
                let hint = Provider::from_str(&provider)
                    .map(|p| p.key_format_hint())
                    .unwrap_or("unknown provider");
                anyhow::bail!("Invalid key format for '{}' ({})", provider, hint);
            }
            println!("{} Key format looks valid.", style(render::CHECK).green());
        }

        KeyCommand::Mask { key } => {
            println!("{}", mask_api_key(&key));
        }
    }

    Ok(())
}

async fn set(
    config_path: Option<&Path>,
    provider: Provider,
    key: Option<String>,
    skip_validation: bool,
    no_auto_cleanup: bool,
) -> anyhow::Result<()> {
    let config = crate::load_config(config_path)?;

    let raw = match key {
        Some(k) => k,
        None => {
            let prompt = format!("Enter {} API key: ", provider.display_name());
            rpassword::prompt_password(prompt)
                .map_err(|e| anyhow::anyhow!("Failed to read API key: {}", e))?
        }
    };
    let api_key = SecretString::new(raw).trimmed();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }
    if !provider.matches_key_format(api_key.expose_secret()) {
        anyhow::bail!(
            "Invalid {} key format ({})",
            provider.display_name(),
            provider.key_format_hint()
        );
    }

    let auto_cleanup = !no_auto_cleanup && config.vault.auto_cleanup;

    let credential = if skip_validation {
        tracing::debug!(provider = %provider, "skipping remote validation");
        CredentialConfig::unverified(provider, api_key).with_auto_cleanup(auto_cleanup)
    } else {
        println!("Validating key with {}...", provider.display_name());
        let validator = HttpKeyValidator::new(&config.validation)
            .map_err(|e| anyhow::anyhow!("Failed to initialize validator: {}", e))?;
        match verify_credential(&validator, provider, api_key, auto_cleanup).await {
            Ok(credential) => credential,
            Err(e) => {
                tracing::debug!(error = %e, "validation failed");
                anyhow::bail!("{}", e.user_message());
            }
        }
    };

    let store = SecureStorage::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to open credential store: {}", e))?;
    if !store.save_config(&credential).await {
        anyhow::bail!("Failed to save API key");
    }

    println!(
        "{} {} key {} saved.",
        style(render::CHECK).green(),
        provider.display_name(),
        credential.masked_key()
    );
    if credential.auto_cleanup {
        println!("It will be erased when the next session ends.");
    }
    Ok(())
}

fn open_store(config_path: Option<&Path>) -> anyhow::Result<SecureStorage> {
    let config = crate::load_config(config_path)?;
    SecureStorage::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to open credential store: {}", e))
}
