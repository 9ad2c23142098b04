//! Promptlab command-line interface.

pub mod commands;
pub mod render;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use promptlab_core::{Config, ConfigError};

/// Promptlab - manage the API key used for prompt improvement
#[derive(Parser)]
#[command(name = "promptlab")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "PROMPTLAB_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Manage the stored provider API key
    Key(commands::key::KeyArgs),

    /// Run a session that erases the key on exit when auto-cleanup is on
    Session(commands::session::SessionArgs),

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

/// Load the config from `path`, or from the default location.
///
/// A missing file means defaults, wherever it was expected.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => match Config::load(path) {
            Err(ConfigError::NotFound(_)) => Config::default(),
            other => other?,
        },
        None => Config::load_default()?,
    };
    Ok(config)
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Key(args) => commands::key::run(args, config_path).await,
        Commands::Session(args) => commands::session::run(args, config_path).await,
        Commands::Config(args) => commands::config::run(args, config_path).await,
        Commands::Version => {
            println!("promptlab {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
