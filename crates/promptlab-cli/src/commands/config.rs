//! Configuration management commands.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use promptlab_core::config::Config;
use promptlab_core::paths;

use crate::render;

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration
    Validate,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = crate::load_config(config_path)?;
            println!("{}", config.to_json()?);
        }

        ConfigCommand::Init { force } => {
            let path = resolve_path(config_path)?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            match config_path {
                Some(path) => Config::default().save(path)?,
                None => Config::default().save_default()?,
            }
            println!("Configuration initialized at: {}", path.display());
        }

        ConfigCommand::Path => {
            println!("{}", resolve_path(config_path)?.display());
        }

        ConfigCommand::Validate => {
            let path = resolve_path(config_path)?;
            if !path.exists() {
                println!("No config file at {}; defaults apply.", path.display());
                return Ok(());
            }
            match Config::load(&path) {
                Ok(_) => println!("{} Configuration is valid.", style(render::CHECK).green()),
                Err(e) => anyhow::bail!("Configuration is invalid: {}", e),
            }
        }
    }

    Ok(())
}

fn resolve_path(config_path: Option<&Path>) -> anyhow::Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(paths::config_file()?),
    }
}
