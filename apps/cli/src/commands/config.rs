//! `azai config` - inspect and create configuration files.

use crate::config::{CliConfig, ModelsConfig};
use anyhow::{Result, bail};
use clap::Subcommand;
use colored::Colorize;

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a starter configuration file
    Init {
        /// Write ./.azairc instead of ~/.azai/config.toml
        #[arg(long)]
        local: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file locations
    Path,
}

/// Execute a config subcommand.
pub fn execute(command: ConfigCommand, config: &CliConfig) -> Result<()> {
    match command {
        ConfigCommand::Show => show(config),
        ConfigCommand::Init { local, force } => init(local, force),
        ConfigCommand::Path => {
            println!("{} {}", "Global:".bold(), CliConfig::default_global_path().display());
            println!("{} {}", "Local: ".bold(), CliConfig::default_local_path().display());
            Ok(())
        }
    }
}

fn show(config: &CliConfig) -> Result<()> {
    let mut effective = config.clone();
    effective.api_key = effective.api_key.as_deref().map(mask_secret);
    effective.engine = Some(config.engine().to_string());
    effective.models = ModelsConfig {
        chat: Some(config.chat_model().to_string()),
        synthesis: Some(config.synthesis_model().to_string()),
        image: Some(config.image_model().to_string()),
    };
    print!("{}", toml::to_string_pretty(&effective)?);
    Ok(())
}

fn init(local: bool, force: bool) -> Result<()> {
    let path =
        if local { CliConfig::default_local_path() } else { CliConfig::default_global_path() };
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let starter = CliConfig {
        engine: Some(crate::config::DEFAULT_ENGINE.to_string()),
        aspect_ratio: Some("1:1".to_string()),
        report_failures: Some(false),
        models: ModelsConfig {
            chat: Some(crate::config::DEFAULT_CHAT_MODEL.to_string()),
            synthesis: Some(crate::config::DEFAULT_SYNTHESIS_MODEL.to_string()),
            image: Some(crate::config::DEFAULT_IMAGE_MODEL.to_string()),
        },
        ..Default::default()
    };
    starter.save_to_file(&path)?;

    println!("{} {}", "Wrote".green().bold(), path.display());
    println!("Set {} or add api_key to the file to use Gemini.", "GEMINI_API_KEY".cyan());
    Ok(())
}

/// Keeps the last four characters of a secret.
fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{}", tail)
}
