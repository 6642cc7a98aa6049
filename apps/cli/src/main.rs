//! AZ AI CLI - command-line interface for the AZ AI orchestrator
//!
//! This CLI provides an `azai` command that sends prompts through the
//! multi-persona fan-out and synthesis pipeline, or through one of the
//! single-model modes (image, research, code, games).

mod commands;
mod config;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::{ConfigCommand, ask, chat, personas};
use config::CliConfig;

/// AZ AI - many minds, one answer
///
/// Every prompt is answered by a panel of AI personas in parallel, then
/// merged into one response. Image, research, code and game modes route
/// to a single specialized model instead.
#[derive(Parser, Debug)]
#[command(
    name = "azai",
    author,
    version,
    about = "AZ AI - multi-persona answers, synthesized",
    long_about = "AZ AI (azai) fans a prompt out to several AI personas and synthesizes one answer.\nIt can also generate images, research with cited sources, write code and host games."
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Backend engine (gemini, mock); overrides config and AZAI_ENGINE
    #[arg(short, long, global = true)]
    engine: Option<String>,

    /// Extra configuration file layered over the discovered ones
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask one question
    ///
    /// Routes the prompt automatically (image or chat) unless --mode or
    /// --game forces a mode.
    Ask(ask::AskOptions),

    /// Start an interactive session
    Chat {
        /// Initial mode (auto, chat, image, research, code, game)
        #[arg(short, long)]
        mode: Option<String>,

        /// Start a game immediately
        #[arg(short, long)]
        game: Option<String>,

        /// Directory for generated images
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// List the configured personas
    Personas {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration files
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut cli_config = CliConfig::load(args.config.as_deref())?;
    if let Some(engine) = args.engine {
        cli_config.engine = Some(engine);
    }

    // Flag, then RUST_LOG, then config, then warn.
    let filter = match args.log_level.as_deref() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(cli_config.log_level.as_deref().unwrap_or("warn"))
        }),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // If no command provided, show help
    let Some(command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    match command {
        Command::Ask(options) => ask::execute(options, &cli_config).await?,
        Command::Chat { mode, game, output_dir } => {
            chat::execute(&cli_config, mode, game, output_dir.as_deref()).await?;
        }
        Command::Personas { json } => personas::execute(&cli_config, json)?,
        Command::Config(cmd) => commands::config::execute(cmd, &cli_config)?,
    }

    Ok(())
}
