//! Command implementations for the AZ AI CLI.

pub mod ask;
pub mod chat;
pub mod config;
pub mod personas;
pub mod render;

use crate::config::CliConfig;
use anyhow::{Context, Result};
use azai_abstraction::{Attachment, Model};
use azai_models::{ModelConfig, ModelFactory, ModelType};
use azai_orchestrator::{
    DispatcherConfig, Mode, ModelRoster, Orchestrator, OrchestratorInput, ProgressReporter,
    UnifiedResult,
};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub use config::ConfigCommand;

/// Creates one backend for `model_id` using the configured engine.
fn create_model(config: &CliConfig, model_id: &str) -> Result<Arc<dyn Model>> {
    let model_type: ModelType = config.engine().parse()?;
    let mut model_config = ModelConfig::new(model_type, model_id.to_string());
    if let Some(ref api_key) = config.api_key {
        model_config = model_config.with_api_key(api_key.clone());
    }
    if let Some(ref base_url) = config.base_url {
        model_config = model_config.with_base_url(base_url.clone());
    }
    ModelFactory::create(model_config)
        .with_context(|| format!("Failed to create {} model '{}'", config.engine(), model_id))
}

/// Builds the orchestrator described by `config`.
pub fn build_orchestrator(config: &CliConfig) -> Result<Orchestrator> {
    let roster = ModelRoster::new(
        create_model(config, config.chat_model())?,
        create_model(config, config.synthesis_model())?,
        create_model(config, config.image_model())?,
    );
    let personas = config.persona_table()?;
    debug!(roster = ?roster, personas = ?personas.ids(), "Orchestrator configured");

    Ok(Orchestrator::new(roster, personas).with_dispatcher_config(DispatcherConfig {
        report_failures: config.report_failures.unwrap_or(false),
    }))
}

/// Turns `--mode`/`--game` flags into a forced mode.
///
/// `--game` implies game mode; `auto` or no flag leaves the choice to the
/// classifier.
pub fn parse_mode(mode: Option<&str>, game: Option<&str>) -> Result<Option<Mode>> {
    match (mode, game) {
        (_, Some(game)) => Ok(Some(Mode::Game(game.parse()?))),
        (None | Some("auto"), None) => Ok(None),
        (Some(mode), None) => Ok(Some(mode.parse()?)),
    }
}

/// Reads a file to send along with a prompt.
pub fn load_attachment(path: &Path) -> Result<Attachment> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read attachment {}", path.display()))?;
    let mime_type = mime_guess::from_path(path).first_or_octet_stream().essence_str().to_string();
    debug!(path = %path.display(), mime_type = %mime_type, bytes = data.len(), "Loaded attachment");
    Ok(Attachment::new(mime_type, data))
}

/// Writes a generated attachment into `dir` under a fresh name.
pub fn save_attachment(dir: &Path, attachment: &Attachment) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = dir.join(format!("azai-{}.{}", Uuid::new_v4(), attachment.extension()));
    std::fs::write(&path, &attachment.data)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Saved attachment");
    Ok(path)
}

/// Runs one orchestration with live progress unless `quiet`.
pub async fn run_turn(
    orchestrator: &Orchestrator,
    input: &OrchestratorInput,
    quiet: bool,
) -> UnifiedResult {
    let reporter = ProgressReporter::new(orchestrator.personas().ids());
    let live = (!quiet).then(|| render::LiveProgress::start(&reporter, orchestrator.personas()));

    let result = orchestrator.run(input, &reporter, &reporter).await;

    if let Some(live) = live {
        live.finish().await;
    }
    result
}

/// Prints a result and saves its attachment, if any.
pub fn print_result(result: &UnifiedResult, output_dir: &Path) -> Result<()> {
    println!();
    println!("{}", result.label.cyan().bold());
    println!("{}", result.text);

    if let Some(ref attachment) = result.attachment {
        let path = save_attachment(output_dir, attachment)?;
        println!();
        println!("{} {}", "Saved image:".green().bold(), path.display());
    }
    Ok(())
}
