//! `azai ask` - run one prompt and print the answer.

use crate::config::CliConfig;
use anyhow::Result;
use azai_abstraction::AspectRatio;
use azai_orchestrator::{GenerationConfig, OrchestratorInput, resolve_prompt};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use super::{build_orchestrator, load_attachment, parse_mode, print_result, run_turn};

/// Options for a single prompt.
#[derive(Args, Debug, Default)]
pub struct AskOptions {
    /// Prompt text (may be empty when attaching a file)
    pub prompt: Vec<String>,

    /// Force a mode (auto, chat, image, research, code, game)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Play a game (20_questions, rpg, trivia, custom)
    #[arg(short, long)]
    pub game: Option<String>,

    /// File to send with the prompt
    #[arg(short, long)]
    pub attach: Option<PathBuf>,

    /// Image aspect ratio (1:1, 16:9, 9:16, 4:3, 3:4)
    #[arg(long)]
    pub aspect_ratio: Option<String>,

    /// Directory for generated images
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the ask command.
pub async fn execute(options: AskOptions, config: &CliConfig) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;
    let forced_mode = parse_mode(options.mode.as_deref(), options.game.as_deref())?;
    let aspect_ratio = match options.aspect_ratio.as_deref() {
        Some(value) => value.parse::<AspectRatio>()?,
        None => config.aspect_ratio()?,
    };
    let attachment = options.attach.as_deref().map(load_attachment).transpose()?;

    let prompt = resolve_prompt(&options.prompt.join(" "), attachment.is_some(), forced_mode, true);
    info!(mode = ?forced_mode, has_attachment = attachment.is_some(), "Running prompt");

    let input = OrchestratorInput::new(prompt)
        .with_attachment(attachment)
        .with_config(GenerationConfig { aspect_ratio })
        .with_mode(forced_mode);

    let result = run_turn(&orchestrator, &input, options.json).await;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let output_dir = options.output_dir.unwrap_or_else(|| config.output_dir());
    print_result(&result, &output_dir)
}
