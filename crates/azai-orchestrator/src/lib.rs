//! Multi-agent fan-out and synthesis orchestration.
//!
//! An [`Orchestrator`] takes one prompt and either hands it to a single mode
//! handler (image, research, code, game) or fans it out to every configured
//! persona, waits for all of them, and synthesizes one answer. Every run
//! returns a [`UnifiedResult`]; backend failures degrade to fallback text.

pub mod agent;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod intent;
pub mod mode;
pub mod persona;
pub mod progress;
pub mod synthesizer;

use azai_abstraction::{AspectRatio, Attachment, Model};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

pub use agent::{AgentResult, query_agent};
pub use dispatcher::{DispatcherConfig, FanOutDispatcher};
pub use error::{OrchestrationError, Result};
pub use handlers::{CHAT_LABEL, CODE_LABEL, GAME_LABEL, IMAGE_LABEL, RESEARCH_LABEL};
pub use intent::{Intent, classify};
pub use mode::{GameType, Mode};
pub use persona::{Persona, PersonaTable};
pub use progress::{
    AgentStatus, ModeSink, NoopSink, ProgressEvent, ProgressReporter, ProgressSnapshot, StatusSink,
};
pub use synthesizer::synthesize;

/// Prompt used when only an attachment was sent.
pub const ATTACHMENT_ONLY_PROMPT: &str = "Examine this artifact.";

/// Prompt used when nothing was sent.
pub const EMPTY_PROMPT: &str = "Hail";

/// Backends used by the different stages of a run.
#[derive(Clone)]
pub struct ModelRoster {
    /// Classifier, persona agents, research and games.
    pub chat: Arc<dyn Model>,
    /// Synthesis and the code assistant.
    pub synthesis: Arc<dyn Model>,
    /// Image generation.
    pub image: Arc<dyn Model>,
}

impl ModelRoster {
    /// Creates a roster from three backends.
    #[must_use]
    pub fn new(chat: Arc<dyn Model>, synthesis: Arc<dyn Model>, image: Arc<dyn Model>) -> Self {
        Self { chat, synthesis, image }
    }

    /// Uses one backend for every stage.
    #[must_use]
    pub fn uniform(model: Arc<dyn Model>) -> Self {
        Self { chat: Arc::clone(&model), synthesis: Arc::clone(&model), image: model }
    }
}

impl std::fmt::Debug for ModelRoster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRoster")
            .field("chat", &self.chat.model_id())
            .field("synthesis", &self.synthesis.model_id())
            .field("image", &self.image.model_id())
            .finish()
    }
}

/// Generation settings passed through to the image handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Output aspect ratio.
    pub aspect_ratio: AspectRatio,
}

/// One orchestration request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestratorInput {
    /// User prompt, already resolved (see [`resolve_prompt`]).
    pub prompt: String,
    /// Optional attachment sent with the prompt.
    pub attachment: Option<Attachment>,
    /// Generation settings.
    pub config: GenerationConfig,
    /// Mode chosen by the user; `None` lets the classifier decide.
    pub forced_mode: Option<Mode>,
}

impl OrchestratorInput {
    /// Creates an input with no attachment and no forced mode.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), ..Self::default() }
    }

    /// Sets the attachment.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Option<Attachment>) -> Self {
        self.attachment = attachment;
        self
    }

    /// Sets the generation settings.
    #[must_use]
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Forces a mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Option<Mode>) -> Self {
        self.forced_mode = mode;
        self
    }
}

/// The single output of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedResult {
    /// Answer text, or fallback text on failure.
    pub text: String,
    /// Generated image, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    /// Attribution label.
    pub label: String,
}

impl UnifiedResult {
    /// Creates a text-only result.
    #[must_use]
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self { text: text.into(), attachment: None, label: label.into() }
    }

    /// Attaches an image.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Fills in an empty prompt before it reaches the orchestrator.
///
/// A blank prompt becomes [`ATTACHMENT_ONLY_PROMPT`] when an attachment is
/// present and [`EMPTY_PROMPT`] otherwise. The opening turn of a built-in
/// game stays empty so the game master sends its start directive.
#[must_use]
pub fn resolve_prompt(
    raw: &str,
    has_attachment: bool,
    mode: Option<Mode>,
    opening_turn: bool,
) -> String {
    if !raw.trim().is_empty() {
        return raw.to_string();
    }
    match mode {
        Some(Mode::Game(game)) if opening_turn && game != GameType::Custom => String::new(),
        _ if has_attachment => ATTACHMENT_ONLY_PROMPT.to_string(),
        _ => EMPTY_PROMPT.to_string(),
    }
}

/// Top-level entry point.
///
/// Holds only configuration; all per-run progress goes to the sinks passed
/// to [`Orchestrator::run`].
pub struct Orchestrator {
    /// Backends.
    roster: ModelRoster,
    /// Persona fan-out.
    dispatcher: FanOutDispatcher,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("roster", &self.roster)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

impl Orchestrator {
    /// Creates an orchestrator.
    #[must_use]
    pub fn new(roster: ModelRoster, personas: PersonaTable) -> Self {
        let dispatcher =
            FanOutDispatcher::new(Arc::clone(&roster.chat), personas, DispatcherConfig::default());
        Self { roster, dispatcher }
    }

    /// Replaces the dispatcher configuration.
    #[must_use]
    pub fn with_dispatcher_config(self, config: DispatcherConfig) -> Self {
        let Self { roster, dispatcher } = self;
        let dispatcher =
            FanOutDispatcher::new(Arc::clone(&roster.chat), dispatcher.personas().clone(), config);
        Self { roster, dispatcher }
    }

    /// Configured personas.
    #[must_use]
    pub const fn personas(&self) -> &PersonaTable {
        self.dispatcher.personas()
    }

    /// Configured backends.
    #[must_use]
    pub const fn roster(&self) -> &ModelRoster {
        &self.roster
    }

    /// Runs one orchestration.
    ///
    /// A forced mode always wins; without one the intent classifier picks
    /// between image and chat. `modes` is told the chosen mode once.
    /// `status` only hears from personas when the chat path runs.
    pub async fn run(
        &self,
        input: &OrchestratorInput,
        status: &dyn StatusSink,
        modes: &dyn ModeSink,
    ) -> UnifiedResult {
        let span = info_span!("orchestration_run", run_id = %Uuid::new_v4());
        self.route(input, status, modes).instrument(span).await
    }

    async fn route(
        &self,
        input: &OrchestratorInput,
        status: &dyn StatusSink,
        modes: &dyn ModeSink,
    ) -> UnifiedResult {
        let prompt = input.prompt.as_str();
        let attachment = input.attachment.as_ref();

        let mode = match input.forced_mode {
            Some(mode) => mode,
            None => match classify(self.roster.chat.as_ref(), prompt, attachment.is_some()).await {
                Intent::Image => Mode::Image,
                Intent::Text => Mode::Chat,
            },
        };
        info!(mode = %mode, forced = input.forced_mode.is_some(), "Routing prompt");
        modes.mode_changed(mode);

        match mode {
            Mode::Image => {
                handlers::handle_image(
                    self.roster.image.as_ref(),
                    prompt,
                    attachment,
                    input.config.aspect_ratio,
                )
                .await
            }
            Mode::Research => {
                handlers::handle_research(self.roster.chat.as_ref(), prompt, attachment).await
            }
            Mode::Code => {
                handlers::handle_code(self.roster.synthesis.as_ref(), prompt, attachment).await
            }
            Mode::Game(game) => handlers::handle_game(self.roster.chat.as_ref(), game, prompt).await,
            Mode::Chat => {
                let results = self.dispatcher.dispatch(prompt, attachment, status).await;
                let text = synthesize(self.roster.synthesis.as_ref(), prompt, &results).await;
                UnifiedResult::new(text, CHAT_LABEL)
            }
        }
    }
}
