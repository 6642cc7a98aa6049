// Error types for orchestration setup

use thiserror::Error;

/// Result type for orchestration operations
pub type Result<T> = std::result::Result<T, OrchestrationError>;

/// Orchestration errors.
///
/// These only arise while configuring the orchestrator or parsing caller
/// input. A running orchestration never fails; backend errors degrade to
/// fallback text instead.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// The persona table is empty or contains duplicate ids
    #[error("Invalid persona table: {0}")]
    InvalidPersonaTable(String),

    /// Unrecognized mode name
    #[error("Unknown mode '{0}' (expected chat, image, research, code or game)")]
    UnknownMode(String),

    /// Unrecognized game type
    #[error("Unknown game type '{0}' (expected 20_questions, rpg, trivia or custom)")]
    UnknownGameType(String),

    /// Model error
    #[error("Model error: {0}")]
    Model(#[from] azai_abstraction::ModelError),
}
