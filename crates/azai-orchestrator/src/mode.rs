//! Handling modes for an orchestration run.

use crate::error::OrchestrationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The handling path selected for a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", content = "game_type", rename_all = "snake_case")]
pub enum Mode {
    /// Multi-persona fan-out followed by synthesis.
    Chat,
    /// Image generation or editing.
    Image,
    /// Search-grounded answer with citations.
    Research,
    /// Code generation and fixing.
    Code,
    /// Text game turn.
    Game(GameType),
}

impl Mode {
    /// Short name of the mode (game type omitted).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Image => "image",
            Self::Research => "research",
            Self::Code => "code",
            Self::Game(_) => "game",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Game(game) => write!(f, "game:{}", game),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for Mode {
    type Err = OrchestrationError;

    /// Parses `chat`, `image`, `research`, `code`, `game` (custom rules) or
    /// `game:<type>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if let Some(game) = lower.strip_prefix("game:") {
            return Ok(Self::Game(game.parse()?));
        }
        match lower.as_str() {
            "chat" => Ok(Self::Chat),
            "image" => Ok(Self::Image),
            "research" => Ok(Self::Research),
            "code" => Ok(Self::Code),
            "game" => Ok(Self::Game(GameType::Custom)),
            _ => Err(OrchestrationError::UnknownMode(s.to_string())),
        }
    }
}

/// The games the game master can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameType {
    /// The host thinks of something; the player asks yes/no questions.
    #[serde(rename = "20_questions")]
    TwentyQuestions,
    /// Text role-playing adventure.
    #[serde(rename = "rpg")]
    Rpg,
    /// Multiple-choice quiz.
    #[serde(rename = "trivia")]
    Trivia,
    /// Rules supplied by the player.
    #[serde(rename = "custom", alias = "custom_maker")]
    Custom,
}

impl GameType {
    /// All game types.
    pub const ALL: [Self; 4] = [Self::TwentyQuestions, Self::Rpg, Self::Trivia, Self::Custom];

    /// Wire tag of the game type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwentyQuestions => "20_questions",
            Self::Rpg => "rpg",
            Self::Trivia => "trivia",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = OrchestrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "20_questions" | "20questions" | "twenty_questions" => Ok(Self::TwentyQuestions),
            "rpg" => Ok(Self::Rpg),
            "trivia" => Ok(Self::Trivia),
            "custom" | "custom_maker" => Ok(Self::Custom),
            _ => Err(OrchestrationError::UnknownGameType(s.to_string())),
        }
    }
}
