//! Text games hosted by the game master.

use super::GAME_LABEL;
use crate::UnifiedResult;
use crate::mode::GameType;
use azai_abstraction::{Model, ModelParameters, ModelRequest};
use tracing::{info, warn};

/// Sent in place of an empty prompt on the opening turn.
pub const GAME_START_DIRECTIVE: &str = "Start the game.";

/// Returned when the game call failed.
pub const GAME_ERROR_TEXT: &str = "The game master is unavailable right now. Please try again.";

/// Sampling temperature for game turns.
const GAME_TEMPERATURE: f32 = 0.9;

/// Framing for each game.
#[must_use]
pub const fn game_instruction(game: GameType) -> &'static str {
    match game {
        GameType::TwentyQuestions => {
            "You are the host of a game of 20 Questions. Secretly pick a person, place, or thing. \
The player asks yes/no questions; answer each truthfully with yes, no, or sometimes, and keep count of \
the questions used. When the player guesses correctly or uses all 20 questions, reveal the answer."
        }
        GameType::Rpg => {
            "You are the Dungeon Master of a text role-playing adventure. Describe scenes vividly but briefly, \
track the player's health and inventory, and end every turn by offering a few numbered choices while \
allowing free-form actions."
        }
        GameType::Trivia => {
            "You are a Trivia Quiz Master. Ask one multiple-choice question at a time with options A to D. \
After each answer, say whether it was right, give a one-line explanation, keep score, and ask the next question."
        }
        GameType::Custom => {
            "You are a game engine. The player defines the rules of the game; follow them exactly and \
consistently, keep track of game state, and narrate each turn's outcome clearly."
        }
    }
}

/// Plays one turn of `game`.
pub async fn handle_game(model: &dyn Model, game: GameType, prompt: &str) -> UnifiedResult {
    let opening = prompt.trim().is_empty();
    info!(game = %game, opening, "Running game handler");

    let turn = if opening { GAME_START_DIRECTIVE } else { prompt };
    let request = ModelRequest::new(turn)
        .with_system_instruction(game_instruction(game))
        .with_parameters(ModelParameters::with_temperature(GAME_TEMPERATURE));

    match model.generate(&request).await {
        Ok(response) => UnifiedResult::new(response.content, GAME_LABEL),
        Err(e) => {
            warn!(game = %game, error = %e, "Game turn failed");
            UnifiedResult::new(GAME_ERROR_TEXT, GAME_LABEL)
        }
    }
}
