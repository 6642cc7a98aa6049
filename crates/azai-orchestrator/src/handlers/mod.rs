//! Mode handlers.
//!
//! Each handler is a single request/response exchange with its own framing.
//! Handlers never fail: backend errors come back as fixed fallback text under
//! the handler's label.

pub mod code;
pub mod game;
pub mod image;
pub mod research;

pub use code::handle_code;
pub use game::handle_game;
pub use image::handle_image;
pub use research::{format_citations, handle_research};

/// Attribution for the default fan-out path.
pub const CHAT_LABEL: &str = "AZ AI";
/// Attribution for image results.
pub const IMAGE_LABEL: &str = "Hailuo AI";
/// Attribution for grounded research answers.
pub const RESEARCH_LABEL: &str = "AZ AI Research";
/// Attribution for the code assistant.
pub const CODE_LABEL: &str = "AZ AI Code";
/// Attribution for game turns.
pub const GAME_LABEL: &str = "AZ AI Game Master";
