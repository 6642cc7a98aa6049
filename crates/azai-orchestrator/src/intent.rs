//! Intent classification: does a prompt ask for text or for an image?

use azai_abstraction::{Model, ModelParameters, ModelRequest};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Visual-generation words that route straight to image handling.
///
/// Most stems match anywhere in a word ("paintbrush", "selfportrait").
/// `draw`, `photo` and `logo` are anchored so "withdraw", "photosynthesis"
/// and "logout" stay text.
static IMAGE_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:image|paint|portrait|picture|sketch|illustrat|artwork|wallpaper)|\b(?:re)?draw|\bphoto(?:s|graph\w*)?\b|\blogos?\b",
    )
    .expect("image keyword regex should be valid")
});

const CLASSIFIER_INSTRUCTION: &str = "You are an intent classifier. Decide whether the user wants a written answer or a generated image. Reply with exactly one word: TEXT or IMAGE.";

/// Output cap for the classification call.
const CLASSIFIER_MAX_TOKENS: u32 = 5;

/// What kind of output a prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Written answer via the fan-out path.
    Text,
    /// Generated or edited image.
    Image,
}

/// Returns true if the prompt contains a visual-generation keyword.
#[must_use]
pub fn has_image_keyword(prompt: &str) -> bool {
    IMAGE_KEYWORDS.is_match(&prompt.to_lowercase())
}

/// Interprets a classifier reply. Only a leading `IMAGE` counts.
#[must_use]
pub fn parse_classification(reply: &str) -> Intent {
    let first = reply
        .split_whitespace()
        .next()
        .map(|word| word.trim_matches(|c: char| !c.is_ascii_alphabetic()).to_ascii_uppercase());
    match first.as_deref() {
        Some("IMAGE") => Intent::Image,
        _ => Intent::Text,
    }
}

/// Classifies a prompt. Never fails; anything unclear is `Intent::Text`.
pub async fn classify(model: &dyn Model, prompt: &str, has_attachment: bool) -> Intent {
    if has_image_keyword(prompt) {
        debug!("Image keyword matched, skipping classifier call");
        return Intent::Image;
    }

    let request = ModelRequest::new(format!(
        "Attachment present: {}\nRequest: {}",
        if has_attachment { "yes" } else { "no" },
        prompt
    ))
    .with_system_instruction(CLASSIFIER_INSTRUCTION)
    .with_parameters(ModelParameters {
        temperature: Some(0.0),
        max_tokens: Some(CLASSIFIER_MAX_TOKENS),
        ..ModelParameters::default()
    });

    match model.generate(&request).await {
        Ok(response) => {
            let intent = parse_classification(&response.content);
            debug!(reply = %response.content.trim(), ?intent, "Classifier replied");
            intent
        }
        Err(e) => {
            warn!(error = %e, "Intent classification failed, defaulting to text");
            Intent::Text
        }
    }
}
