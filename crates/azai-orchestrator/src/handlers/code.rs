//! Code assistant.

use super::CODE_LABEL;
use crate::UnifiedResult;
use azai_abstraction::{Attachment, Model, ModelParameters, ModelRequest};
use tracing::{info, warn};

/// Sampling temperature for code answers.
pub const CODE_TEMPERATURE: f32 = 0.2;

/// Returned when the code call failed.
pub const CODE_ERROR_TEXT: &str = "The code assistant ran into a problem. Please try again.";

const CODE_INSTRUCTION: &str = "You are AZ AI Code, an expert software engineer. Write new code or fix the code the user provides. \
Always return complete, runnable code in fenced code blocks tagged with the language. \
Keep explanations short and put them after the code. When fixing code, briefly state what was wrong.";

/// Generates or fixes code in one call.
pub async fn handle_code(
    model: &dyn Model,
    prompt: &str,
    attachment: Option<&Attachment>,
) -> UnifiedResult {
    info!("Running code handler");

    let request = ModelRequest::new(prompt)
        .with_system_instruction(CODE_INSTRUCTION)
        .with_attachment(attachment.cloned())
        .with_parameters(ModelParameters::with_temperature(CODE_TEMPERATURE));

    match model.generate(&request).await {
        Ok(response) => UnifiedResult::new(response.content, CODE_LABEL),
        Err(e) => {
            warn!(error = %e, "Code request failed");
            UnifiedResult::new(CODE_ERROR_TEXT, CODE_LABEL)
        }
    }
}
