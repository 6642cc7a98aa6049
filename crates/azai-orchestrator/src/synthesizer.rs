//! Synthesizer: merges persona outputs into one answer.

use crate::agent::AgentResult;
use azai_abstraction::{Model, ModelParameters, ModelRequest};
use std::fmt::Write;
use tracing::{debug, error, warn};

/// Sampling temperature for the synthesis call.
pub const SYNTHESIS_TEMPERATURE: f32 = 0.5;

/// Returned when the synthesis call fails.
pub const SYNTHESIS_ERROR_TEXT: &str = "An error occurred while synthesizing the final answer.";

/// Returned when there is nothing to synthesize or the backend replies with nothing.
pub const SYNTHESIS_EMPTY_TEXT: &str = "I apologize, but I was unable to synthesize a final response.";

const SYNTHESIS_SYSTEM_INSTRUCTION: &str = "You are AZ AI. You are helpful, professional, and neutral.";

/// Tags each contribution with its persona id.
#[must_use]
pub fn build_context(results: &[AgentResult]) -> String {
    let mut context = String::new();
    for result in results {
        let _ = write!(
            context,
            "\n--- START RESPONSE FROM MODEL ({id}) ---\n{text}\n--- END RESPONSE FROM MODEL ({id}) ---\n",
            id = result.persona_id,
            text = result.text
        );
    }
    context
}

/// Builds the synthesis instruction around the original prompt.
#[must_use]
pub fn build_synthesis_prompt(prompt: &str, results: &[AgentResult]) -> String {
    format!(
        r#"You are AZ AI, an advanced intelligence engine.
Original User Query: "{prompt}"

Given the following responses from multiple AI models (provided below), analyze them and produce a single unified answer.

Instructions:
1. Remove duplicate content.
2. Resolve contradictions by choosing the most logically consistent explanation.
3. Merge complementary details into a cohesive whole.
4. Improve clarity, structure, and correctness.
5. Use a friendly and professional tone.
6. NEVER mention or imply the names of the original AIs (like ChatGPT, Gemini, etc.) or that this is a synthesized answer. Speak with one authoritative voice as AZ AI.
7. Format the output nicely with Markdown.
{context}"#,
        context = build_context(results)
    )
}

/// Produces the final answer. Never fails; problems become fixed fallback text.
pub async fn synthesize(model: &dyn Model, prompt: &str, results: &[AgentResult]) -> String {
    if results.iter().all(AgentResult::is_empty) {
        warn!(agents = results.len(), "No persona contributed, skipping synthesis");
        return SYNTHESIS_EMPTY_TEXT.to_string();
    }

    let request = ModelRequest::new(build_synthesis_prompt(prompt, results))
        .with_system_instruction(SYNTHESIS_SYSTEM_INSTRUCTION)
        .with_parameters(ModelParameters::with_temperature(SYNTHESIS_TEMPERATURE));

    match model.generate(&request).await {
        Ok(response) if response.content.trim().is_empty() => {
            warn!("Synthesis returned empty text");
            SYNTHESIS_EMPTY_TEXT.to_string()
        }
        Ok(response) => {
            debug!(chars = response.content.len(), "Synthesis complete");
            response.content
        }
        Err(e) => {
            error!(error = %e, "Synthesis failed");
            SYNTHESIS_ERROR_TEXT.to_string()
        }
    }
}
