//! Search-grounded research answers.

use super::RESEARCH_LABEL;
use crate::UnifiedResult;
use azai_abstraction::{Attachment, Citation, Model, ModelParameters, ModelRequest};
use std::collections::HashSet;
use std::fmt::Write;
use tracing::{info, warn};

/// Returned when the research call failed.
pub const RESEARCH_ERROR_TEXT: &str =
    "I couldn't complete the research for that question. Please try again later.";

const RESEARCH_INSTRUCTION: &str = "You are AZ AI Research. Answer using up-to-date information from web search. Be factual, cite specifics such as dates and figures, and say so when sources disagree.";

/// Renders citations as a numbered Markdown list, one entry per distinct link.
///
/// Returns an empty string when there are no citations.
#[must_use]
pub fn format_citations(citations: &[Citation]) -> String {
    let mut seen = HashSet::new();
    let mut out = String::new();
    let mut n = 0;
    for citation in citations.iter().filter(|c| seen.insert(c.uri.as_str())) {
        if n == 0 {
            out.push_str("**Sources:**\n");
        }
        n += 1;
        let _ = writeln!(out, "{n}. [{}]({})", citation.title, citation.uri);
    }
    out
}

/// Answers `prompt` with web grounding and appends the sources.
pub async fn handle_research(
    model: &dyn Model,
    prompt: &str,
    attachment: Option<&Attachment>,
) -> UnifiedResult {
    info!("Running research handler");

    let request = ModelRequest::new(prompt)
        .with_system_instruction(RESEARCH_INSTRUCTION)
        .with_attachment(attachment.cloned())
        .with_parameters(ModelParameters { enable_grounding: true, ..ModelParameters::default() });

    match model.generate(&request).await {
        Ok(response) => {
            let sources = format_citations(&response.citations);
            let text = if sources.is_empty() {
                response.content
            } else if response.content.trim().is_empty() {
                sources.trim_end().to_string()
            } else {
                format!("{}\n\n{}", response.content.trim_end(), sources.trim_end())
            };
            UnifiedResult::new(text, RESEARCH_LABEL)
        }
        Err(e) => {
            warn!(error = %e, "Research request failed");
            UnifiedResult::new(RESEARCH_ERROR_TEXT, RESEARCH_LABEL)
        }
    }
}
