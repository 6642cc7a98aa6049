//! Agent query unit: one persona-framed backend call.

use crate::persona::Persona;
use azai_abstraction::{Attachment, Model, ModelParameters, ModelRequest};
use tracing::{debug, warn};

/// Sampling temperature for persona calls.
pub const AGENT_TEMPERATURE: f32 = 0.7;

/// One persona's contribution to a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentResult {
    /// Persona that produced this text.
    pub persona_id: String,
    /// Raw reply; empty when the persona contributed nothing.
    pub text: String,
    /// Whether the backend call failed.
    pub failed: bool,
}

impl AgentResult {
    /// Whether this result carries usable text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Builds the request sent for one persona.
#[must_use]
pub fn build_agent_request(
    persona: &Persona,
    prompt: &str,
    attachment: Option<&Attachment>,
) -> ModelRequest {
    ModelRequest::new(prompt)
        .with_system_instruction(persona.instruction.clone())
        .with_attachment(attachment.cloned())
        .with_parameters(ModelParameters::with_temperature(AGENT_TEMPERATURE))
}

/// Queries the backend as `persona`. Failures become an empty contribution.
pub async fn query_agent(
    model: &dyn Model,
    persona: &Persona,
    prompt: &str,
    attachment: Option<&Attachment>,
) -> AgentResult {
    let request = build_agent_request(persona, prompt, attachment);

    match model.generate(&request).await {
        Ok(response) => {
            debug!(
                persona_id = %persona.id,
                chars = response.content.len(),
                "Agent responded"
            );
            AgentResult { persona_id: persona.id.clone(), text: response.content, failed: false }
        }
        Err(e) => {
            warn!(persona_id = %persona.id, error = %e, "Agent query failed");
            AgentResult { persona_id: persona.id.clone(), text: String::new(), failed: true }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use azai_abstraction::{ModelError, ModelResponse};

    struct FailingModel;

    #[async_trait]
    impl Model for FailingModel {
        async fn generate(&self, _request: &ModelRequest) -> Result<ModelResponse, ModelError> {
            Err(ModelError::RequestError("connection refused".to_string()))
        }

        fn model_id(&self) -> &str {
            "failing"
        }
    }

    struct EchoModel;

    #[async_trait]
    impl Model for EchoModel {
        async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
            Ok(ModelResponse::text(format!(
                "{} / {}",
                request.system_instruction.as_deref().unwrap_or(""),
                request.prompt
            )))
        }

        fn model_id(&self) -> &str {
            "echo"
        }
    }

    fn persona() -> Persona {
        Persona::new("terse", "Terse", "red", "Be terse.")
    }

    #[test]
    fn test_build_agent_request() {
        let attachment = Attachment::new("image/png", vec![1, 2]);
        let request = build_agent_request(&persona(), "hi", Some(&attachment));
        assert_eq!(request.system_instruction.as_deref(), Some("Be terse."));
        assert_eq!(request.prompt, "hi");
        assert_eq!(request.attachment, Some(attachment));
        assert_eq!(request.parameters.temperature, Some(AGENT_TEMPERATURE));
        assert!(!request.parameters.enable_grounding);
    }

    #[tokio::test]
    async fn test_query_agent_success() {
        let result = query_agent(&EchoModel, &persona(), "hi", None).await;
        assert_eq!(result.persona_id, "terse");
        assert_eq!(result.text, "Be terse. / hi");
        assert!(!result.failed);
    }

    #[tokio::test]
    async fn test_query_agent_failure_is_empty() {
        let result = query_agent(&FailingModel, &persona(), "hi", None).await;
        assert_eq!(result.persona_id, "terse");
        assert!(result.text.is_empty());
        assert!(result.is_empty());
        assert!(result.failed);
    }
}
