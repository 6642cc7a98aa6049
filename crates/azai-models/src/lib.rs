//! Model implementations for AZ AI.
//!
//! This crate provides concrete implementations of the `Model` trait.
//!
//! # Supported Providers
//!
//! - **Mock**: Offline testing and demos
//! - **Gemini**: Google's Gemini models (API key required)

pub mod factory;
pub mod gemini;

use async_trait::async_trait;
use azai_abstraction::{Attachment, Citation, Model, ModelError, ModelRequest, ModelResponse, ModelUsage};
use tracing::debug;

pub use factory::{ModelConfig, ModelFactory, ModelType};
pub use gemini::GeminiModel;

/// A 1x1 transparent PNG returned by `MockModel` for image requests.
const MOCK_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// A mock implementation of the `Model` trait for testing and demonstration.
///
/// Echoes the prompt, returns a placeholder PNG when an aspect ratio is
/// requested and a placeholder citation when grounding is enabled.
#[derive(Debug, Default)]
pub struct MockModel {
    id: String,
}

impl MockModel {
    /// Creates a new `MockModel` with the given ID.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self { id }
    }
}

#[async_trait]
impl Model for MockModel {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        use std::fmt::Write;

        debug!(
            model_id = %self.id,
            prompt = %request.prompt,
            parameters = ?request.parameters,
            "MockModel generating content"
        );

        let framing = request
            .system_instruction
            .as_deref()
            .and_then(|s| s.lines().next())
            .unwrap_or("no framing");
        let mut content = format!("Mock response for: {}\nFraming: {framing}", request.prompt);
        if let Some(attachment) = &request.attachment {
            let _ = write!(
                content,
                "\nAttachment: {} ({} bytes)",
                attachment.mime_type,
                attachment.data.len()
            );
        }

        let image = request
            .parameters
            .aspect_ratio
            .map(|_| Attachment::new("image/png", MOCK_PNG.to_vec()));

        let citations = if request.parameters.enable_grounding {
            vec![Citation {
                title: "Mock source".to_string(),
                uri: "https://example.com/mock-source".to_string(),
            }]
        } else {
            Vec::new()
        };

        let prompt_tokens = count_tokens(&request.prompt);
        let completion_tokens = count_tokens(&content);

        Ok(ModelResponse {
            content,
            image,
            citations,
            model_id: Some(self.id.clone()),
            usage: Some(ModelUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            }),
        })
    }

    fn model_id(&self) -> &str {
        &self.id
    }
}

/// Count tokens in a string (simplified: word count).
#[allow(clippy::cast_possible_truncation)]
fn count_tokens(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use azai_abstraction::{AspectRatio, ModelParameters};

    #[tokio::test]
    async fn test_mock_echoes_prompt_and_framing() {
        let model = MockModel::new("mock".to_string());
        let request = ModelRequest::new("hello there").with_system_instruction("Be terse.\nMore.");
        let response = model.generate(&request).await.unwrap();

        assert!(response.content.contains("hello there"));
        assert!(response.content.contains("Framing: Be terse."));
        assert!(response.image.is_none());
        assert!(response.citations.is_empty());
        assert_eq!(response.usage.unwrap().prompt_tokens, 2);
    }

    #[tokio::test]
    async fn test_mock_image_and_grounding() {
        let model = MockModel::new("mock".to_string());
        let request = ModelRequest::new("draw").with_parameters(ModelParameters {
            enable_grounding: true,
            aspect_ratio: Some(AspectRatio::Square),
            ..ModelParameters::default()
        });
        let response = model.generate(&request).await.unwrap();

        let image = response.image.unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(&image.data[1..4], b"PNG");
        assert_eq!(response.citations.len(), 1);
    }

    #[test]
    fn test_count_tokens() {
        assert_eq!(count_tokens(""), 0);
        assert_eq!(count_tokens("  one two\tthree\n"), 3);
    }
}
