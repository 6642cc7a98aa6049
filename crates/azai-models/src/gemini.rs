//! Google Gemini model implementation.
//!
//! This module provides an implementation of the `Model` trait for Google's
//! Gemini `generateContent` endpoint, including inline image parts, Google
//! Search grounding and image output.

use async_trait::async_trait;
use azai_abstraction::{
    Attachment, Citation, Model, ModelError, ModelRequest, ModelResponse, ModelUsage,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini model implementation.
#[derive(Debug, Clone)]
pub struct GeminiModel {
    /// The model ID (e.g., "gemini-2.5-flash").
    model_id: String,
    /// The API key for authentication.
    api_key: String,
    /// The base URL for the Gemini API.
    base_url: String,
    /// HTTP client for making requests.
    client: Client,
}

impl GeminiModel {
    /// Creates a new `GeminiModel` with the given model ID.
    ///
    /// # Arguments
    /// * `model_id` - The Gemini model ID to use (e.g., "gemini-2.5-flash")
    ///
    /// # Errors
    /// Returns a `ModelError` if the API key is not found in environment variables.
    #[allow(clippy::disallowed_methods)] // env::var is needed for API key loading
    pub fn new(model_id: String) -> Result<Self, ModelError> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
            ModelError::UnsupportedModelProvider(
                "GEMINI_API_KEY environment variable not set".to_string(),
            )
        })?;

        Ok(Self::with_api_key(model_id, api_key))
    }

    /// Creates a new `GeminiModel` with a custom API key.
    ///
    /// # Arguments
    /// * `model_id` - The Gemini model ID to use
    /// * `api_key` - The API key for authentication
    #[must_use]
    pub fn with_api_key(model_id: String, api_key: String) -> Self {
        Self {
            model_id,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Points the model at a different API root (proxies, test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builds the wire request for a single-turn `ModelRequest`.
    fn build_request(request: &ModelRequest) -> GeminiRequest {
        let mut parts = Vec::with_capacity(2);
        if let Some(attachment) = &request.attachment {
            parts.push(GeminiPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: attachment.mime_type.clone(),
                    data: attachment.to_base64(),
                },
            });
        }
        if !request.prompt.is_empty() || parts.is_empty() {
            parts.push(GeminiPart::Text { text: request.prompt.clone() });
        }

        let params = &request.parameters;
        let image_output = params.aspect_ratio.is_some();
        let generation_config = if params.temperature.is_some()
            || params.max_tokens.is_some()
            || image_output
        {
            Some(GeminiGenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_tokens,
                response_modalities: image_output
                    .then(|| vec!["TEXT".to_string(), "IMAGE".to_string()]),
                image_config: params
                    .aspect_ratio
                    .map(|ratio| GeminiImageConfig { aspect_ratio: ratio.to_string() }),
            })
        } else {
            None
        };

        GeminiRequest {
            contents: vec![GeminiContent { role: Some("user".to_string()), parts }],
            generation_config,
            system_instruction: request.system_instruction.as_ref().map(|text| {
                GeminiSystemInstruction { parts: vec![GeminiPart::Text { text: text.clone() }] }
            }),
            tools: params
                .enable_grounding
                .then(|| vec![GeminiTool { google_search: GeminiGoogleSearch {} }]),
        }
    }

    /// Converts a decoded API response into a `ModelResponse`.
    fn parse_response(&self, response: GeminiResponse) -> Result<ModelResponse, ModelError> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            error!(reason = %reason, "No candidates in Gemini API response");
            return Err(ModelError::ModelResponseError(format!(
                "No content in API response ({})",
                reason
            )));
        };

        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
        if parts.is_empty() {
            if let Some(reason) = candidate.finish_reason.filter(|r| r.as_str() != "STOP") {
                warn!(finish_reason = %reason, "Gemini candidate finished without content");
                return Err(ModelError::ModelResponseError(format!(
                    "Response finished without content: {}",
                    reason
                )));
            }
        }

        let mut content = String::new();
        let mut image = None;
        for part in parts {
            match part {
                GeminiPart::Text { text } => content.push_str(&text),
                GeminiPart::InlineData { inline_data } => {
                    if image.is_none() {
                        image = Some(Attachment::from_base64(
                            inline_data.mime_type,
                            &inline_data.data,
                        )?);
                    }
                }
                GeminiPart::Other(value) => {
                    debug!(part = %value, "Skipping unsupported Gemini response part");
                }
            }
        }

        let citations = candidate
            .grounding_metadata
            .map(|meta| {
                meta.grounding_chunks
                    .into_iter()
                    .filter_map(|chunk| chunk.web)
                    .filter_map(|web| {
                        let uri = web.uri?;
                        let title = web.title.filter(|t| !t.is_empty()).unwrap_or_else(|| uri.clone());
                        Some(Citation { title, uri })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let usage = response.usage_metadata.map(|meta| ModelUsage {
            prompt_tokens: meta.prompt_token_count.unwrap_or(0),
            completion_tokens: meta.candidates_token_count.unwrap_or(0),
            total_tokens: meta.total_token_count.unwrap_or(0),
        });

        Ok(ModelResponse {
            content,
            image,
            citations,
            model_id: Some(self.model_id.clone()),
            usage,
        })
    }
}

#[async_trait]
impl Model for GeminiModel {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        debug!(
            model_id = %self.model_id,
            prompt_len = request.prompt.len(),
            has_attachment = request.attachment.is_some(),
            parameters = ?request.parameters,
            "GeminiModel generating content"
        );

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model_id);
        let request_body = Self::build_request(request);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send request to Gemini API");
                ModelError::RequestError(format!("Network error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!(
                status = %status,
                error = %error_text,
                "Gemini API returned error status"
            );

            // 429 covers both quota exhaustion and rate limiting
            if status == 402 || status == 429 {
                return Err(ModelError::QuotaExceeded {
                    provider: "gemini".to_string(),
                    message: Some(error_text),
                });
            }

            return Err(ModelError::ModelResponseError(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse Gemini API response");
            ModelError::SerializationError(format!("Failed to parse response: {}", e))
        })?;

        self.parse_response(gemini_response)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// Gemini API request/response structures

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTool>>,
}

#[derive(Debug, Clone, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inline_data", alias = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiInlineData {
    #[serde(rename = "mime_type", alias = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(rename = "responseModalities", skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(rename = "imageConfig", skip_serializing_if = "Option::is_none")]
    image_config: Option<GeminiImageConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiImageConfig {
    #[serde(rename = "aspectRatio")]
    aspect_ratio: String,
}

#[derive(Debug, Serialize)]
struct GeminiTool {
    google_search: GeminiGoogleSearch,
}

#[derive(Debug, Serialize)]
struct GeminiGoogleSearch {}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsageMetadata>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GeminiGroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiPromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(clippy::struct_field_names)] // Matches API naming
struct GeminiUsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt_token_count: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidates_token_count: Option<u32>,
    #[serde(rename = "totalTokenCount")]
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiGroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GeminiGroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GeminiGroundingChunk {
    web: Option<GeminiWebSource>,
}

#[derive(Debug, Deserialize)]
struct GeminiWebSource {
    uri: Option<String>,
    title: Option<String>,
}
