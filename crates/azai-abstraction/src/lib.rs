//! Model abstraction layer for AZ AI.
//!
//! This module defines the core trait and types for talking to a generative
//! backend. A request is a single turn: an optional system instruction, the
//! user prompt, an optional inline attachment and sampling parameters. A
//! response carries text, an optional inline image and any grounding
//! citations the backend attached.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Represents an error that can occur when interacting with an AI model.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelError {
    /// An error occurred during the API request (e.g., network issues, invalid request).
    #[error("Request Error: {0}")]
    RequestError(String),

    /// The model returned an error (e.g., invalid input, blocked content).
    #[error("Model Response Error: {0}")]
    ModelResponseError(String),

    /// An error occurred during serialization or deserialization.
    #[error("Serialization Error: {0}")]
    SerializationError(String),

    /// The model provider is not supported or configured.
    #[error("Unsupported Model Provider: {0}")]
    UnsupportedModelProvider(String),

    /// A request parameter could not be understood.
    #[error("Invalid Parameter: {0}")]
    InvalidParameter(String),

    /// Provider quota exceeded or rate limit hit.
    #[error("Provider '{provider}' quota exceeded{}", message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
    QuotaExceeded {
        /// The provider name (e.g., "gemini").
        provider: String,
        /// Optional error message from the provider.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

/// A binary payload travelling with a prompt or a response, e.g. an image.
///
/// Serializes with the payload base64-encoded so it can be embedded in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// MIME type of the payload (e.g. "image/png").
    pub mime_type: String,
    /// Raw payload bytes.
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl Attachment {
    /// Creates an attachment from raw bytes.
    #[must_use]
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self { mime_type: mime_type.into(), data }
    }

    /// Decodes a base64 payload into an attachment.
    ///
    /// # Errors
    /// Returns `ModelError::SerializationError` when `encoded` is not valid base64.
    pub fn from_base64(mime_type: impl Into<String>, encoded: &str) -> Result<Self, ModelError> {
        let data = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| ModelError::SerializationError(format!("Invalid base64 payload: {}", e)))?;
        Ok(Self::new(mime_type, data))
    }

    /// Returns the payload base64-encoded.
    #[must_use]
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Returns true if the payload is an image.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Suggested file extension for the payload.
    #[must_use]
    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "bin",
        }
    }
}

mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// Aspect ratio requested for generated images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1
    #[default]
    #[serde(rename = "1:1")]
    Square,
    /// 16:9
    #[serde(rename = "16:9")]
    Landscape,
    /// 9:16
    #[serde(rename = "9:16")]
    Portrait,
    /// 4:3
    #[serde(rename = "4:3")]
    Standard,
    /// 3:4
    #[serde(rename = "3:4")]
    Tall,
}

impl AspectRatio {
    /// All supported ratios.
    pub const ALL: [Self; 5] =
        [Self::Square, Self::Landscape, Self::Portrait, Self::Standard, Self::Tall];

    /// The ratio as the backend expects it (e.g. "16:9").
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::Standard => "4:3",
            Self::Tall => "3:4",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == s.trim())
            .ok_or_else(|| {
                ModelError::InvalidParameter(format!(
                    "unsupported aspect ratio '{}' (expected one of 1:1, 16:9, 9:16, 4:3, 3:4)",
                    s
                ))
            })
    }
}

/// Parameters for controlling the model's generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// What sampling temperature to use, between 0 and 2.
    pub temperature: Option<f32>,

    /// The maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Enables real-time web search grounding.
    #[serde(default)]
    pub enable_grounding: bool,

    /// Requests an image output with the given aspect ratio.
    pub aspect_ratio: Option<AspectRatio>,
}

impl ModelParameters {
    /// Parameters with only a temperature set.
    #[must_use]
    pub fn with_temperature(temperature: f32) -> Self {
        Self { temperature: Some(temperature), ..Self::default() }
    }
}

/// A single-turn request to a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelRequest {
    /// Framing instruction sent separately from the user content.
    pub system_instruction: Option<String>,
    /// The user prompt.
    pub prompt: String,
    /// Optional inline binary part sent alongside the prompt.
    pub attachment: Option<Attachment>,
    /// Generation parameters.
    pub parameters: ModelParameters,
}

impl ModelRequest {
    /// Creates a request for the given prompt with default parameters.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), ..Self::default() }
    }

    /// Sets the system instruction.
    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Attaches an optional inline payload.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Option<Attachment>) -> Self {
        self.attachment = attachment;
        self
    }

    /// Sets the generation parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: ModelParameters) -> Self {
        self.parameters = parameters;
        self
    }
}

/// A web source the backend used to ground its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Human-readable title of the source.
    pub title: String,
    /// Link to the source.
    pub uri: String,
}

/// Usage statistics for a model request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUsage {
    /// Number of tokens in the prompt.
    pub prompt_tokens: u32,

    /// Number of tokens in the completion.
    pub completion_tokens: u32,

    /// Total number of tokens used.
    pub total_tokens: u32,
}

/// The response from a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The generated text (empty when the backend returned none).
    pub content: String,

    /// Inline image returned by the backend, if any.
    pub image: Option<Attachment>,

    /// Grounding sources, in the order the backend listed them.
    #[serde(default)]
    pub citations: Vec<Citation>,

    /// Optional: The ID of the model used to generate the response.
    pub model_id: Option<String>,

    /// Optional: Usage statistics for the request.
    pub usage: Option<ModelUsage>,
}

impl ModelResponse {
    /// A text-only response.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self { content: content.into(), ..Self::default() }
    }
}

/// A trait for interacting with a generative backend.
///
/// All models must be `Send + Sync` to allow concurrent use across tasks.
#[async_trait]
pub trait Model: Send + Sync {
    /// Generates a response for a single-turn request.
    ///
    /// # Errors
    /// Returns a `ModelError` if generation fails.
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError>;

    /// Returns the ID of the model.
    fn model_id(&self) -> &str;
}
