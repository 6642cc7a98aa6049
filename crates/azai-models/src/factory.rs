//! Model factory for creating model instances from configuration.
//!
//! This module provides functionality to create model instances based on configuration,
//! handling API key loading from environment variables.

use crate::{GeminiModel, MockModel};
use azai_abstraction::{Model, ModelError};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error};

/// Model type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelType {
    /// Mock model for testing and offline demos.
    Mock,
    /// Google Gemini model.
    Gemini,
}

impl FromStr for ModelType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "gemini" | "google" => Ok(Self::Gemini),
            _ => {
                error!(model_type = %s, "Unrecognized model type");
                Err(ModelError::UnsupportedModelProvider(format!("Unrecognized model type: {}", s)))
            }
        }
    }
}

/// Model configuration.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// The type of model to create.
    pub model_type: ModelType,
    /// The model ID (e.g., "gemini-2.5-flash").
    pub model_id: String,
    /// Optional API key (if not provided, will be loaded from environment).
    pub api_key: Option<String>,
    /// Optional API root override.
    pub base_url: Option<String>,
}

impl ModelConfig {
    /// Creates a new `ModelConfig` with the given type and model ID.
    #[must_use]
    pub fn new(model_type: ModelType, model_id: String) -> Self {
        Self { model_type, model_id, api_key: None, base_url: None }
    }

    /// Sets the API key for this configuration.
    #[must_use]
    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Sets the API root for this configuration.
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }
}

/// Factory for creating model instances.
pub struct ModelFactory;

impl ModelFactory {
    /// Creates a model instance from the given configuration.
    ///
    /// # Errors
    /// Returns a `ModelError` if model creation fails (e.g., missing API key).
    pub fn create(config: ModelConfig) -> Result<Arc<dyn Model>, ModelError> {
        debug!(
            model_type = ?config.model_type,
            model_id = %config.model_id,
            "Creating model instance"
        );

        match config.model_type {
            ModelType::Mock => Ok(Arc::new(MockModel::new(config.model_id))),
            ModelType::Gemini => {
                let mut model = if let Some(api_key) = config.api_key {
                    GeminiModel::with_api_key(config.model_id, api_key)
                } else {
                    GeminiModel::new(config.model_id)?
                };
                if let Some(base_url) = config.base_url {
                    model = model.with_base_url(base_url);
                }
                Ok(Arc::new(model))
            }
        }
    }
}
