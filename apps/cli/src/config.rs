//! CLI configuration file support.
//!
//! Configuration precedence:
//! 1. CLI arguments (handled by clap)
//! 2. Environment variables (`AZAI_ENGINE`, `GEMINI_API_KEY`)
//! 3. File passed with `--config`
//! 4. Local config file (./.azairc)
//! 5. Global config file (~/.azai/config.toml)
//! 6. Defaults

use azai_abstraction::AspectRatio;
use azai_orchestrator::{Persona, PersonaTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default engine when nothing is configured.
pub const DEFAULT_ENGINE: &str = "gemini";

/// Default model for persona agents, classification, research and games.
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";

/// Default model for synthesis and code.
pub const DEFAULT_SYNTHESIS_MODEL: &str = "gemini-3-pro-preview";

/// Default model for image generation.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// CLI configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Backend engine (gemini, mock)
    #[serde(default)]
    pub engine: Option<String>,

    /// API key for the backend
    #[serde(default)]
    pub api_key: Option<String>,

    /// API root override
    #[serde(default)]
    pub base_url: Option<String>,

    /// Log level
    #[serde(default)]
    pub log_level: Option<String>,

    /// Where generated images are written
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Default aspect ratio for images (e.g. "16:9")
    #[serde(default)]
    pub aspect_ratio: Option<String>,

    /// Show failed personas as errors instead of complete
    #[serde(default)]
    pub report_failures: Option<bool>,

    /// Per-stage model ids
    #[serde(default)]
    pub models: ModelsConfig,

    /// Persona table override
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub personas: Vec<Persona>,
}

/// Model ids per orchestration stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Classifier, personas, research and games
    #[serde(default)]
    pub chat: Option<String>,

    /// Synthesis and code
    #[serde(default)]
    pub synthesis: Option<String>,

    /// Image generation
    #[serde(default)]
    pub image: Option<String>,
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum CliConfigError {
    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(String),

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Result type for configuration operations.
pub type CliConfigResult<T> = std::result::Result<T, CliConfigError>;

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> CliConfigResult<Self> {
        if !path.exists() {
            return Err(CliConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CliConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        toml::from_str(&content)
            .map_err(|e| CliConfigError::ParseError(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> CliConfigResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CliConfigError::ParseError(format!("Failed to serialize: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CliConfigError::ReadError(format!("Failed to create directory: {}", e)))?;
        }

        std::fs::write(path, content)
            .map_err(|e| CliConfigError::ReadError(format!("Failed to write file: {}", e)))?;

        Ok(())
    }

    /// Get default global configuration file path.
    pub fn default_global_path() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".azai").join("config.toml")
    }

    /// Get default local configuration file path.
    pub fn default_local_path() -> PathBuf {
        PathBuf::from(".azairc")
    }

    /// Discover and load configuration files.
    ///
    /// Local config overrides global config. Missing files are skipped;
    /// unreadable or malformed ones are errors.
    pub fn discover_and_load() -> CliConfigResult<Self> {
        let mut config = Self::default();
        for path in [Self::default_global_path(), Self::default_local_path()] {
            match Self::load_from_file(&path) {
                Ok(found) => config.merge(&found),
                Err(CliConfigError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(config)
    }

    /// Discovers config files, layers `explicit` on top, then applies the
    /// process environment.
    pub fn load(explicit: Option<&Path>) -> CliConfigResult<Self> {
        let mut config = Self::discover_and_load()?;
        if let Some(path) = explicit {
            config.merge(&Self::load_from_file(path)?);
        }
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Merge another configuration into this one.
    ///
    /// Values from `other` override values in `self` if they are Some. A
    /// non-empty persona list replaces the current one.
    pub fn merge(&mut self, other: &Self) {
        if let Some(ref engine) = other.engine {
            self.engine = Some(engine.clone());
        }
        if let Some(ref api_key) = other.api_key {
            self.api_key = Some(api_key.clone());
        }
        if let Some(ref base_url) = other.base_url {
            self.base_url = Some(base_url.clone());
        }
        if let Some(ref chat) = other.models.chat {
            self.models.chat = Some(chat.clone());
        }
        if let Some(ref synthesis) = other.models.synthesis {
            self.models.synthesis = Some(synthesis.clone());
        }
        if let Some(ref image) = other.models.image {
            self.models.image = Some(image.clone());
        }
        if let Some(ref log_level) = other.log_level {
            self.log_level = Some(log_level.clone());
        }
        if let Some(ref output_dir) = other.output_dir {
            self.output_dir = Some(output_dir.clone());
        }
        if let Some(ref aspect_ratio) = other.aspect_ratio {
            self.aspect_ratio = Some(aspect_ratio.clone());
        }
        if let Some(report_failures) = other.report_failures {
            self.report_failures = Some(report_failures);
        }
        if !other.personas.is_empty() {
            self.personas = other.personas.clone();
        }
    }

    /// Overrides values from environment variables.
    ///
    /// `lookup` maps a variable name to its value.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(engine) = lookup("AZAI_ENGINE").filter(|v| !v.is_empty()) {
            self.engine = Some(engine);
        }
        if let Some(api_key) = lookup("GEMINI_API_KEY").filter(|v| !v.is_empty()) {
            self.api_key = Some(api_key);
        }
    }

    /// Engine name, defaulting to gemini.
    pub fn engine(&self) -> &str {
        self.engine.as_deref().unwrap_or(DEFAULT_ENGINE)
    }

    /// Model id for the chat stage.
    pub fn chat_model(&self) -> &str {
        self.models.chat.as_deref().unwrap_or(DEFAULT_CHAT_MODEL)
    }

    /// Model id for the synthesis stage.
    pub fn synthesis_model(&self) -> &str {
        self.models.synthesis.as_deref().unwrap_or(DEFAULT_SYNTHESIS_MODEL)
    }

    /// Model id for the image stage.
    pub fn image_model(&self) -> &str {
        self.models.image.as_deref().unwrap_or(DEFAULT_IMAGE_MODEL)
    }

    /// Directory for generated images, defaulting to the current directory.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Configured aspect ratio, or 1:1.
    pub fn aspect_ratio(&self) -> CliConfigResult<AspectRatio> {
        self.aspect_ratio.as_deref().map_or(Ok(AspectRatio::default()), |value| {
            value.parse().map_err(|e| CliConfigError::InvalidValue(format!("aspect_ratio: {}", e)))
        })
    }

    /// Configured personas, or the built-in five.
    pub fn persona_table(&self) -> CliConfigResult<PersonaTable> {
        if self.personas.is_empty() {
            return Ok(PersonaTable::default());
        }
        PersonaTable::new(self.personas.clone())
            .map_err(|e| CliConfigError::InvalidValue(format!("personas: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let config_content = r#"
engine = "mock"
api_key = "secret"
log_level = "debug"
output_dir = "/tmp/azai"
aspect_ratio = "16:9"
report_failures = true

[models]
chat = "fast-model"
image = "image-model"

[[personas]]
id = "poet"
name = "Poet"
color = "yellow"
instruction = "Answer in verse."

[[personas]]
id = "critic"
name = "Critic"
color = "red"
instruction = "Find the flaws."
"#;

        std::fs::write(&config_path, config_content).unwrap();

        let config = CliConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config.engine(), "mock");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/azai"));
        assert_eq!(config.aspect_ratio().unwrap(), AspectRatio::Landscape);
        assert_eq!(config.report_failures, Some(true));
        assert_eq!(config.chat_model(), "fast-model");
        assert_eq!(config.synthesis_model(), DEFAULT_SYNTHESIS_MODEL);
        assert_eq!(config.image_model(), "image-model");
        assert_eq!(config.persona_table().unwrap().ids(), vec!["poet", "critic"]);
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.engine(), DEFAULT_ENGINE);
        assert_eq!(config.chat_model(), DEFAULT_CHAT_MODEL);
        assert_eq!(config.aspect_ratio().unwrap(), AspectRatio::Square);
        assert_eq!(config.persona_table().unwrap().len(), 5);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = CliConfig::load_from_file(&temp_dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, CliConfigError::NotFound(_)));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "engine = [").unwrap();
        let err = CliConfig::load_from_file(&config_path).unwrap_err();
        assert!(matches!(err, CliConfigError::ParseError(_)));
    }

    #[test]
    fn test_merge() {
        let mut config1 = CliConfig {
            engine: Some("gemini".to_string()),
            models: ModelsConfig { chat: Some("a".to_string()), ..Default::default() },
            ..Default::default()
        };

        let config2 = CliConfig {
            engine: Some("mock".to_string()),
            models: ModelsConfig { image: Some("b".to_string()), ..Default::default() },
            personas: vec![Persona::new("solo", "Solo", "white", "Be brief.")],
            ..Default::default()
        };

        config1.merge(&config2);
        assert_eq!(config1.engine(), "mock");
        assert_eq!(config1.chat_model(), "a");
        assert_eq!(config1.image_model(), "b");
        assert_eq!(config1.personas.len(), 1);

        // An empty persona list leaves the existing one alone.
        config1.merge(&CliConfig::default());
        assert_eq!(config1.personas.len(), 1);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [("AZAI_ENGINE", "mock"), ("GEMINI_API_KEY", "from-env")].into();
        let mut config = CliConfig { engine: Some("gemini".to_string()), ..Default::default() };
        config.apply_env_overrides(|key| env.get(key).map(|v| (*v).to_string()));
        assert_eq!(config.engine(), "mock");
        assert_eq!(config.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_invalid_values() {
        let config = CliConfig { aspect_ratio: Some("2:1".to_string()), ..Default::default() };
        assert!(matches!(config.aspect_ratio(), Err(CliConfigError::InvalidValue(_))));

        let config = CliConfig {
            personas: vec![
                Persona::new("dup", "A", "red", "x"),
                Persona::new("dup", "B", "blue", "y"),
            ],
            ..Default::default()
        };
        assert!(matches!(config.persona_table(), Err(CliConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = CliConfig {
            engine: Some("mock".to_string()),
            models: ModelsConfig { synthesis: Some("deep".to_string()), ..Default::default() },
            ..Default::default()
        };

        config.save_to_file(&config_path).unwrap();
        let loaded = CliConfig::load_from_file(&config_path).unwrap();

        assert_eq!(loaded, config);
    }
}
