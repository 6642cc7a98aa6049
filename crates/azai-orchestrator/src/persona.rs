//! Persona table for the fan-out dispatcher.
//!
//! A persona is plain configuration: an instruction string that flavors one
//! agent call plus the display name and color a caller uses for status
//! reporting. The table is fixed once the orchestrator is built.

use crate::error::{OrchestrationError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// A fixed instruction profile used to flavor one agent call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Stable identifier used in status events and synthesis tags.
    pub id: String,
    /// Display name for status reporting.
    pub name: String,
    /// Status color name (e.g. "green", "blue").
    pub color: String,
    /// System instruction sent with every request for this persona.
    pub instruction: String,
}

impl Persona {
    /// Creates a persona.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            instruction: instruction.into(),
        }
    }
}

/// Ordered, validated set of personas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaTable {
    personas: Vec<Persona>,
}

impl PersonaTable {
    /// Builds a table from the given personas.
    ///
    /// # Errors
    /// Returns `OrchestrationError::InvalidPersonaTable` if the list is empty,
    /// an id is blank, or an id appears twice.
    pub fn new(personas: Vec<Persona>) -> Result<Self> {
        if personas.is_empty() {
            return Err(OrchestrationError::InvalidPersonaTable(
                "at least one persona is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for persona in &personas {
            if persona.id.trim().is_empty() {
                return Err(OrchestrationError::InvalidPersonaTable(
                    "persona id must not be empty".to_string(),
                ));
            }
            if !seen.insert(persona.id.as_str()) {
                return Err(OrchestrationError::InvalidPersonaTable(format!(
                    "duplicate persona id '{}'",
                    persona.id
                )));
            }
        }

        debug!(count = personas.len(), "Persona table loaded");
        Ok(Self { personas })
    }

    /// Looks up a persona by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == id)
    }

    /// Iterates personas in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }

    /// Persona ids in configuration order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.personas.iter().map(|p| p.id.as_str()).collect()
    }

    /// Number of personas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.personas.len()
    }

    /// Always false; a table holds at least one persona.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

impl Default for PersonaTable {
    /// The five simulated assistants.
    fn default() -> Self {
        Self {
            personas: vec![
                Persona::new(
                    "chatgpt",
                    "ChatGPT",
                    "green",
                    "You are acting as ChatGPT. Provide a creative, conversational, and user-friendly response. Focus on clarity and accessibility.",
                ),
                Persona::new(
                    "deepseek",
                    "DeepSeek",
                    "blue",
                    "You are acting as DeepSeek. Provide a deeply analytical, logic-first response. Focus on technical details, edge cases, and reasoning.",
                ),
                Persona::new(
                    "gemini",
                    "Gemini",
                    "cyan",
                    "You are acting as Gemini. Provide a comprehensive, factual, and structured response. Focus on breadth of knowledge and accuracy.",
                ),
                Persona::new(
                    "zai",
                    "Z AI",
                    "magenta",
                    "You are acting as Z AI. Provide a concise, highly efficient, and direct response. Focus on 'bottom line up front'.",
                ),
                Persona::new(
                    "meta",
                    "Meta AI",
                    "bright blue",
                    "You are acting as Meta AI. Provide a balanced, social-context aware, and practical response.",
                ),
            ],
        }
    }
}

impl<'a> IntoIterator for &'a PersonaTable {
    type Item = &'a Persona;
    type IntoIter = std::slice::Iter<'a, Persona>;

    fn into_iter(self) -> Self::IntoIter {
        self.personas.iter()
    }
}
