//! Shared test doubles for orchestration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use azai_abstraction::{Model, ModelError, ModelRequest, ModelResponse};
use azai_orchestrator::{AgentStatus, Mode, Persona, PersonaTable};
use std::sync::Mutex;
use std::time::Duration;

/// Instruction the synthesizer sends as system framing.
pub const SYNTHESIS_FRAMING: &str = "You are AZ AI. You are helpful, professional, and neutral.";

type Responder = dyn Fn(&ModelRequest) -> Result<ModelResponse, ModelError> + Send + Sync;

/// Model whose replies come from a closure.
///
/// Records every request and a start/end log keyed by the request's system
/// instruction, and can delay replies for chosen instructions.
pub struct ScriptedModel {
    id: String,
    responder: Box<Responder>,
    delays: Vec<(String, Duration)>,
    requests: Mutex<Vec<ModelRequest>>,
    log: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(
        responder: impl Fn(&ModelRequest) -> Result<ModelResponse, ModelError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: "scripted".to_string(),
            responder: Box::new(responder),
            delays: Vec::new(),
            requests: Mutex::new(Vec::new()),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Replies to every request with `text`.
    pub fn constant(text: &'static str) -> Self {
        Self::new(move |_| Ok(ModelResponse::text(text)))
    }

    /// Delays replies to requests framed with `instruction`.
    pub fn with_delay(mut self, instruction: &str, delay: Duration) -> Self {
        self.delays.push((instruction.to_string(), delay));
        self
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests framed with `instruction`.
    pub fn requests_with(&self, instruction: &str) -> Vec<ModelRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.system_instruction.as_deref() == Some(instruction))
            .collect()
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

fn key(request: &ModelRequest) -> String {
    request.system_instruction.clone().unwrap_or_else(|| "none".to_string())
}

#[async_trait]
impl Model for ScriptedModel {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, ModelError> {
        let key = key(request);
        self.requests.lock().unwrap().push(request.clone());
        self.log.lock().unwrap().push(format!("start:{key}"));

        if let Some((_, delay)) = self.delays.iter().find(|(instruction, _)| *instruction == key) {
            tokio::time::sleep(*delay).await;
        }

        let reply = (self.responder)(request);
        self.log.lock().unwrap().push(format!("end:{key}"));
        reply
    }

    fn model_id(&self) -> &str {
        &self.id
    }
}

/// Three personas whose instructions are `persona:<id>`.
pub fn test_personas() -> PersonaTable {
    PersonaTable::new(
        ["alpha", "beta", "gamma"]
            .into_iter()
            .map(|id| Persona::new(id, id.to_uppercase(), "white", format!("persona:{id}")))
            .collect(),
    )
    .unwrap()
}

/// Whether `request` came from a persona agent.
pub fn is_persona_request(request: &ModelRequest) -> bool {
    request.system_instruction.as_deref().is_some_and(|s| s.starts_with("persona:"))
}

/// Collects sink calls for assertions.
#[derive(Default)]
pub struct Recorder {
    pub statuses: Mutex<Vec<(String, AgentStatus)>>,
    pub modes: Mutex<Vec<Mode>>,
}

impl Recorder {
    pub fn statuses(&self) -> Vec<(String, AgentStatus)> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn modes(&self) -> Vec<Mode> {
        self.modes.lock().unwrap().clone()
    }
}

impl azai_orchestrator::StatusSink for Recorder {
    fn report(&self, persona_id: &str, status: AgentStatus) {
        self.statuses.lock().unwrap().push((persona_id.to_string(), status));
    }
}

impl azai_orchestrator::ModeSink for Recorder {
    fn mode_changed(&self, mode: Mode) {
        self.modes.lock().unwrap().push(mode);
    }
}
