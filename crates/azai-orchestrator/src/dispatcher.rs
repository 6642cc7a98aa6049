//! Fan-out dispatcher.
//!
//! Runs one agent query unit per configured persona on the calling task and
//! joins them all before returning. Every request is in flight before any
//! reply is awaited to completion; a failing persona never fails the batch.

use crate::agent::{AgentResult, query_agent};
use crate::persona::PersonaTable;
use crate::progress::{AgentStatus, StatusSink};
use azai_abstraction::{Attachment, Model};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info};

/// Configuration for the fan-out dispatcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Report failed personas as `Error` instead of `Complete`.
    pub report_failures: bool,
}

/// Scatter-gather over the persona table.
pub struct FanOutDispatcher {
    /// Backend shared by every persona.
    model: Arc<dyn Model>,
    /// Personas to query.
    personas: PersonaTable,
    /// Configuration.
    config: DispatcherConfig,
}

impl std::fmt::Debug for FanOutDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanOutDispatcher")
            .field("model", &self.model.model_id())
            .field("personas", &self.personas.ids())
            .field("config", &self.config)
            .finish()
    }
}

impl FanOutDispatcher {
    /// Creates a new dispatcher.
    #[must_use]
    pub fn new(model: Arc<dyn Model>, personas: PersonaTable, config: DispatcherConfig) -> Self {
        Self { model, personas, config }
    }

    /// Personas this dispatcher queries.
    #[must_use]
    pub const fn personas(&self) -> &PersonaTable {
        &self.personas
    }

    /// Queries every persona concurrently and waits for all of them.
    ///
    /// `status` sees `Querying` right before a persona's request starts and
    /// `Complete` (or `Error` when failure reporting is on) right after it
    /// resolves. Results come back in persona table order.
    pub async fn dispatch(
        &self,
        prompt: &str,
        attachment: Option<&Attachment>,
        status: &dyn StatusSink,
    ) -> Vec<AgentResult> {
        info!(
            personas = self.personas.len(),
            has_attachment = attachment.is_some(),
            "Dispatching prompt to personas"
        );

        let model = self.model.as_ref();
        let report_failures = self.config.report_failures;
        let units = self.personas.iter().map(|persona| async move {
            status.report(&persona.id, AgentStatus::Querying);
            let result = query_agent(model, persona, prompt, attachment).await;
            let done = if result.failed && report_failures {
                AgentStatus::Error
            } else {
                AgentStatus::Complete
            };
            status.report(&persona.id, done);
            result
        });

        let results = join_all(units).await;

        debug!(
            contributed = results.iter().filter(|r| !r.is_empty()).count(),
            failed = results.iter().filter(|r| r.failed).count(),
            "All personas resolved"
        );
        results
    }
}
