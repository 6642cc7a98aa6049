//! Progress reporting for orchestration runs.
//!
//! The orchestrator never keeps per-run state. Instead it drives two
//! caller-owned sinks: a [`StatusSink`] that receives per-persona status
//! transitions and a [`ModeSink`] that receives the routing decision. Plain
//! closures implement both traits; [`ProgressReporter`] implements both and
//! re-broadcasts everything as [`ProgressEvent`]s for UIs that render
//! asynchronously.

use crate::mode::Mode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Per-persona status within one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Not started.
    #[default]
    Idle,
    /// Request in flight.
    Querying,
    /// Request resolved (possibly with an empty contribution).
    Complete,
    /// Request failed and failure reporting is enabled.
    Error,
}

impl AgentStatus {
    /// Whether `next` is a legal step from `self` within a run.
    ///
    /// Status only moves forward: idle, then querying, then complete or error.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Querying) | (Self::Querying, Self::Complete | Self::Error)
        )
    }

    /// Whether the persona has finished for this run.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Querying => "querying",
            Self::Complete => "complete",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// Receives per-persona status transitions. Invoked synchronously.
pub trait StatusSink: Send + Sync {
    /// Reports that `persona_id` moved to `status`.
    fn report(&self, persona_id: &str, status: AgentStatus);
}

impl<F> StatusSink for F
where
    F: Fn(&str, AgentStatus) + Send + Sync,
{
    fn report(&self, persona_id: &str, status: AgentStatus) {
        self(persona_id, status);
    }
}

/// Receives the mode chosen for a run. Invoked at most once per run.
pub trait ModeSink: Send + Sync {
    /// Reports the handling mode.
    fn mode_changed(&self, mode: Mode);
}

impl<F> ModeSink for F
where
    F: Fn(Mode) + Send + Sync,
{
    fn mode_changed(&self, mode: Mode) {
        self(mode);
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl StatusSink for NoopSink {
    fn report(&self, _persona_id: &str, _status: AgentStatus) {}
}

impl ModeSink for NoopSink {
    fn mode_changed(&self, _mode: Mode) {}
}

/// Progress event types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A persona changed status.
    AgentStatusChanged {
        /// Persona ID.
        persona_id: String,
        /// New status.
        status: AgentStatus,
    },
    /// The run picked its handling mode.
    ModeChanged {
        /// Selected mode.
        mode: Mode,
    },
}

/// Status board snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Persona statuses in registration order.
    pub statuses: Vec<(String, AgentStatus)>,
    /// Mode reported for the current run, if any.
    pub mode: Option<Mode>,
}

impl ProgressSnapshot {
    /// Status of one persona.
    #[must_use]
    pub fn status_of(&self, persona_id: &str) -> Option<AgentStatus> {
        self.statuses.iter().find(|(id, _)| id == persona_id).map(|(_, status)| *status)
    }

    /// Whether every persona reached complete or error.
    #[must_use]
    pub fn all_terminal(&self) -> bool {
        self.statuses.iter().all(|(_, status)| status.is_terminal())
    }
}

/// Caller-side status board that also broadcasts every change.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    /// Broadcast sender for progress events.
    broadcast_tx: broadcast::Sender<ProgressEvent>,
    /// Current board.
    board: Arc<Mutex<ProgressSnapshot>>,
}

impl ProgressReporter {
    /// Creates a reporter with every persona idle.
    #[must_use]
    pub fn new<I, S>(persona_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (broadcast_tx, _) = broadcast::channel(100);
        let statuses =
            persona_ids.into_iter().map(|id| (id.into(), AgentStatus::Idle)).collect();
        Self { broadcast_tx, board: Arc::new(Mutex::new(ProgressSnapshot { statuses, mode: None })) }
    }

    /// Subscribes to progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Gets the current board.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.lock_board().clone()
    }

    /// Returns every persona to idle and clears the mode.
    ///
    /// Call between runs; nothing else moves a persona backwards.
    pub fn reset(&self) {
        let mut board = self.lock_board();
        for (_, status) in &mut board.statuses {
            *status = AgentStatus::Idle;
        }
        board.mode = None;
        debug!("Progress board reset");
    }

    fn lock_board(&self) -> MutexGuard<'_, ProgressSnapshot> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn send(&self, event: ProgressEvent) {
        debug!("Progress event: {:?}", event);
        // No subscribers is fine.
        let _ = self.broadcast_tx.send(event);
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl StatusSink for ProgressReporter {
    fn report(&self, persona_id: &str, status: AgentStatus) {
        {
            let mut board = self.lock_board();
            match board.statuses.iter_mut().find(|(id, _)| id == persona_id) {
                Some((_, current)) => {
                    if !current.can_transition_to(status) {
                        warn!(
                            persona_id = %persona_id,
                            from = %current,
                            to = %status,
                            "Ignoring out-of-order status transition"
                        );
                        return;
                    }
                    *current = status;
                }
                None => {
                    if !AgentStatus::Idle.can_transition_to(status) {
                        warn!(persona_id = %persona_id, to = %status, "Ignoring status for unknown persona");
                        return;
                    }
                    board.statuses.push((persona_id.to_string(), status));
                }
            }
        }

        self.send(ProgressEvent::AgentStatusChanged { persona_id: persona_id.to_string(), status });
    }
}

impl ModeSink for ProgressReporter {
    fn mode_changed(&self, mode: Mode) {
        self.lock_board().mode = Some(mode);
        self.send(ProgressEvent::ModeChanged { mode });
    }
}
