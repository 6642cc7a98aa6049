//! Live persona status rendering.
//!
//! Consumes the orchestrator's progress broadcast on a background task and
//! draws one spinner per persona. Nothing is drawn when stderr is not a
//! terminal.

use azai_orchestrator::{AgentStatus, Mode, PersonaTable, ProgressEvent, ProgressReporter};
use colored::{Color, Colorize};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tracing::warn;

/// Maps a configured color name to a terminal color.
pub fn persona_color(name: &str) -> Color {
    name.parse().unwrap_or(Color::White)
}

/// Human-readable description of a mode.
pub fn describe_mode(mode: Mode) -> String {
    match mode {
        Mode::Chat => "Consulting all personas".to_string(),
        Mode::Image => "Generating image".to_string(),
        Mode::Research => "Researching with web search".to_string(),
        Mode::Code => "Writing code".to_string(),
        Mode::Game(game) => format!("Game master ({})", game),
    }
}

/// Background renderer for one run.
pub struct LiveProgress {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl LiveProgress {
    /// Subscribes to `reporter` and starts drawing.
    pub fn start(reporter: &ProgressReporter, personas: &PersonaTable) -> Self {
        let rx = reporter.subscribe();
        let (stop, stop_rx) = oneshot::channel();
        let renderer = Renderer::new(personas);
        let handle = tokio::spawn(renderer.run(rx, stop_rx));
        Self { stop, handle }
    }

    /// Draws any pending events and stops.
    pub async fn finish(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Progress renderer stopped abnormally");
        }
    }
}

struct Renderer {
    multi: MultiProgress,
    style: ProgressStyle,
    names: HashMap<String, (String, Color)>,
    bars: HashMap<String, ProgressBar>,
}

impl Renderer {
    fn new(personas: &PersonaTable) -> Self {
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let names = personas
            .iter()
            .map(|p| (p.id.clone(), (p.name.clone(), persona_color(&p.color))))
            .collect();
        Self { multi: MultiProgress::new(), style, names, bars: HashMap::new() }
    }

    async fn run(
        mut self,
        mut rx: broadcast::Receiver<ProgressEvent>,
        mut stop: oneshot::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                biased;
                event = rx.recv() => match event {
                    Ok(event) => self.handle(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Progress renderer fell behind");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = &mut stop => {
                    while let Ok(event) = rx.try_recv() {
                        self.handle(event);
                    }
                    break;
                }
            }
        }

        for bar in self.bars.values() {
            if !bar.is_finished() {
                bar.finish_and_clear();
            }
        }
    }

    fn label(&self, persona_id: &str) -> String {
        match self.names.get(persona_id) {
            Some((name, color)) => name.color(*color).bold().to_string(),
            None => persona_id.to_string(),
        }
    }

    fn handle(&mut self, event: ProgressEvent) {
        match event {
            ProgressEvent::ModeChanged { mode } => {
                let _ = self.multi.println(format!("{} {}", "→".dimmed(), describe_mode(mode)));
            }
            ProgressEvent::AgentStatusChanged { persona_id, status } => {
                let label = self.label(&persona_id);
                match status {
                    AgentStatus::Idle => {}
                    AgentStatus::Querying => {
                        let bar = self.multi.add(ProgressBar::new_spinner());
                        bar.set_style(self.style.clone());
                        bar.set_message(format!("{} thinking...", label));
                        bar.enable_steady_tick(Duration::from_millis(100));
                        self.bars.insert(persona_id, bar);
                    }
                    AgentStatus::Complete => {
                        if let Some(bar) = self.bars.get(&persona_id) {
                            bar.finish_with_message(format!("{} {}", "✓".green(), label));
                        }
                    }
                    AgentStatus::Error => {
                        if let Some(bar) = self.bars.get(&persona_id) {
                            bar.finish_with_message(format!("{} {} {}", "✗".red(), label, "failed".dimmed()));
                        }
                    }
                }
            }
        }
    }
}
