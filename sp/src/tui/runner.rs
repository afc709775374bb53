//! TUI runner - main loop wiring events, state, and the planner
//!
//! The TuiRunner owns the terminal and drives the app:
//! - Renders at ~30 FPS via the event handler's tick
//! - Dispatches key events to App for handling
//! - Spawns generation requests and collects their results over a channel
//! - Executes actions the key handlers queued (generate, clear, export)
//! - Periodically reloads the history store

use std::sync::Arc;
use std::time::{Duration, Instant};

use eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::app::App;
use super::events::{Event, EventHandler};
use super::state::{Pane, PendingAction};
use super::{Tui, views};
use crate::config::Config;
use crate::export;
use crate::planner::{MISSING_INPUT_MESSAGE, PlanOutcome, PlanRequest, Planner};

/// How often to reload the history store
const DATA_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Runs the TUI application
pub struct TuiRunner {
    app: App,
    terminal: Tui,
    planner: Arc<Planner>,
    config: Config,
    event_handler: EventHandler,
    result_tx: mpsc::UnboundedSender<Result<PlanOutcome>>,
    result_rx: mpsc::UnboundedReceiver<Result<PlanOutcome>>,
    last_refresh: Instant,
}

impl TuiRunner {
    /// Create a new TUI runner
    pub fn new(terminal: Tui, planner: Planner, config: Config) -> Self {
        debug!("TuiRunner::new: called");
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        Self {
            app: App::new(),
            terminal,
            planner: Arc::new(planner),
            config,
            // ~30 FPS keeps the blink cursor and elapsed timer smooth
            event_handler: EventHandler::new(Duration::from_millis(33)),
            result_tx,
            result_rx,
            last_refresh: Instant::now(),
        }
    }

    /// Main event loop
    pub async fn run(&mut self) -> Result<()> {
        debug!("TuiRunner::run: starting main loop");
        self.refresh_history();

        loop {
            self.terminal
                .draw(|frame| views::render(self.app.state_mut(), frame))?;

            match self.event_handler.next().await? {
                Event::Tick => self.handle_tick(),
                Event::Key(key) => {
                    let force_quit = self.app.handle_key(key);
                    if force_quit {
                        debug!("TuiRunner::run: force quit");
                        break;
                    }
                }
                Event::Mouse(_) => {}
                Event::Resize(width, height) => {
                    debug!("TuiRunner::run: resize to {}x{}", width, height);
                }
            }

            if self.app.state().should_quit {
                debug!("TuiRunner::run: quit requested");
                break;
            }
        }
        Ok(())
    }

    /// Periodic tick: collect results, run queued actions, refresh data
    fn handle_tick(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            self.finish_generation(result);
        }

        if let Some(action) = self.app.state_mut().pending_action.take() {
            self.execute_action(action);
        }

        if self.last_refresh.elapsed() >= DATA_REFRESH_INTERVAL {
            self.refresh_history();
            self.last_refresh = Instant::now();
        }
    }

    fn execute_action(&mut self, action: PendingAction) {
        debug!("TuiRunner::execute_action: {:?}", action);
        match action {
            PendingAction::Generate => self.start_generation(),
            PendingAction::ClearHistory => self.clear_history(),
            PendingAction::ExportText => self.export_text(),
            PendingAction::ExportPdf => self.export_pdf(),
        }
    }

    /// Spawn a generation request in the background
    fn start_generation(&mut self) {
        let form = &self.app.state().form;
        let request = PlanRequest {
            subjects: form.subjects.trim().to_string(),
            days_left: form.days_left.trim().parse().unwrap_or(0),
            weak_topics: form.weak_topics.trim().to_string(),
        };

        // Catch empty fields before spawning so the form gets instant feedback
        if !request.is_complete() {
            self.app.state_mut().set_error(MISSING_INPUT_MESSAGE);
            return;
        }

        self.app.state_mut().start_generation();

        let planner = Arc::clone(&self.planner);
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let result = planner.generate(&request).await;
            // Receiver only drops on shutdown
            let _ = tx.send(result);
        });
    }

    /// Apply a finished generation to the state
    fn finish_generation(&mut self, result: Result<PlanOutcome>) {
        debug!("TuiRunner::finish_generation: called");
        let state = self.app.state_mut();
        state.finish_generation();

        let saved = match result {
            Ok(PlanOutcome::Saved {
                record,
                prompt_tokens,
                completion_tokens,
            }) => {
                state.plan_text = Some(record.plan.clone());
                state.plan_timestamp = Some(record.timestamp.clone());
                state.plan_scroll = 0;
                state.session_plans += 1;
                state.session_prompt_tokens += prompt_tokens;
                state.session_completion_tokens += completion_tokens;
                state.current_pane = Pane::Plan;
                state.set_status("Plan saved to history");
                true
            }
            Ok(PlanOutcome::MissingInput) => {
                state.set_error(MISSING_INPUT_MESSAGE);
                false
            }
            Ok(PlanOutcome::Failed { message }) => {
                state.set_error(message);
                false
            }
            Err(e) => {
                warn!("Generation failed: {:#}", e);
                state.set_error(format!("Generation failed: {}", e));
                false
            }
        };

        if saved {
            self.refresh_history();
        }
    }

    /// Reload records from the store
    fn refresh_history(&mut self) {
        match self.planner.store().load() {
            Ok(records) => {
                let state = self.app.state_mut();
                state.records = records;
                let len = state.records.len();
                state.history_selection.clamp(len);
                state.history_error = None;
            }
            Err(e) => {
                warn!("Failed to load history: {:#}", e);
                self.app.state_mut().history_error =
                    Some(format!("Failed to load history: {}", e));
            }
        }
    }

    /// Delete all stored plans
    fn clear_history(&mut self) {
        match self.planner.store().clear() {
            Ok(true) => {
                let state = self.app.state_mut();
                state.records.clear();
                state.expanded.clear();
                state.history_selection.select_first();
                state.set_status("History deleted successfully");
            }
            Ok(false) => {
                self.app.state_mut().set_status("No study plan history found");
            }
            Err(e) => {
                warn!("Failed to delete history: {:#}", e);
                self.app
                    .state_mut()
                    .set_error(format!("Failed to delete history: {}", e));
            }
        }
    }

    /// Plan text to export: the displayed plan, falling back to the store
    fn plan_for_export(&self) -> Option<String> {
        if let Some(ref text) = self.app.state().plan_text {
            return Some(text.clone());
        }
        self.app.state().records.last().map(|r| r.plan.clone())
    }

    fn export_text(&mut self) {
        let Some(plan) = self.plan_for_export() else {
            self.app.state_mut().set_error("No study plan history found");
            return;
        };
        let path = self.config.export.text_path.clone();
        match export::write_text(&plan, &path) {
            Ok(()) => self
                .app
                .state_mut()
                .set_status(format!("Exported plan to {}", path.display())),
            Err(e) => {
                warn!("Text export failed: {:#}", e);
                self.app
                    .state_mut()
                    .set_error(format!("Export failed: {}", e));
            }
        }
    }

    fn export_pdf(&mut self) {
        let Some(plan) = self.plan_for_export() else {
            self.app.state_mut().set_error("No study plan history found");
            return;
        };
        let path = self.config.export.pdf_path.clone();
        match export::write_pdf(&plan, &path) {
            Ok(()) => self
                .app
                .state_mut()
                .set_status(format!("Exported plan to {}", path.display())),
            Err(e) => {
                warn!("PDF export failed: {:#}", e);
                self.app
                    .state_mut()
                    .set_error(format!("Export failed: {}", e));
            }
        }
    }
}
