//! TUI application - keyboard handling and state transitions
//!
//! The App struct owns the AppState and handles all keyboard events.
//! It does no rendering (views) and no I/O (runner); key handlers queue
//! pending actions that the runner executes on the next tick.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::state::{
    AppState, ConfirmAction, ConfirmDialog, InteractionMode, Pane, PendingAction,
};

/// Main application
#[derive(Debug, Default)]
pub struct App {
    state: AppState,
}

impl App {
    /// Create a new App
    pub fn new() -> Self {
        Self {
            state: AppState::new(),
        }
    }

    /// Get reference to state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get mutable reference to state
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key event, returns true if the app should force quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        debug!("App::handle_key: {:?}", key.code);

        // Any key press dismisses the transient footer message
        self.state.clear_status();

        match &self.state.interaction_mode {
            InteractionMode::Normal => self.handle_normal_key(key),
            InteractionMode::Editing => self.handle_editing_key(key),
            InteractionMode::Confirm(_) => self.handle_confirm_key(key),
            InteractionMode::Help => self.handle_help_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            // === Quit ===
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                debug!("handle_normal_key: force quit");
                return true;
            }
            (KeyCode::Char('q'), _) => {
                if self.state.generating {
                    // Don't drop an in-flight generation without asking
                    self.state.interaction_mode = InteractionMode::Confirm(ConfirmDialog::quit());
                } else {
                    self.state.should_quit = true;
                }
            }

            // === Help ===
            (KeyCode::Char('?'), _) | (KeyCode::F(1), _) => {
                self.state.interaction_mode = InteractionMode::Help;
            }

            // === Pane switching ===
            (KeyCode::Tab, _) => self.state.next_pane(),
            (KeyCode::BackTab, _) => self.state.prev_pane(),

            // === Pane-specific keys ===
            _ => match self.state.current_pane {
                Pane::Form => self.handle_form_key(key),
                Pane::Plan => self.handle_plan_key(key),
                Pane::History => self.handle_history_key(key),
            },
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.state.form.focus_next(),
            KeyCode::Up | KeyCode::Char('k') => self.state.form.focus_prev(),
            KeyCode::Enter | KeyCode::Char('i') | KeyCode::Char('e') => {
                self.state.interaction_mode = InteractionMode::Editing;
            }
            KeyCode::Char('g') => self.request_generate(),
            _ => {}
        }
    }

    fn handle_plan_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.state.scroll_plan_down(),
            KeyCode::Up | KeyCode::Char('k') => self.state.scroll_plan_up(),
            KeyCode::Char('g') => self.state.plan_scroll = 0,
            KeyCode::Char('G') => self.state.plan_scroll = self.state.plan_max_scroll,
            KeyCode::Char('t') => self.state.pending_action = Some(PendingAction::ExportText),
            KeyCode::Char('p') => self.state.pending_action = Some(PendingAction::ExportPdf),
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.state.history_len();
                self.state.history_selection.select_next(max);
            }
            KeyCode::Up | KeyCode::Char('k') => self.state.history_selection.select_prev(),
            KeyCode::Char('g') => self.state.history_selection.select_first(),
            KeyCode::Char('G') => {
                let max = self.state.history_len();
                self.state.history_selection.select_last(max);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.state.history_len() > 0 {
                    let index = self.state.history_selection.selected_index;
                    self.state.toggle_expanded(index);
                }
            }
            KeyCode::Char('D') => {
                if self.state.records.is_empty() {
                    self.state.set_status("No study plan history found");
                } else {
                    self.state.interaction_mode =
                        InteractionMode::Confirm(ConfirmDialog::clear_history());
                }
            }
            _ => {}
        }
    }

    fn request_generate(&mut self) {
        debug!("App::request_generate: called");
        if self.state.generating {
            self.state.set_error("Generation already in progress");
            return;
        }
        self.state.pending_action = Some(PendingAction::Generate);
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            // Tab commits and moves to the next field, staying in edit mode
            KeyCode::Tab => self.state.form.focus_next(),
            KeyCode::BackTab => self.state.form.focus_prev(),
            KeyCode::Backspace => {
                self.state.form.value_mut().pop();
            }
            KeyCode::Char(c) => self.state.form.insert_char(c),
            _ => {}
        }
        false
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Enter => {
                if let InteractionMode::Confirm(dialog) = &self.state.interaction_mode
                    && dialog.selected_button
                {
                    match &dialog.action {
                        ConfirmAction::Quit => self.state.should_quit = true,
                        ConfirmAction::ClearHistory => {
                            self.state.pending_action = Some(PendingAction::ClearHistory);
                        }
                    }
                }
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                if let InteractionMode::Confirm(dialog) = &mut self.state.interaction_mode {
                    dialog.selected_button = !dialog.selected_button;
                }
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let InteractionMode::Confirm(dialog) = &mut self.state.interaction_mode {
                    dialog.selected_button = true;
                }
            }
            _ => {}
        }
        false
    }

    fn handle_help_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            _ => {}
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planstore::PlanRecord;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn seeded_app() -> App {
        let mut app = App::new();
        app.state_mut().records = vec![PlanRecord {
            timestamp: "2025-06-01 08:00:00".to_string(),
            subjects: "Math".to_string(),
            days_left: 5,
            weak_topics: "Integrals".to_string(),
            plan: "Day 1: review".to_string(),
        }];
        app
    }

    #[test]
    fn test_app_starts_on_form() {
        let app = App::new();
        assert_eq!(app.state().current_pane, Pane::Form);
        assert!(matches!(
            app.state().interaction_mode,
            InteractionMode::Normal
        ));
    }

    #[test]
    fn test_ctrl_c_force_quits() {
        let mut app = App::new();
        let force_quit = app.handle_key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        ));
        assert!(force_quit);
    }

    #[test]
    fn test_q_quits_when_idle() {
        let mut app = App::new();
        assert!(!app.handle_key(key(KeyCode::Char('q'))));
        assert!(app.state().should_quit);
    }

    #[test]
    fn test_q_confirms_while_generating() {
        let mut app = App::new();
        app.state_mut().start_generation();

        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.state().should_quit);
        assert!(matches!(
            app.state().interaction_mode,
            InteractionMode::Confirm(_)
        ));

        // Yes + Enter quits
        app.handle_key(key(KeyCode::Char('y')));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.state().should_quit);
    }

    #[test]
    fn test_help_toggle() {
        let mut app = App::new();

        app.handle_key(key(KeyCode::Char('?')));
        assert!(matches!(app.state().interaction_mode, InteractionMode::Help));

        app.handle_key(key(KeyCode::Esc));
        assert!(matches!(
            app.state().interaction_mode,
            InteractionMode::Normal
        ));
    }

    #[test]
    fn test_tab_cycles_panes() {
        let mut app = App::new();

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.state().current_pane, Pane::Plan);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.state().current_pane, Pane::History);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.state().current_pane, Pane::Form);

        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.state().current_pane, Pane::History);
    }

    #[test]
    fn test_editing_inserts_text() {
        let mut app = App::new();

        app.handle_key(key(KeyCode::Enter));
        assert!(matches!(
            app.state().interaction_mode,
            InteractionMode::Editing
        ));

        for c in "Math".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Esc));

        assert_eq!(app.state().form.subjects, "Math");
        assert!(matches!(
            app.state().interaction_mode,
            InteractionMode::Normal
        ));
    }

    #[test]
    fn test_editing_days_field_filters_input() {
        let mut app = App::new();

        // Focus days field, clear the default, then type
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Char('7')));

        assert_eq!(app.state().form.days_left, "7");
    }

    #[test]
    fn test_generate_queues_action() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char('g')));
        assert!(matches!(
            app.state().pending_action,
            Some(PendingAction::Generate)
        ));
    }

    #[test]
    fn test_generate_rejected_while_in_flight() {
        let mut app = App::new();
        app.state_mut().start_generation();

        app.handle_key(key(KeyCode::Char('g')));

        assert!(app.state().pending_action.is_none());
        let status = app.state().status.as_ref().unwrap();
        assert!(status.is_error);
    }

    #[test]
    fn test_export_keys_in_plan_pane() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Tab)); // Plan pane

        app.handle_key(key(KeyCode::Char('t')));
        assert!(matches!(
            app.state().pending_action,
            Some(PendingAction::ExportText)
        ));

        app.handle_key(key(KeyCode::Char('p')));
        assert!(matches!(
            app.state().pending_action,
            Some(PendingAction::ExportPdf)
        ));
    }

    #[test]
    fn test_delete_all_requires_confirmation() {
        let mut app = seeded_app();
        app.state_mut().current_pane = Pane::History;

        app.handle_key(key(KeyCode::Char('D')));
        assert!(matches!(
            app.state().interaction_mode,
            InteractionMode::Confirm(_)
        ));

        // Default button is No, Enter cancels
        app.handle_key(key(KeyCode::Enter));
        assert!(app.state().pending_action.is_none());

        // D again, switch to Yes, confirm
        app.handle_key(key(KeyCode::Char('D')));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Enter));
        assert!(matches!(
            app.state().pending_action,
            Some(PendingAction::ClearHistory)
        ));
    }

    #[test]
    fn test_delete_all_on_empty_history() {
        let mut app = App::new();
        app.state_mut().current_pane = Pane::History;

        app.handle_key(key(KeyCode::Char('D')));

        assert!(matches!(
            app.state().interaction_mode,
            InteractionMode::Normal
        ));
        let status = app.state().status.as_ref().unwrap();
        assert_eq!(status.text, "No study plan history found");
    }

    #[test]
    fn test_history_expand_toggle() {
        let mut app = seeded_app();
        app.state_mut().current_pane = Pane::History;

        app.handle_key(key(KeyCode::Enter));
        assert!(app.state().expanded.contains(&0));

        app.handle_key(key(KeyCode::Enter));
        assert!(!app.state().expanded.contains(&0));
    }
}
