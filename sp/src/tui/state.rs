//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here.

use std::collections::HashSet;
use std::time::Instant;

use planstore::PlanRecord;
use rand::seq::IndexedRandom;
use tracing::debug;

/// Words for the generation status indicator
pub const WORKING_WORDS: &[&str] = &[
    "Planning",
    "Outlining",
    "Scheduling",
    "Prioritizing",
    "Drafting",
    "Organizing",
    "Revising",
    "Balancing",
    "Sequencing",
    "Cramming",
];

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    /// Input form (subjects, days left, weak topics)
    #[default]
    Form,
    /// Generated plan, rendered as markdown
    Plan,
    /// Stored plans, most recent first
    History,
}

/// Panes in Tab cycle order
pub const PANES: [Pane; 3] = [Pane::Form, Pane::Plan, Pane::History];

impl Pane {
    /// Display name for the header tabs
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Form => "Form",
            Self::Plan => "Plan",
            Self::History => "History",
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Form => 0,
            Self::Plan => 1,
            Self::History => 2,
        }
    }

    /// Next pane in Tab order (wraps)
    pub fn next(&self) -> Self {
        PANES[(self.index() + 1) % PANES.len()]
    }

    /// Previous pane in Tab order (wraps)
    pub fn prev(&self) -> Self {
        PANES[(self.index() + PANES.len() - 1) % PANES.len()]
    }
}

/// Form field focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Subjects,
    DaysLeft,
    WeakTopics,
}

impl FormField {
    /// Field label for rendering
    pub fn label(&self) -> &'static str {
        match self {
            Self::Subjects => "Subjects to Study",
            Self::DaysLeft => "Days Left for Exam",
            Self::WeakTopics => "Weak Topics",
        }
    }

    /// Next field (wraps)
    pub fn next(&self) -> Self {
        match self {
            Self::Subjects => Self::DaysLeft,
            Self::DaysLeft => Self::WeakTopics,
            Self::WeakTopics => Self::Subjects,
        }
    }

    /// Previous field (wraps)
    pub fn prev(&self) -> Self {
        match self {
            Self::Subjects => Self::WeakTopics,
            Self::DaysLeft => Self::Subjects,
            Self::WeakTopics => Self::DaysLeft,
        }
    }
}

/// Editable form buffers
///
/// Days left is kept as a text buffer and parsed when a generation is
/// requested; an unparseable value counts as missing input.
#[derive(Debug, Clone)]
pub struct FormState {
    pub subjects: String,
    pub days_left: String,
    pub weak_topics: String,
    pub focused: FormField,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            subjects: String::new(),
            days_left: "5".to_string(),
            weak_topics: String::new(),
            focused: FormField::Subjects,
        }
    }
}

impl FormState {
    /// Value of a field by name
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Subjects => &self.subjects,
            FormField::DaysLeft => &self.days_left,
            FormField::WeakTopics => &self.weak_topics,
        }
    }

    /// Mutable buffer of the focused field
    pub fn value_mut(&mut self) -> &mut String {
        match self.focused {
            FormField::Subjects => &mut self.subjects,
            FormField::DaysLeft => &mut self.days_left,
            FormField::WeakTopics => &mut self.weak_topics,
        }
    }

    /// Insert a character into the focused field
    ///
    /// The days field only accepts digits (capped at four).
    pub fn insert_char(&mut self, c: char) {
        match self.focused {
            FormField::DaysLeft => {
                if c.is_ascii_digit() && self.days_left.len() < 4 {
                    self.days_left.push(c);
                }
            }
            _ => {
                self.value_mut().push(c);
            }
        }
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn focus_prev(&mut self) {
        self.focused = self.focused.prev();
    }
}

/// Interaction mode (modal)
#[derive(Debug, Clone, Default)]
pub enum InteractionMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Editing the focused form field
    Editing,
    /// Confirmation dialog
    Confirm(ConfirmDialog),
    /// Help overlay
    Help,
}

/// Confirmation dialog for dangerous actions
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub message: String,
    pub action: ConfirmAction,
    pub selected_button: bool, // false = No, true = Yes
}

impl ConfirmDialog {
    pub fn new(action: ConfirmAction, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            action,
            selected_button: false,
        }
    }

    pub fn quit() -> Self {
        Self::new(
            ConfirmAction::Quit,
            "A generation is still in progress. Are you sure you want to quit?",
        )
    }

    pub fn clear_history() -> Self {
        Self::new(
            ConfirmAction::ClearHistory,
            "Delete all study plan history? This cannot be undone.",
        )
    }
}

/// Action to perform on confirm
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    Quit,
    ClearHistory,
}

/// Action pending execution by the runner
#[derive(Debug, Clone)]
pub enum PendingAction {
    Generate,
    ClearHistory,
    ExportText,
    ExportPdf,
}

/// Transient footer message
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

/// Selection state for the history list
#[derive(Debug, Default, Clone)]
pub struct SelectionState {
    pub selected_index: usize,
    pub scroll_offset: usize,
}

impl SelectionState {
    pub fn select_next(&mut self, max_items: usize) {
        if max_items > 0 && self.selected_index < max_items - 1 {
            self.selected_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self, max_items: usize) {
        if max_items > 0 {
            self.selected_index = max_items - 1;
        }
    }

    /// Ensure selection is within bounds
    pub fn clamp(&mut self, max_items: usize) {
        if max_items == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= max_items {
            self.selected_index = max_items - 1;
        }
    }
}

/// Main TUI application state
#[derive(Debug)]
pub struct AppState {
    /// Current pane
    pub current_pane: Pane,
    /// Current interaction mode
    pub interaction_mode: InteractionMode,
    /// Should the app quit
    pub should_quit: bool,
    /// Transient footer message
    pub status: Option<StatusLine>,

    // === Form ===
    pub form: FormState,

    // === Plan pane ===
    /// Most recently generated plan text
    pub plan_text: Option<String>,
    /// Timestamp of the displayed plan
    pub plan_timestamp: Option<String>,
    pub plan_scroll: usize,
    /// Cached scroll bound, updated by the renderer
    pub plan_max_scroll: usize,

    // === History pane ===
    /// Records in store insertion order (rendered newest first)
    pub records: Vec<PlanRecord>,
    pub history_selection: SelectionState,
    /// Expanded entries, keyed by display index (0 = most recent)
    pub expanded: HashSet<usize>,
    /// Last history load failure, shown in place of the list
    pub history_error: Option<String>,

    // === Generation ===
    /// Is a generation request in flight?
    pub generating: bool,
    /// Word for the status indicator (e.g., "Planning")
    pub working_word: String,
    /// When the in-flight generation began
    pub generation_start: Option<Instant>,

    // === Session totals ===
    pub session_plans: usize,
    pub session_prompt_tokens: u64,
    pub session_completion_tokens: u64,

    // === Pending actions ===
    pub pending_action: Option<PendingAction>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            current_pane: Pane::default(),
            interaction_mode: InteractionMode::default(),
            should_quit: false,
            status: None,
            form: FormState::default(),
            plan_text: None,
            plan_timestamp: None,
            plan_scroll: 0,
            plan_max_scroll: 0,
            records: Vec::new(),
            history_selection: SelectionState::default(),
            expanded: HashSet::new(),
            history_error: None,
            generating: false,
            working_word: String::new(),
            generation_start: None,
            session_plans: 0,
            session_prompt_tokens: 0,
            session_completion_tokens: 0,
            pending_action: None,
        }
    }
}

impl AppState {
    /// Create new AppState
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to the next pane
    pub fn next_pane(&mut self) {
        self.current_pane = self.current_pane.next();
    }

    /// Switch to the previous pane
    pub fn prev_pane(&mut self) {
        self.current_pane = self.current_pane.prev();
    }

    /// Set an error message
    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            is_error: true,
        });
    }

    /// Set a success/info message
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            is_error: false,
        });
    }

    /// Clear the transient message
    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Start a generation - pick a random word and note the start time
    pub fn start_generation(&mut self) {
        debug!("AppState::start_generation: called");
        let mut rng = rand::rng();
        self.working_word = WORKING_WORDS.choose(&mut rng).unwrap_or(&"Planning").to_string();
        self.generation_start = Some(Instant::now());
        self.generating = true;
        self.status = None;
    }

    /// Mark the in-flight generation as finished
    pub fn finish_generation(&mut self) {
        debug!("AppState::finish_generation: called");
        self.generating = false;
        self.generation_start = None;
    }

    /// Number of stored plans
    pub fn history_len(&self) -> usize {
        self.records.len()
    }

    /// Records newest first, matching the display order
    pub fn newest_first(&self) -> Vec<&PlanRecord> {
        self.records.iter().rev().collect()
    }

    /// Toggle expansion of a history entry by display index
    pub fn toggle_expanded(&mut self, index: usize) {
        if !self.expanded.remove(&index) {
            self.expanded.insert(index);
        }
    }

    /// Scroll the plan pane down one line
    pub fn scroll_plan_down(&mut self) {
        if self.plan_scroll < self.plan_max_scroll {
            self.plan_scroll += 1;
        }
    }

    /// Scroll the plan pane up one line
    pub fn scroll_plan_up(&mut self) {
        self.plan_scroll = self.plan_scroll.saturating_sub(1);
    }
}
