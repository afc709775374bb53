//! TUI views and rendering
//!
//! All drawing lives here. Rendering never mutates state except for the
//! scroll bounds and list offsets it writes back for the key handlers to
//! clamp against.

use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use tracing::trace;

use super::state::{AppState, ConfirmDialog, FormField, InteractionMode, PANES, Pane};

/// Color palette
mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const SUCCESS: Color = Color::Rgb(50, 205, 50); // Lime green
    pub const ERROR: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const SELECTED_BG: Color = Color::Rgb(40, 40, 40); // Subtle highlight
    pub const DIM: Color = Color::DarkGray;
}

/// Render the entire UI
pub fn render(state: &mut AppState, frame: &mut Frame) {
    trace!("render: called");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);

    match state.current_pane {
        Pane::Form => render_form(state, frame, chunks[1]),
        Pane::Plan => render_plan(state, frame, chunks[1]),
        Pane::History => render_history(state, frame, chunks[1]),
    }

    render_footer(state, frame, chunks[2]);

    // Overlays render last, on top of everything else
    match state.interaction_mode {
        InteractionMode::Help => render_help_overlay(frame),
        InteractionMode::Confirm(ref dialog) => render_confirm_dialog(frame, dialog),
        _ => {}
    }
}

/// Render the header bar with pane tabs and session metrics
fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!("render_header: called");

    let active_style = Style::default()
        .fg(colors::HEADER)
        .add_modifier(Modifier::BOLD);
    let inactive_style = Style::default().fg(colors::DIM);

    let mut left_spans: Vec<Span> = vec![
        Span::raw(" "),
        Span::styled("StudyPlanner", active_style),
        Span::styled(" │ ", Style::default().fg(colors::DIM)),
    ];
    for (i, pane) in PANES.iter().enumerate() {
        if i > 0 {
            left_spans.push(Span::styled(" · ", Style::default().fg(colors::DIM)));
        }
        let style = if *pane == state.current_pane {
            active_style
        } else {
            inactive_style
        };
        left_spans.push(Span::styled(pane.display_name(), style));
    }

    // Session metrics on the right, shown once there is something to show
    let mut right_spans: Vec<Span> = Vec::new();
    if state.session_plans > 0 {
        let label = if state.session_plans == 1 { "plan" } else { "plans" };
        right_spans.push(Span::styled(
            format!("{} {}", state.session_plans, label),
            Style::default().fg(colors::DIM),
        ));
    }
    if state.session_prompt_tokens > 0 || state.session_completion_tokens > 0 {
        if !right_spans.is_empty() {
            right_spans.push(Span::raw("  "));
        }
        right_spans.push(Span::styled(
            format!("↑{}", format_tokens(state.session_prompt_tokens)),
            Style::default().fg(colors::DIM),
        ));
        right_spans.push(Span::raw(" "));
        right_spans.push(Span::styled(
            format!("↓{}", format_tokens(state.session_completion_tokens)),
            Style::default().fg(colors::DIM),
        ));
    }
    right_spans.push(Span::raw(" "));

    // Right-justify the metrics by padding between the two groups
    let left_width: usize = left_spans.iter().map(|s| s.width()).sum();
    let right_width: usize = right_spans.iter().map(|s| s.width()).sum();
    let inner_width = area.width.saturating_sub(2) as usize;
    let padding = inner_width.saturating_sub(left_width + right_width);

    let mut spans = left_spans;
    spans.push(Span::raw(" ".repeat(padding)));
    spans.extend(right_spans);

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

/// Render the input form
fn render_form(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!("render_form: called");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Subjects
            Constraint::Length(3), // Days left
            Constraint::Length(3), // Weak topics
            Constraint::Min(0),    // Hint
        ])
        .split(area);

    let editing = matches!(state.interaction_mode, InteractionMode::Editing);
    let fields = [FormField::Subjects, FormField::DaysLeft, FormField::WeakTopics];
    for (i, field) in fields.iter().enumerate() {
        render_form_field(state, frame, chunks[i], *field, editing);
    }

    let hint = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Fill in the form and press g to generate a study plan.",
            Style::default().fg(colors::DIM),
        )),
    ]);
    frame.render_widget(hint, chunks[3]);
}

fn render_form_field(
    state: &AppState,
    frame: &mut Frame,
    area: Rect,
    field: FormField,
    editing: bool,
) {
    let focused = state.form.focused == field;
    let border_style = if focused {
        Style::default().fg(colors::HEADER)
    } else {
        Style::default().fg(colors::DIM)
    };

    let mut spans = vec![Span::raw(format!(" {}", state.form.value(field)))];
    if focused && editing {
        spans.push(Span::styled(
            "_",
            Style::default().add_modifier(Modifier::SLOW_BLINK),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", field.label())),
    );
    frame.render_widget(paragraph, area);
}

/// Render the generated plan as markdown
fn render_plan(state: &mut AppState, frame: &mut Frame, area: Rect) {
    trace!("render_plan: called");

    let Some(plan) = state.plan_text.clone() else {
        let message = if state.generating {
            "Generating study plan..."
        } else {
            "No plan generated yet. Fill in the form and press g."
        };
        render_empty_message(frame, area, message);
        return;
    };

    let title = match state.plan_timestamp {
        Some(ref ts) => format!(" AI Generated Study Plan ({}) ", ts),
        None => " AI Generated Study Plan ".to_string(),
    };

    let text = tui_markdown::from_str(&plan);

    // Scroll bound accounts for wrapped lines at the current width
    let viewport_width = area.width.saturating_sub(2).max(1) as usize;
    let viewport_height = area.height.saturating_sub(2) as usize;
    let content_height: usize = text
        .lines
        .iter()
        .map(|line| {
            let width = line.width();
            if width == 0 { 1 } else { width.div_ceil(viewport_width) }
        })
        .sum();
    state.plan_max_scroll = content_height.saturating_sub(viewport_height);
    state.plan_scroll = state.plan_scroll.min(state.plan_max_scroll);

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((state.plan_scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

/// Render the history list, most recent first
fn render_history(state: &mut AppState, frame: &mut Frame, area: Rect) {
    trace!("render_history: called");

    if let Some(ref error) = state.history_error {
        let paragraph = Paragraph::new(error.as_str())
            .style(Style::default().fg(colors::ERROR))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" History "));
        frame.render_widget(paragraph, area);
        return;
    }

    if state.records.is_empty() {
        render_empty_message(frame, area, "No study plan history found");
        return;
    }

    let items: Vec<ListItem> = state
        .newest_first()
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let expanded = state.expanded.contains(&i);
            let marker = if expanded { "▼" } else { "▶" };
            let header = Line::from(vec![
                Span::styled(
                    format!(" {} Plan {} ", marker, i + 1),
                    Style::default()
                        .fg(colors::HEADER)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("| ", Style::default().fg(colors::DIM)),
                Span::raw(record.timestamp.clone()),
            ]);

            let mut lines = vec![header];
            if expanded {
                lines.push(detail_line("Subjects", &record.subjects));
                lines.push(detail_line("Days left", &record.days_left.to_string()));
                lines.push(detail_line("Weak topics", &record.weak_topics));
                lines.push(Line::from(""));
                for plan_line in record.plan.lines() {
                    lines.push(Line::from(format!("     {}", plan_line)));
                }
                lines.push(Line::from(""));
            }
            ListItem::new(Text::from(lines))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" History ({}) ", state.records.len())),
        )
        .highlight_style(Style::default().bg(colors::SELECTED_BG));

    let mut list_state = ListState::default()
        .with_offset(state.history_selection.scroll_offset)
        .with_selected(Some(state.history_selection.selected_index));
    frame.render_stateful_widget(list, area, &mut list_state);
    state.history_selection.scroll_offset = list_state.offset();
}

fn detail_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("     {}: ", label),
            Style::default().fg(colors::DIM),
        ),
        Span::raw(value.to_string()),
    ])
}

/// Render the footer: edit buffer, generation indicator, status, or keybinds
fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    trace!("render_footer: called");

    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let InteractionMode::Editing = state.interaction_mode {
        let spans = vec![
            Span::styled(
                format!(" Editing {}: ", state.form.focused.label()),
                Style::default().fg(colors::HEADER),
            ),
            Span::raw(state.form.value(state.form.focused).to_string()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            Span::styled(
                "  (Enter/Esc done · Tab next field)",
                Style::default().fg(colors::DIM),
            ),
        ];
        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
        return;
    }

    if let Some(ref status) = state.status {
        let (symbol, color) = if status.is_error {
            ("✗", colors::ERROR)
        } else {
            ("✓", colors::SUCCESS)
        };
        let line = Line::from(Span::styled(
            format!(" {} {}", symbol, status.text),
            Style::default().fg(color),
        ));
        frame.render_widget(Paragraph::new(line), inner);
        return;
    }

    if state.generating {
        let elapsed = state
            .generation_start
            .map(|start| format_elapsed(start.elapsed()))
            .unwrap_or_default();
        let line = Line::from(Span::styled(
            format!(" * {}... ({})", state.working_word, elapsed),
            Style::default().fg(colors::DIM),
        ));
        frame.render_widget(Paragraph::new(line), inner);
        return;
    }

    let pane_hints: &[(&str, &str)] = match state.current_pane {
        Pane::Form => &[("j/k", "Fields"), ("Enter", "Edit"), ("g", "Generate")],
        Pane::Plan => &[("j/k", "Scroll"), ("t", "Export TXT"), ("p", "Export PDF")],
        Pane::History => &[("j/k", "Select"), ("Enter", "Expand"), ("D", "Delete All")],
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (key, label) in pane_hints {
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default()
                .fg(colors::KEYBIND)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}  ", label)));
    }
    for (key, label) in [("Tab", "Panes"), ("?", "Help"), ("q", "Quit")] {
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default()
                .fg(colors::KEYBIND)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}  ", label)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

/// Render the help overlay
fn render_help_overlay(frame: &mut Frame) {
    trace!("render_help_overlay: called");

    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let section = |title: &str| -> Line<'static> {
        Line::from(Span::styled(
            format!(" {}", title),
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let key_line = |key: &str, description: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!("   {:<14}", key),
                Style::default()
                    .fg(colors::KEYBIND)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(description.to_string()),
        ])
    };

    let lines = vec![
        Line::from(""),
        section("Global"),
        key_line("Tab/Shift+Tab", "Switch pane"),
        key_line("?", "Toggle this help"),
        key_line("q", "Quit (asks first while generating)"),
        key_line("Ctrl+C", "Force quit"),
        Line::from(""),
        section("Form"),
        key_line("j/k", "Move between fields"),
        key_line("Enter / i", "Edit the focused field"),
        key_line("g", "Generate a study plan"),
        Line::from(""),
        section("Plan"),
        key_line("j/k", "Scroll"),
        key_line("g/G", "Jump to top / bottom"),
        key_line("t / p", "Export TXT / PDF"),
        Line::from(""),
        section("History"),
        key_line("j/k", "Select entry"),
        key_line("Enter/Space", "Expand or collapse"),
        key_line("g/G", "First / last entry"),
        key_line("D", "Delete all history"),
    ];

    let help = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (? to close) ")
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(help, area);
}

/// Render the confirmation dialog
fn render_confirm_dialog(frame: &mut Frame, dialog: &ConfirmDialog) {
    trace!("render_confirm_dialog: called");

    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let no_style = if dialog.selected_button {
        Style::default().fg(Color::White)
    } else {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    };
    let yes_style = if dialog.selected_button {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let lines = vec![
        Line::from(""),
        Line::from(dialog.message.clone()),
        Line::from(""),
        Line::from(vec![
            Span::raw("      "),
            Span::styled("  No  ", no_style),
            Span::raw("      "),
            Span::styled("  Yes  ", yes_style),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Tab/←→: switch  Enter: confirm  Esc: cancel",
            Style::default().fg(colors::DIM),
        )),
    ];

    let dialog_widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm ")
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(dialog_widget, area);
}

/// Render a dimmed, centered message inside a bordered block
fn render_empty_message(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(block, area);

    let inner = area.inner(Margin {
        vertical: 2,
        horizontal: 2,
    });
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(colors::DIM))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}

/// Create a centered rectangle with the given percentages of the area
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Format a token count compactly (e.g., "1.2K", "3.5M")
fn format_tokens(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// Format elapsed time for the generation indicator (e.g., "45s", "1m 15s")
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}
