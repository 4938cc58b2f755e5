//! # Settings Editor Component
//!
//! Overlay for editing the VM settings file. It opens when the settings
//! trigger evaluates, and Esc closes it.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SettingsEditorState` lives in `TuiState`
//! - `SettingsEditor` is created each frame with borrowed state
//!
//! Keys: Up/Down select a field, Enter edits it and then commits the edit,
//! Esc cancels an edit (or closes the overlay), Ctrl+S saves.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};

use crate::launcher::{SettingsField, VmSettings};
use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

/// Persistent state for the settings overlay.
pub struct SettingsEditorState {
    pub settings: VmSettings,
    pub selected: usize,
    /// Text buffer while a field is being edited
    pub editing: Option<String>,
    /// Validation error from the last commit
    pub error: Option<String>,
    pub dirty: bool,
    pub list_state: ListState,
}

impl SettingsEditorState {
    pub fn new(settings: VmSettings) -> Self {
        Self {
            settings,
            selected: 0,
            editing: None,
            error: None,
            dirty: false,
            list_state: ListState::default().with_selected(Some(0)),
        }
    }

    pub fn selected_field(&self) -> SettingsField {
        SettingsField::ALL[self.selected]
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(SettingsField::ALL.len() - 1);
        self.list_state.select(Some(self.selected));
    }

    fn commit(&mut self, buffer: String) {
        let field = self.selected_field();
        match field.set(&mut self.settings, &buffer) {
            Ok(()) => {
                self.editing = None;
                self.error = None;
                self.dirty = true;
            }
            Err(e) => {
                // Keep the buffer so the user can fix the value
                self.editing = Some(buffer);
                self.error = Some(e.to_string());
            }
        }
    }

    fn handle_editing(&mut self, event: &TuiEvent, mut buffer: String) -> Option<SettingsEvent> {
        match event {
            TuiEvent::InputChar(c) => {
                buffer.push(*c);
                self.editing = Some(buffer);
            }
            TuiEvent::Backspace => {
                buffer.pop();
                self.editing = Some(buffer);
            }
            TuiEvent::Submit => self.commit(buffer),
            TuiEvent::Escape => {
                self.editing = None;
                self.error = None;
            }
            TuiEvent::ForceQuit => return Some(SettingsEvent::Dismiss),
            _ => self.editing = Some(buffer),
        }
        None
    }
}

impl EventHandler for SettingsEditorState {
    type Event = SettingsEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<SettingsEvent> {
        if let Some(buffer) = self.editing.take() {
            return self.handle_editing(event, buffer);
        }

        match event {
            TuiEvent::Escape | TuiEvent::ForceQuit => Some(SettingsEvent::Dismiss),
            TuiEvent::CursorUp => {
                self.select(self.selected.saturating_sub(1));
                None
            }
            TuiEvent::CursorDown => {
                self.select(self.selected + 1);
                None
            }
            TuiEvent::Submit => {
                self.editing = Some(self.selected_field().get(&self.settings));
                self.error = None;
                None
            }
            TuiEvent::Save => {
                self.dirty = false;
                Some(SettingsEvent::Save(self.settings.clone()))
            }
            _ => None,
        }
    }
}

/// Events emitted by the settings editor.
#[derive(Debug, PartialEq)]
pub enum SettingsEvent {
    Save(VmSettings),
    Dismiss,
}

/// Transient render wrapper for the settings overlay.
pub struct SettingsEditor<'a> {
    state: &'a mut SettingsEditorState,
}

impl<'a> SettingsEditor<'a> {
    pub fn new(state: &'a mut SettingsEditorState) -> Self {
        Self { state }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(80, 80, area);
        frame.render_widget(Clear, overlay);

        let help_text = if self.state.editing.is_some() {
            " Enter Apply  Esc Cancel "
        } else {
            " ↑↓ Select  Enter Edit  Ctrl+S Save  Esc Close "
        };
        let title = if self.state.dirty {
            " VM Settings (modified) "
        } else {
            " VM Settings "
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let [list_area, error_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        let label_width = SettingsField::ALL
            .iter()
            .map(|f| f.label().len())
            .max()
            .unwrap_or(0);

        let items: Vec<ListItem> = SettingsField::ALL
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let is_selected = i == self.state.selected;
                let value = match (&self.state.editing, is_selected) {
                    (Some(buffer), true) => format!("{buffer}▏"),
                    _ => field.get(&self.state.settings),
                };
                let style = if is_selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<label_width$}", field.label()), style),
                    Span::styled("  ", style),
                    Span::styled(value, style),
                ]))
            })
            .collect();

        frame.render_stateful_widget(List::new(items), list_area, &mut self.state.list_state);

        if let Some(error) = &self.state.error {
            let error_line = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
            frame.render_widget(error_line, error_area);
        }
    }
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
