//! # TitleBar Component
//!
//! Top status bar: application name, the VM settings file in use, and the
//! latest status message ("Launching virtual machine...", "VM settings saved").
//!
//! Stateless: it receives all data as props and renders a single line.
//! Priority when the terminal is narrow: the status message comes right
//! after the name so it survives truncation.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar {
    /// File name of the VM settings (e.g. "vm.json")
    pub settings_name: String,
    /// Status message, empty when there is nothing to report
    pub status_message: String,
    /// Whether a launch task is still running
    pub launch_in_flight: bool,
}

impl TitleBar {
    pub fn new(settings_name: String, status_message: String, launch_in_flight: bool) -> Self {
        Self {
            settings_name,
            status_message,
            launch_in_flight,
        }
    }

    fn text(&self) -> String {
        let marker = if self.launch_in_flight { " ⟳" } else { "" };
        if self.status_message.is_empty() {
            format!("qcalc (vm: {}){}", self.settings_name, marker)
        } else {
            format!(
                "qcalc | {}{} | vm: {}",
                self.status_message, marker, self.settings_name
            )
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(self.text(), Style::default().fg(Color::Gray)));
        frame.render_widget(line, area);
    }
}
