//! # Display Component
//!
//! The calculator readout: the pending expression on a dim line, the current
//! value right-aligned underneath. The error token renders in red.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::tui::component::Component;

pub struct Display {
    pub expression: String,
    pub value: String,
    pub is_error: bool,
}

impl Display {
    /// Height including borders.
    pub const HEIGHT: u16 = 4;

    pub fn new(expression: String, value: String, is_error: bool) -> Self {
        Self {
            expression,
            value,
            is_error,
        }
    }
}

impl Component for Display {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let value_style = if self.is_error {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        };

        let lines = vec![
            Line::from(Span::styled(
                self.expression.clone(),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(self.value.clone(), value_style)),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Right)
            .block(Block::bordered().border_style(Style::default().fg(Color::DarkGray)));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_display_renders_expression_and_value() {
        let backend = TestBackend::new(30, Display::HEIGHT);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut display = Display::new("12 ×".to_string(), "3".to_string(), false);
        terminal.draw(|f| display.render(f, f.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let row = |y: u16| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        };
        assert!(row(1).trim_end_matches('│').trim_end().ends_with("12 ×"));
        assert!(row(2).trim_end_matches('│').trim_end().ends_with('3'));
    }

    #[test]
    fn test_error_value_is_red() {
        let backend = TestBackend::new(30, Display::HEIGHT);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut display = Display::new(String::new(), "Error".to_string(), true);
        terminal.draw(|f| display.render(f, f.area())).unwrap();

        let buffer = terminal.backend().buffer();
        // "Error" ends just inside the right border
        let cell = &buffer[(buffer.area.width - 2, 2)];
        assert_eq!(cell.symbol(), "r");
        assert_eq!(cell.fg, Color::Red);
    }
}
