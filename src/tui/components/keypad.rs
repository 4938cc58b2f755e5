//! # Keypad Component
//!
//! A static legend of the calculator keys laid out like a desk calculator.
//! The decimal key shows the configured separator. The pending operator is
//! highlighted so the user can see what `=` will apply.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::core::engine::Operator;
use crate::tui::component::Component;

pub struct Keypad {
    pub separator: String,
    pub pending: Option<Operator>,
}

/// Key label and the operator it stands for, if any.
type Key = (&'static str, Option<Operator>);

const ROWS: [[Key; 4]; 5] = [
    [("% %", None), ("CE Del", None), ("C Esc", None), ("⌫ Bksp", None)],
    [("1/x r", None), ("x² q", None), ("√x s", None), ("÷ /", Some(Operator::Divide))],
    [("7", None), ("8", None), ("9", None), ("× *", Some(Operator::Multiply))],
    [("4", None), ("5", None), ("6", None), ("− -", Some(Operator::Subtract))],
    [("1", None), ("2", None), ("3", None), ("+ +", Some(Operator::Add))],
];

impl Keypad {
    pub fn new(separator: String, pending: Option<Operator>) -> Self {
        Self { separator, pending }
    }

    fn cell(label: &str, style: Style) -> Span<'static> {
        Span::styled(format!("{label:^8}"), style)
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let plain = Style::default().fg(Color::Gray);
        let active = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED);

        let mut lines: Vec<Line> = ROWS
            .iter()
            .map(|row| {
                Line::from(
                    row.iter()
                        .map(|(label, op)| {
                            let style = if op.is_some() && *op == self.pending {
                                active
                            } else {
                                plain
                            };
                            Self::cell(label, style)
                        })
                        .collect::<Vec<_>>(),
                )
            })
            .collect();

        lines.push(Line::from(vec![
            Self::cell("± n", plain),
            Self::cell("0", plain),
            Self::cell(&self.separator, plain),
            Self::cell("= ⏎", plain),
        ]));
        lines
    }
}

impl Component for Keypad {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .title(" Keys ")
            .title_bottom(Line::from(" Ctrl+C Quit ").centered())
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(Paragraph::new(self.lines()).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_separator_key_shows_configured_separator() {
        let keypad = Keypad::new(",".to_string(), None);
        let lines = keypad.lines();
        let last = text(&lines[lines.len() - 1]);
        assert!(last.contains(','));
        assert!(!last.contains('.'));
    }

    #[test]
    fn test_pending_operator_highlighted() {
        let keypad = Keypad::new(".".to_string(), Some(Operator::Multiply));
        let lines = keypad.lines();
        let multiply = &lines[2].spans[3];
        assert!(multiply.content.contains('×'));
        assert_eq!(multiply.style.fg, Some(Color::Yellow));
        let divide = &lines[1].spans[3];
        assert_eq!(divide.style.fg, Some(Color::Gray));
    }
}
