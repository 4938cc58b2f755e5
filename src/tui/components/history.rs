//! # History Component
//!
//! The tape of completed evaluations, newest on top.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};

use crate::core::engine::Evaluation;
use crate::core::format::NumberFormat;
use crate::tui::component::Component;

pub struct History<'a> {
    pub entries: &'a [Evaluation],
    pub format: &'a NumberFormat,
}

impl<'a> History<'a> {
    pub fn new(entries: &'a [Evaluation], format: &'a NumberFormat) -> Self {
        Self { entries, format }
    }

    /// One tape line, e.g. `6 × 7 = 42`.
    pub fn line(&self, evaluation: &Evaluation) -> String {
        format!(
            "{} {} {} = {}",
            self.format.format(evaluation.left),
            evaluation.operator,
            self.format.format(evaluation.right),
            self.format.format(evaluation.result)
        )
    }
}

impl Component for History<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .title(" History ")
            .border_style(Style::default().fg(Color::DarkGray));

        if self.entries.is_empty() {
            let empty = Paragraph::new("No calculations yet.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let visible = area.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = self
            .entries
            .iter()
            .rev()
            .take(visible)
            .map(|e| Line::from(self.line(e)))
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::Operator;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn eval(left: f64, operator: Operator, right: f64, result: f64) -> Evaluation {
        Evaluation {
            left,
            right,
            operator,
            result,
        }
    }

    #[test]
    fn test_line_uses_configured_separator() {
        let format = NumberFormat::new(",");
        let history = History::new(&[], &format);
        let line = history.line(&eval(1.5, Operator::Add, 2.25, 3.75));
        assert_eq!(line, "1,5 + 2,25 = 3,75");
    }

    #[test]
    fn test_newest_entry_renders_first() {
        let format = NumberFormat::default();
        let entries = vec![
            eval(1.0, Operator::Add, 1.0, 2.0),
            eval(6.0, Operator::Multiply, 7.0, 42.0),
        ];
        let backend = TestBackend::new(30, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| History::new(&entries, &format).render(f, f.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row = |y: u16| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        };
        assert!(row(1).contains("6 × 7 = 42"));
        assert!(row(2).contains("1 + 1 = 2"));
    }

    #[test]
    fn test_empty_history_placeholder() {
        let format = NumberFormat::default();
        let backend = TestBackend::new(30, 4);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| History::new(&[], &format).render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("No calculations yet."));
    }
}
