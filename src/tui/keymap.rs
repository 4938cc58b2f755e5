//! # Key Map
//!
//! Translates calculator-mode `TuiEvent`s into core `Action`s.
//!
//! | Key              | Action            |
//! |------------------|-------------------|
//! | `0`–`9`          | digit             |
//! | `.` / separator  | decimal separator |
//! | `+ - * /` (`x`)  | operators         |
//! | `=` / Enter      | equals            |
//! | `%`              | percent           |
//! | `s` `r` `q`      | √x, 1/x, x²       |
//! | `n`              | ±                 |
//! | Backspace        | backspace         |
//! | Delete           | clear entry (CE)  |
//! | Esc              | clear all (C)     |
//! | Ctrl+C           | quit              |

use crate::core::action::Action;
use crate::core::engine::Operator;
use crate::tui::event::TuiEvent;

pub fn action_for(event: &TuiEvent, separator: &str) -> Option<Action> {
    match event {
        TuiEvent::InputChar(c) => char_action(*c, separator),
        TuiEvent::Submit => Some(Action::Equals),
        TuiEvent::Backspace => Some(Action::Backspace),
        TuiEvent::Delete => Some(Action::ClearEntry),
        TuiEvent::Escape => Some(Action::ClearAll),
        TuiEvent::ForceQuit => Some(Action::Quit),
        _ => None,
    }
}

fn char_action(c: char, separator: &str) -> Option<Action> {
    if let Some(d) = c.to_digit(10) {
        return Some(Action::Digit(d as u8));
    }
    if c == '.' || separator.starts_with(c) {
        return Some(Action::DecimalSeparator);
    }
    let action = match c {
        '+' => Action::Operator(Operator::Add),
        '-' => Action::Operator(Operator::Subtract),
        '*' | 'x' | 'X' => Action::Operator(Operator::Multiply),
        '/' => Action::Operator(Operator::Divide),
        '=' => Action::Equals,
        '%' => Action::Percent,
        's' => Action::SquareRoot,
        'r' => Action::Reciprocal,
        'q' => Action::Square,
        'n' => Action::ToggleSign,
        _ => return None,
    };
    Some(action)
}
