//! # Arithmetic Engine
//!
//! A four-function calculator state machine with the classic pocket
//! calculator quirks: chained `=`, operator replacement, percent relative to
//! the accumulator, and a sticky error display.
//!
//! ```text
//! Engine
//! ├── display: String             // what the user sees, or ERROR_TOKEN
//! ├── accumulator: f64            // left operand of the pending operator
//! ├── pending: Option<Operator>   // operator waiting for its right operand
//! ├── last_operand: Option<f64>   // right operand replayed by repeated `=`
//! ├── is_new_input: bool          // next digit replaces the display
//! ├── has_error: bool             // display shows ERROR_TOKEN
//! ├── just_evaluated: bool        // last key was a successful `=`
//! ├── operand_from_function: bool // display holds a √, 1/x or x² result
//! └── format: NumberFormat        // decimal separator
//! ```
//!
//! No operation fails. Invalid results (NaN, infinity, division by zero)
//! put the engine into the error state, which the next input clears.
//! Callers poll [`Engine::display`] and [`Engine::has_error`] after each call.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::format::NumberFormat;

/// Display text shown in place of an invalid result.
pub const ERROR_TOKEN: &str = "Error";

/// Digits accepted per operand; further presses are ignored.
pub const MAX_INPUT_DIGITS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "−",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }

    /// Apply the operator. Division by exactly zero is an error rather than
    /// a signed infinity.
    pub fn apply(self, left: f64, right: f64) -> Option<f64> {
        let result = match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => {
                if right == 0.0 {
                    return None;
                }
                left / right
            }
        };
        result.is_finite().then_some(result)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Notification produced by every successful `=`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub left: f64,
    pub right: f64,
    pub operator: Operator,
    pub result: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    display: String,
    accumulator: f64,
    pending: Option<Operator>,
    last_operand: Option<f64>,
    is_new_input: bool,
    has_error: bool,
    just_evaluated: bool,
    operand_from_function: bool,
    format: NumberFormat,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(NumberFormat::default())
    }
}

impl Engine {
    pub fn new(format: NumberFormat) -> Self {
        Self {
            display: "0".to_string(),
            accumulator: 0.0,
            pending: None,
            last_operand: None,
            is_new_input: true,
            has_error: false,
            just_evaluated: false,
            operand_from_function: false,
            format,
        }
    }

    // ── Observable state ────────────────────────────────────────────────────

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn decimal_separator(&self) -> &str {
        self.format.separator()
    }

    pub fn number_format(&self) -> &NumberFormat {
        &self.format
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// The half-typed expression shown above the display, e.g. `"12 ×"`.
    pub fn expression(&self) -> String {
        match self.pending {
            Some(op) if !self.just_evaluated => {
                format!("{} {}", self.format.format(self.accumulator), op)
            }
            _ => String::new(),
        }
    }

    // ── Entry ───────────────────────────────────────────────────────────────

    pub fn input_digit(&mut self, digit: u8) {
        if digit > 9 {
            return;
        }
        self.begin_entry();

        let d = char::from(b'0' + digit);
        if self.is_new_input {
            self.display = d.to_string();
            self.is_new_input = false;
            return;
        }

        match self.display.as_str() {
            "0" => self.display = d.to_string(),
            "-0" => self.display = format!("-{d}"),
            _ => {
                let typed = self.display.chars().filter(|c| c.is_ascii_digit()).count();
                if typed < MAX_INPUT_DIGITS {
                    self.display.push(d);
                }
            }
        }
    }

    pub fn input_decimal_separator(&mut self) {
        self.begin_entry();

        if self.is_new_input {
            self.display = format!("0{}", self.format.separator());
            self.is_new_input = false;
        } else if !self.display.contains(self.format.separator()) {
            self.display.push_str(self.format.separator());
        }
    }

    pub fn toggle_sign(&mut self) {
        // A negated √, 1/x or x² result still counts as the typed operand
        let from_function = self.operand_from_function && !self.has_error;
        self.begin_entry();
        self.operand_from_function = from_function;

        if let Some(rest) = self.display.strip_prefix('-') {
            self.display = rest.to_string();
        } else if self.display == "0" {
            // Visual-only negative zero; the next digit extends it to "-d"
            self.display = "-0".to_string();
            self.is_new_input = false;
        } else {
            self.display.insert(0, '-');
        }
    }

    pub fn backspace(&mut self) {
        if self.has_error {
            self.clear_all();
            return;
        }

        self.display.pop();
        if self.display.is_empty() || self.display == "-" {
            self.display = "0".to_string();
        }
    }

    /// Reset the current operand only; a pending operator survives.
    pub fn clear_entry(&mut self) {
        self.display = "0".to_string();
        self.has_error = false;
        self.just_evaluated = false;
        self.operand_from_function = false;
        self.is_new_input = true;
    }

    pub fn clear_all(&mut self) {
        *self = Self::new(self.format.clone());
    }

    // ── Binary operators ────────────────────────────────────────────────────

    pub fn apply_operator(&mut self, op: Operator) {
        self.recover_from_error();
        if self.just_evaluated {
            self.reset_chain();
        }

        let value = self.value();
        let has_operand = !self.is_new_input || self.operand_from_function;

        match self.pending {
            Some(pending) if has_operand => {
                let Some(result) = pending.apply(self.accumulator, value) else {
                    self.enter_error();
                    return;
                };
                self.accumulator = result;
                self.display = self.format.format(result);
            }
            // Fresh entry with an operator pending: the new operator replaces it
            Some(_) => {}
            None => self.accumulator = value,
        }

        self.last_operand = None;
        self.pending = Some(op);
        self.is_new_input = true;
        self.operand_from_function = false;
    }

    /// Evaluate the pending operation.
    ///
    /// Returns the evaluation that was performed, or `None` when nothing was
    /// pending or the result was invalid.
    pub fn equals(&mut self) -> Option<Evaluation> {
        if self.has_error {
            return None;
        }
        let operator = self.pending?;

        let right = if self.is_new_input && !self.operand_from_function {
            // Repeated `=`: replay the cached operand
            *self.last_operand.get_or_insert(self.format.parse(&self.display))
        } else {
            let value = self.value();
            self.last_operand = Some(value);
            value
        };
        let left = self.accumulator;

        let Some(result) = operator.apply(left, right) else {
            self.enter_error();
            return None;
        };

        self.accumulator = result;
        self.display = self.format.format(result);
        self.is_new_input = true;
        self.just_evaluated = true;
        self.operand_from_function = false;

        Some(Evaluation {
            left,
            right,
            operator,
            result,
        })
    }

    // ── Unary operations ────────────────────────────────────────────────────

    /// Percent of the accumulator when an operator is pending, else value / 100.
    ///
    /// Leaves entry non-fresh, so digits typed next append to the result.
    /// A result shown in scientific notation cannot be appended to; it is
    /// kept as an operand like a √ result and the next digit replaces it.
    pub fn percent(&mut self) {
        self.recover_from_error();
        if self.just_evaluated {
            self.reset_chain();
        }

        let value = self.value();
        let result = match self.pending {
            Some(_) => self.accumulator * value / 100.0,
            None => value / 100.0,
        };
        if !result.is_finite() {
            self.enter_error();
            return;
        }

        self.display = self.format.format(result);
        let scientific = self.display.contains('E');
        self.is_new_input = scientific;
        self.operand_from_function = scientific;
    }

    pub fn square_root(&mut self) {
        self.apply_function(|v| if v < 0.0 { f64::NAN } else { v.sqrt() });
    }

    pub fn reciprocal(&mut self) {
        self.apply_function(|v| if v == 0.0 { f64::NAN } else { 1.0 / v });
    }

    pub fn square(&mut self) {
        self.apply_function(|v| v * v);
    }

    fn apply_function(&mut self, f: impl FnOnce(f64) -> f64) {
        self.recover_from_error();
        if self.just_evaluated {
            self.reset_chain();
        }

        let result = f(self.value());
        if !result.is_finite() {
            self.enter_error();
            return;
        }

        self.display = self.format.format(result);
        self.is_new_input = true;
        self.operand_from_function = true;
    }

    // ── Internals ───────────────────────────────────────────────────────────

    fn value(&self) -> f64 {
        self.format.parse(&self.display)
    }

    fn recover_from_error(&mut self) {
        if self.has_error {
            self.clear_all();
        }
    }

    /// Preamble shared by digit, separator and sign input.
    fn begin_entry(&mut self) {
        self.recover_from_error();
        if self.just_evaluated {
            self.reset_chain();
        }
        self.operand_from_function = false;
    }

    /// Forget the previous `=` chain; the display value carries over.
    fn reset_chain(&mut self) {
        self.pending = None;
        self.last_operand = None;
        self.accumulator = 0.0;
        self.just_evaluated = false;
    }

    fn enter_error(&mut self) {
        self.display = ERROR_TOKEN.to_string();
        self.has_error = true;
        self.is_new_input = true;
        self.operand_from_function = false;
    }
}
