//! # Actions
//!
//! Everything that can happen in qcalc becomes an `Action`.
//! User presses `7`? That's `Action::Digit(7)`.
//! The VM launch task finishes? That's `Action::LaunchFinished(outcome)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing the I/O the caller should
//! perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info};

use crate::core::engine::{Evaluation, Operator};
use crate::core::state::App;
use crate::core::trigger::TriggerAction;
use crate::launcher::LaunchOutcome;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Digit(u8),
    DecimalSeparator,
    ToggleSign,
    Backspace,
    ClearEntry,
    ClearAll,
    Operator(Operator),
    Equals,
    Percent,
    SquareRoot,
    Reciprocal,
    Square,
    /// The background launch task reported back.
    LaunchFinished(LaunchOutcome),
    /// The settings editor wrote (or failed to write) the VM settings file.
    SettingsSaved(Result<(), String>),
    Quit,
}

/// Side effects requested by `update()`, performed by the UI adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    LaunchVm,
    OpenSettings,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Digit(d) => app.engine.input_digit(d),
        Action::DecimalSeparator => app.engine.input_decimal_separator(),
        Action::ToggleSign => app.engine.toggle_sign(),
        Action::Backspace => app.engine.backspace(),
        Action::ClearEntry => app.engine.clear_entry(),
        Action::ClearAll => app.engine.clear_all(),
        Action::Operator(op) => app.engine.apply_operator(op),
        Action::Equals => {
            if let Some(evaluation) = app.engine.equals() {
                return on_evaluated(app, evaluation);
            }
        }
        Action::Percent => app.engine.percent(),
        Action::SquareRoot => app.engine.square_root(),
        Action::Reciprocal => app.engine.reciprocal(),
        Action::Square => app.engine.square(),
        Action::LaunchFinished(outcome) => {
            app.launch_in_flight = false;
            app.status_message = if outcome.success {
                "Virtual machine started".to_string()
            } else {
                format!(
                    "Launch failed: {}",
                    outcome.error.as_deref().unwrap_or("unknown error")
                )
            };
        }
        Action::SettingsSaved(result) => {
            app.status_message = match result {
                Ok(()) => "VM settings saved".to_string(),
                Err(e) => format!("Saving VM settings failed: {e}"),
            };
        }
        Action::Quit => return Effect::Quit,
    }
    Effect::None
}

fn on_evaluated(app: &mut App, evaluation: Evaluation) -> Effect {
    debug!("Evaluated: {:?}", evaluation);
    app.record(evaluation);

    match app.triggers.check(&evaluation) {
        Some(TriggerAction::LaunchVm) => {
            if app.launch_in_flight {
                app.status_message = "Launch already in progress".to_string();
                return Effect::None;
            }
            info!(
                "Launch trigger matched: {} {} {}",
                evaluation.left, evaluation.operator, evaluation.right
            );
            app.launch_in_flight = true;
            app.status_message = "Launching virtual machine...".to_string();
            Effect::LaunchVm
        }
        Some(TriggerAction::OpenSettings) => {
            info!("Settings trigger matched");
            app.status_message = "VM settings".to_string();
            Effect::OpenSettings
        }
        None => Effect::None,
    }
}
