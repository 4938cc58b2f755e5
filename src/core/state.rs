//! # Application State
//!
//! Core business state for qcalc. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── engine: Engine                // calculator state machine
//! ├── triggers: Triggers            // magic expressions
//! ├── status_message: String        // status bar text
//! ├── history: Vec<Evaluation>      // completed `=` evaluations, newest last
//! ├── launch_in_flight: bool        // a launch task is running
//! └── vm_settings_path: PathBuf     // JSON file the editor and launcher use
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::path::PathBuf;

use crate::core::config::ResolvedConfig;
use crate::core::engine::{Engine, Evaluation};
use crate::core::format::NumberFormat;
use crate::core::trigger::Triggers;

/// Evaluations kept for the history tape.
pub const MAX_HISTORY: usize = 50;

pub struct App {
    pub engine: Engine,
    pub triggers: Triggers,
    pub status_message: String,
    pub history: Vec<Evaluation>,
    pub launch_in_flight: bool,
    pub vm_settings_path: PathBuf,
}

impl App {
    pub fn new(format: NumberFormat, triggers: Triggers, vm_settings_path: PathBuf) -> Self {
        Self {
            engine: Engine::new(format),
            triggers,
            status_message: String::new(),
            history: Vec::new(),
            launch_in_flight: false,
            vm_settings_path,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(
            NumberFormat::new(config.decimal_separator.clone()),
            config.triggers.clone(),
            config.vm_settings_path.clone(),
        )
    }

    pub fn record(&mut self, evaluation: Evaluation) {
        self.history.push(evaluation);
        if self.history.len() > MAX_HISTORY {
            let overflow = self.history.len() - MAX_HISTORY;
            self.history.drain(..overflow);
        }
    }
}
