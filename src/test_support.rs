//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::core::engine::Operator;
use crate::core::format::NumberFormat;
use crate::core::state::App;
use crate::core::trigger::{TriggerPattern, Triggers};
use crate::launcher::{LaunchOutcome, VmLauncher};

/// A launcher that never spawns anything and counts how often it was asked.
#[derive(Default)]
pub struct RecordingLauncher {
    pub calls: AtomicUsize,
}

#[async_trait]
impl VmLauncher for RecordingLauncher {
    async fn launch(&self) -> LaunchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        LaunchOutcome::launched()
    }
}

/// Triggers used across tests: `6 × 7` launches, `6 ÷ 7` opens settings.
pub fn test_triggers() -> Triggers {
    Triggers {
        launch: Some(TriggerPattern {
            left: 6.0,
            right: 7.0,
            operator: Operator::Multiply,
        }),
        settings: Some(TriggerPattern {
            left: 6.0,
            right: 7.0,
            operator: Operator::Divide,
        }),
    }
}

/// Creates a test App with `.` as separator and the test triggers.
pub fn test_app() -> App {
    App::new(
        NumberFormat::default(),
        test_triggers(),
        PathBuf::from("/nonexistent/vm.json"),
    )
}
