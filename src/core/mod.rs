//! # Core Application Logic
//!
//! This module contains qcalc's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Engine (calculator)  │
//!                    │  • Triggers (patterns)  │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!                    ┌───────────┴─────────────┐
//!                    ▼                         ▼
//!             ┌────────────┐            ┌────────────┐
//!             │    TUI     │            │  Launcher  │
//!             │  Adapter   │───spawn───▶│  (QEMU)    │
//!             │ (ratatui)  │            │            │
//!             └────────────┘            └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`engine`]: The `Engine` state machine and the `Evaluation` it emits on `=`
//! - [`format`]: Display formatting and parsing with a configurable separator
//! - [`trigger`]: Pattern matching on evaluations
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`config`]: `~/.qcalc/config.toml` loading and override resolution

pub mod action;
pub mod config;
pub mod engine;
pub mod format;
pub mod state;
pub mod trigger;
