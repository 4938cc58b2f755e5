//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as parameters:
//! - `TitleBar`: Top status bar showing the settings file and status
//! - `Display`: Pending expression and current value
//! - `Keypad`: Key legend with the pending operator highlighted
//! - `History`: Tape of completed evaluations
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `SettingsEditor`: VM settings overlay, emits `SettingsEvent`
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as "props" (struct fields), not by
//! reaching into `App`. This keeps dependencies explicit and lets every
//! component be tested against a `TestBackend`.
//!
//! ```rust,ignore
//! Display::new(app.engine.expression(), app.engine.display().to_string(), app.engine.has_error())
//!     .render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs              (this file)
//! ├── title_bar.rs        (Top status bar)
//! ├── display.rs          (Calculator readout)
//! ├── keypad.rs           (Key legend)
//! ├── history.rs          (Evaluation tape)
//! └── settings_editor.rs  (VM settings overlay)
//! ```

mod display;
mod history;
mod keypad;
mod title_bar;
pub use display::Display;
pub use history::History;
pub use keypad::Keypad;
pub use title_bar::TitleBar;

pub mod settings_editor;
pub use settings_editor::{SettingsEditor, SettingsEditorState, SettingsEvent};
