//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Effects
//!
//! `update()` never touches the outside world. When it returns an `Effect`
//! this module performs it:
//!
//! - `LaunchVm`: spawns a tokio task that calls the `VmLauncher` and sends
//!   `Action::LaunchFinished` back over the action channel.
//! - `OpenSettings`: loads the VM settings file and opens the editor overlay.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop sleeps up to 250ms waiting for input and
//! only redraws when an event arrived or a background action was applied.

mod component;
mod components;
mod event;
mod keymap;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::Path;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::launcher::{Launcher, VmLauncher, VmSettings, settings};
use crate::tui::component::EventHandler;
use crate::tui::components::{SettingsEditorState, SettingsEvent};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Settings editor overlay (None = hidden)
    pub settings_editor: Option<SettingsEditorState>,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            settings_editor: None,
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // The calculator has no text cursor; the editor draws its own caret
        execute!(stdout(), Hide)?;
        info!("Terminal modes enabled (hidden cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show);
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();
    let launcher: Arc<dyn VmLauncher> = Arc::new(Launcher::new(config.vm_settings_path.clone()));

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let mut needs_redraw = true; // Force first frame

    let result = loop {
        if needs_redraw {
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &app, &mut tui)) {
                break Err(e);
            }
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(Duration::from_millis(250));
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            // When the settings editor is open, route all events to it
            if let Some(editor) = tui.settings_editor.as_mut() {
                if let Some(settings_event) = editor.handle_event(&event) {
                    match settings_event {
                        SettingsEvent::Save(vm_settings) => {
                            let result = save_settings(&app.vm_settings_path, &vm_settings);
                            update(&mut app, Action::SettingsSaved(result));
                        }
                        SettingsEvent::Dismiss => {
                            tui.settings_editor = None;
                        }
                    }
                }
                continue;
            }

            let Some(action) = keymap::action_for(&event, app.engine.decimal_separator()) else {
                continue;
            };
            match update(&mut app, action) {
                Effect::None => {}
                Effect::Quit => should_quit = true,
                Effect::LaunchVm => spawn_launch(Arc::clone(&launcher), tx.clone()),
                Effect::OpenSettings => open_settings_editor(&mut app, &mut tui),
            }
            if should_quit {
                break;
            }
        }

        if should_quit {
            break Ok(());
        }

        // Actions reported by background tasks
        while let Ok(action) = rx.try_recv() {
            debug!("Background action: {:?}", action);
            update(&mut app, action);
            needs_redraw = true;
        }
    };

    ratatui::restore();
    result
}

/// Run the launcher on a tokio task and report the outcome as an action.
pub fn spawn_launch(launcher: Arc<dyn VmLauncher>, tx: mpsc::Sender<Action>) {
    tokio::spawn(async move {
        let outcome = launcher.launch().await;
        if tx.send(Action::LaunchFinished(outcome)).is_err() {
            debug!("Launch finished after the UI exited");
        }
    });
}

fn open_settings_editor(app: &mut App, tui: &mut TuiState) {
    match settings::load(&app.vm_settings_path) {
        Ok(vm_settings) => {
            tui.settings_editor = Some(SettingsEditorState::new(vm_settings));
        }
        Err(e) => {
            warn!(
                "Failed to load VM settings {}: {}",
                app.vm_settings_path.display(),
                e
            );
            app.status_message = format!("Cannot open VM settings: {e}");
        }
    }
}

fn save_settings(path: &Path, vm_settings: &VmSettings) -> Result<(), String> {
    settings::save(path, vm_settings).map_err(|e| {
        warn!("Failed to save VM settings {}: {}", path.display(), e);
        e.to_string()
    })
}
