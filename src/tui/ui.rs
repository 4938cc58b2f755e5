use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{Display, History, Keypad, SettingsEditor, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

/// Width of the keypad column including borders.
const KEYPAD_WIDTH: u16 = 34;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Length(Display::HEIGHT), Min(0)]);
    let [title_area, display_area, body_area] = layout.areas(frame.area());
    let [keypad_area, history_area] =
        Layout::horizontal([Length(KEYPAD_WIDTH), Min(0)]).areas(body_area);

    let settings_name = app
        .vm_settings_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| app.vm_settings_path.display().to_string());
    TitleBar::new(
        settings_name,
        app.status_message.clone(),
        app.launch_in_flight,
    )
    .render(frame, title_area);

    Display::new(
        app.engine.expression(),
        app.engine.display().to_string(),
        app.engine.has_error(),
    )
    .render(frame, display_area);

    Keypad::new(
        app.engine.decimal_separator().to_string(),
        app.engine.pending_operator(),
    )
    .render(frame, keypad_area);

    History::new(&app.history, app.engine.number_format()).render(frame, history_area);

    if let Some(editor) = tui.settings_editor.as_mut() {
        SettingsEditor::new(editor).render(frame, frame.area());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::core::engine::Operator;
    use crate::launcher::VmSettings;
    use crate::test_support::test_app;
    use crate::tui::components::SettingsEditorState;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(app: &App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_draw_ui_initial_state() {
        let app = test_app();
        let mut tui = TuiState::new();
        let text = screen(&app, &mut tui);
        assert!(text.contains("qcalc (vm: vm.json)"));
        assert!(text.contains("No calculations yet."));
    }

    #[test]
    fn test_draw_ui_after_evaluation() {
        let mut app = test_app();
        for action in [
            Action::Digit(1),
            Action::Digit(2),
            Action::Operator(Operator::Add),
            Action::Digit(3),
            Action::Equals,
        ] {
            update(&mut app, action);
        }
        let mut tui = TuiState::new();
        let text = screen(&app, &mut tui);
        assert!(text.contains("12 + 3 = 15"));
    }

    #[test]
    fn test_draw_ui_with_settings_overlay() {
        let app = test_app();
        let mut tui = TuiState::new();
        tui.settings_editor = Some(SettingsEditorState::new(VmSettings::default()));
        let text = screen(&app, &mut tui);
        assert!(text.contains("VM Settings"));
    }
}
