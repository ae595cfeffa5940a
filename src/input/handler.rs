use crate::app::AppState;
use crate::domain::UiMode;
use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use std::env;
use std::fs;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

/// Handle keyboard input events
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::Timer => handle_timer_mode(app, key),
        UiMode::Popup => handle_popup_mode(app, key),
        UiMode::Confirm => handle_confirm_mode(app, key),
        mode if mode.is_form() => handle_input_form_mode(app, key),
        _ => Ok(false),
    }
}

/// Handle keys on the project / task lists
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_selection_up();
            Ok(false)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_selection_down();
            Ok(false)
        }

        // Cycle projects -> active -> completed
        KeyCode::Tab => {
            app.focus_next_pane(chrono::Local::now().date_naive());
            Ok(false)
        }

        KeyCode::Char('p') | KeyCode::Char('P') => {
            app.start_add_project();
            Ok(false)
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.start_rename_project();
            Ok(false)
        }
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.start_add_task();
            Ok(false)
        }
        KeyCode::Char('e') | KeyCode::Char('E') => {
            app.start_edit_task();
            Ok(false)
        }

        // Memo in $EDITOR (main loop leaves raw mode around this key)
        KeyCode::Char('m') | KeyCode::Char('M') => {
            edit_memo_external(app)?;
            Ok(false)
        }

        // Complete active task / restore completed task
        KeyCode::Enter | KeyCode::Char('c') | KeyCode::Char('C') => {
            app.toggle_complete();
            Ok(false)
        }

        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
            app.request_delete();
            Ok(false)
        }

        KeyCode::Char('t') | KeyCode::Char('T') => {
            app.open_timer();
            Ok(false)
        }

        KeyCode::Char('q') | KeyCode::Char('Q') => Ok(true),

        _ => Ok(false),
    }
}

/// Handle keys on the timer screen
fn handle_timer_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.toggle_timer();
            Ok(false)
        }
        KeyCode::Char('s') | KeyCode::Char('S') => {
            app.stop_timer();
            Ok(false)
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            app.cycle_timer_task();
            Ok(false)
        }
        KeyCode::Char('o') | KeyCode::Char('O') => {
            app.start_timer_settings();
            Ok(false)
        }
        KeyCode::Esc | KeyCode::Char('t') | KeyCode::Char('T') => {
            app.close_timer();
            Ok(false)
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => Ok(true),
        _ => Ok(false),
    }
}

/// Any of Enter / Esc / Space dismisses the current popup
fn handle_popup_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
        app.dismiss_popup();
    }
    Ok(false)
}

fn handle_confirm_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_yes(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.confirm_no(),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in input form mode
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Submit form
        KeyCode::Enter => {
            app.submit_input_form();
            Ok(false)
        }

        // Cancel form
        KeyCode::Esc => {
            app.cancel_input_form();
            Ok(false)
        }

        // Next field
        KeyCode::Tab => {
            app.input_form_toggle_field();
            Ok(false)
        }

        KeyCode::Backspace => {
            app.input_form_backspace();
            Ok(false)
        }

        KeyCode::Char(c) => {
            app.input_form_add_char(c);
            Ok(false)
        }

        _ => Ok(false),
    }
}

/// Edit the selected task's memo using external $EDITOR.
/// Editor failures become an error popup; they never end the session.
fn edit_memo_external(app: &mut AppState) -> Result<()> {
    let Some(selected) = app.selected_task() else {
        app.show_popup("Error", "Select a task first");
        return Ok(());
    };
    if selected.completed {
        app.show_popup("Error", "Completed tasks cannot be edited");
        return Ok(());
    }

    // Get editor from environment, default to vi
    let editor = env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(windows) {
            "notepad".to_string()
        } else {
            "vi".to_string()
        }
    });

    let memo = app.store.memo(&selected.project, &selected.task).to_string();
    match run_editor(&editor, &memo) {
        Ok(Some(edited)) => {
            // Editors append a final newline
            app.set_memo(&selected.project, &selected.task, edited.trim_end_matches('\n'));
        }
        Ok(None) => {}
        Err(e) => {
            log::warn!("memo editor failed: {:#}", e);
            app.show_popup("Error", format!("{:#}", e));
        }
    }

    Ok(())
}

/// Open `text` in `editor`; `None` when the editor exits unsuccessfully
fn run_editor(editor: &str, text: &str) -> Result<Option<String>> {
    let mut temp_file = NamedTempFile::new().context("Failed to create temporary file")?;
    temp_file
        .write_all(text.as_bytes())
        .context("Failed to write temporary file")?;
    let temp_path = temp_file.into_temp_path();

    let status = Command::new(editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Could not start editor \"{}\"", editor))?;
    if !status.success() {
        log::warn!("{} exited with {}", editor, status);
        return Ok(None);
    }

    let edited = fs::read_to_string(&temp_path).context("Failed to read edited memo")?;
    Ok(Some(edited))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IntervalTimer, Pane, TaskStore, TimerStatus};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn create_test_app() -> AppState {
        let mut store = TaskStore::new();
        store.create_project("Home").unwrap();
        store.add_task("Home", "Clean").unwrap();
        AppState::new(store, IntervalTimer::new(), false)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_handle_quit() {
        let mut app = create_test_app();
        let should_quit = handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(should_quit);
    }

    #[test]
    fn test_handle_add_project() {
        let mut app = create_test_app();

        handle_key(&mut app, key(KeyCode::Char('p'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::AddingProject);
        assert!(app.input_form.is_some());

        // 'q' inside a form is text, not quit
        type_text(&mut app, "Work q");
        handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.store.project("Work").is_some());
        assert_eq!(app.current_project().as_deref(), Some("Work"));
    }

    #[test]
    fn test_handle_cancel_form() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        type_text(&mut app, "Cook");
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.input_form.is_none());
        assert_eq!(app.store.project("Home").unwrap().active_tasks().len(), 1);
    }

    #[test]
    fn test_handle_edit_task_fields() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.focus, Pane::ActiveTasks);

        handle_key(&mut app, key(KeyCode::Char('e'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::EditingTask);

        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        type_text(&mut app, "2099-03-01");
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        type_text(&mut app, "mop floors");
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.ui_mode, UiMode::Popup);
        assert_eq!(
            app.store.due_date("Home", "Clean"),
            chrono::NaiveDate::from_ymd_opt(2099, 3, 1)
        );
        assert_eq!(app.store.memo("Home", "Clean"), "mop floors");

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_handle_phase_popup_over_open_form() {
        let mut app = create_test_app();
        app.timer.reconfigure(Some(1), None).unwrap();
        app.toggle_timer();

        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        type_text(&mut app, "Sh");
        for _ in 0..60 {
            app.tick();
        }
        assert_eq!(app.ui_mode, UiMode::Popup);
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.ui_mode, UiMode::AddingTask);

        // Typing resumes in the form; 'q' is text, not quit
        let should_quit = handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(!should_quit);
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.store.project("Home").unwrap().active_tasks(), &["Clean", "Shq"]);
    }

    #[test]
    fn test_handle_memo_with_missing_editor() {
        let mut app = create_test_app();
        app.store.set_memo("Home", "Clean", "kitchen");
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();

        env::set_var("EDITOR", "/nonexistent/todo-timer-editor");
        let should_quit = handle_key(&mut app, key(KeyCode::Char('m'))).unwrap();
        env::remove_var("EDITOR");

        assert!(!should_quit);
        assert_eq!(app.ui_mode, UiMode::Popup);
        assert_eq!(app.popups[0].title, "Error");
        assert!(app.popups[0].message.contains("Could not start editor"));
        assert_eq!(app.store.memo("Home", "Clean"), "kitchen");
    }

    #[test]
    fn test_handle_complete_and_delete() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        handle_key(&mut app, key(KeyCode::Char('c'))).unwrap();
        assert_eq!(app.store.project("Home").unwrap().completed_tasks(), &["Clean"]);

        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.focus, Pane::CompletedTasks);
        handle_key(&mut app, key(KeyCode::Delete)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Confirm);

        handle_key(&mut app, key(KeyCode::Char('y'))).unwrap();
        assert!(app.store.project("Home").unwrap().completed_tasks().is_empty());
    }

    #[test]
    fn test_handle_confirm_no() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('d'))).unwrap();
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.store.project("Home").is_some());
    }

    #[test]
    fn test_handle_timer_keys() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('t'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::Timer);

        handle_key(&mut app, key(KeyCode::Char(' '))).unwrap();
        assert_eq!(app.timer.status(), TimerStatus::Running);
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.timer.status(), TimerStatus::Paused);
        handle_key(&mut app, key(KeyCode::Char('s'))).unwrap();
        assert_eq!(app.timer.status(), TimerStatus::Idle);

        handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_handle_timer_settings() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('t'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('o'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::TimerSettings);

        // Replace "25" with "45"
        handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        type_text(&mut app, "45");
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.timer.work_minutes(), 45);
        assert_eq!(app.ui_mode, UiMode::Timer);
    }
}
