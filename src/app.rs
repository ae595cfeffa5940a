use crate::domain::{
    display_state, due_alerts, timer_choices, DisplayState, DueWhen, IntervalTimer, Pane,
    PhaseComplete, StoreError, TaskKey, TaskStore, UiMode, DATE_FORMAT,
};
use crate::notifications;
use chrono::NaiveDate;
use log::debug;

/// Informational popup (errors, confirmations of success, timer transitions)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupState {
    pub title: String,
    pub message: String,
}

/// Delete awaiting a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelete {
    Project(String),
    ActiveTask { project: String, task: String },
    CompletedTask { project: String, task: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmState {
    pub message: String,
    pub action: PendingDelete,
}

/// Input form state shared by every dialog that takes text
#[derive(Debug, Clone)]
pub struct InputFormState {
    pub title: &'static str,
    pub labels: Vec<&'static str>,
    pub values: Vec<String>,
    pub editing_field: usize,
    /// Name of the project or task being edited
    pub original: Option<String>,
}

impl InputFormState {
    fn new(title: &'static str, fields: Vec<(&'static str, String)>, original: Option<String>) -> Self {
        let (labels, values) = fields.into_iter().unzip();
        Self {
            title,
            labels,
            values,
            editing_field: 0,
            original,
        }
    }

    pub fn value(&self, field: usize) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }
}

/// The task under the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedTask {
    pub project: String,
    pub task: String,
    pub completed: bool,
}

/// Main application state
pub struct AppState {
    pub store: TaskStore,
    pub timer: IntervalTimer,
    pub notifications: bool,
    pub ui_mode: UiMode,
    /// Screen that forms and popups return to (Normal or Timer)
    pub base_mode: UiMode,
    /// Mode interrupted by the popup queue (a form or confirmation left open)
    return_mode: UiMode,
    pub focus: Pane,
    pub selected_project: usize,
    pub selected_active: usize,
    pub selected_completed: usize,
    pub popups: Vec<PopupState>,
    pub confirm: Option<ConfirmState>,
    pub input_form: Option<InputFormState>,
    timer_choice: Option<usize>,
}

impl AppState {
    pub fn new(store: TaskStore, timer: IntervalTimer, notifications: bool) -> Self {
        Self {
            store,
            timer,
            notifications,
            ui_mode: UiMode::Normal,
            base_mode: UiMode::Normal,
            return_mode: UiMode::Normal,
            focus: Pane::Projects,
            selected_project: 0,
            selected_active: 0,
            selected_completed: 0,
            popups: Vec::new(),
            confirm: None,
            input_form: None,
            timer_choice: None,
        }
    }

    /// Name of the highlighted project
    pub fn current_project(&self) -> Option<String> {
        self.store
            .projects()
            .get(self.selected_project)
            .map(|p| p.name().to_string())
    }

    /// The highlighted task in the focused task pane
    pub fn selected_task(&self) -> Option<SelectedTask> {
        let project = self.store.projects().get(self.selected_project)?;
        let (tasks, idx, completed) = match self.focus {
            Pane::Projects => return None,
            Pane::ActiveTasks => (project.active_tasks(), self.selected_active, false),
            Pane::CompletedTasks => (project.completed_tasks(), self.selected_completed, true),
        };
        tasks.get(idx).map(|task| SelectedTask {
            project: project.name().to_string(),
            task: task.clone(),
            completed,
        })
    }

    /// Snapshot for the renderer
    pub fn display_state(&self) -> DisplayState {
        let project = self.current_project();
        display_state(&self.store, project.as_deref(), &self.timer)
    }

    fn focused_len(&self) -> usize {
        let project = self.store.projects().get(self.selected_project);
        match self.focus {
            Pane::Projects => self.store.projects().len(),
            Pane::ActiveTasks => project.map_or(0, |p| p.active_tasks().len()),
            Pane::CompletedTasks => project.map_or(0, |p| p.completed_tasks().len()),
        }
    }

    fn focused_index_mut(&mut self) -> &mut usize {
        match self.focus {
            Pane::Projects => &mut self.selected_project,
            Pane::ActiveTasks => &mut self.selected_active,
            Pane::CompletedTasks => &mut self.selected_completed,
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        let idx = self.focused_index_mut();
        if *idx > 0 {
            *idx -= 1;
            if self.focus == Pane::Projects {
                self.reset_task_selection();
            }
        }
    }

    /// Move selection down
    pub fn move_selection_down(&mut self) {
        let len = self.focused_len();
        let idx = self.focused_index_mut();
        if *idx + 1 < len {
            *idx += 1;
            if self.focus == Pane::Projects {
                self.reset_task_selection();
            }
        }
    }

    fn reset_task_selection(&mut self) {
        self.selected_active = 0;
        self.selected_completed = 0;
    }

    /// Keep every cursor inside its list after a mutation
    fn clamp_selection(&mut self) {
        let clamp = |idx: usize, len: usize| idx.min(len.saturating_sub(1));
        self.selected_project = clamp(self.selected_project, self.store.projects().len());
        let (active, completed) = self
            .store
            .projects()
            .get(self.selected_project)
            .map_or((0, 0), |p| (p.active_tasks().len(), p.completed_tasks().len()));
        self.selected_active = clamp(self.selected_active, active);
        self.selected_completed = clamp(self.selected_completed, completed);
    }

    /// Drop the timer's task if it is no longer active anywhere
    fn sync_timer_task(&mut self) {
        let still_active = self.timer.attached_task().map(|key| {
            self.store
                .project(&key.project)
                .map_or(false, |p| p.is_active(&key.task))
        });
        if still_active == Some(false) {
            self.timer.attach_task(None);
            self.timer_choice = None;
        }
    }

    fn after_store_change(&mut self) {
        self.clamp_selection();
        self.sync_timer_task();
    }

    /// Tab: cycle focus between the project list and the two task lists
    pub fn focus_next_pane(&mut self, today: NaiveDate) {
        self.focus = self.focus.next();
        if self.focus == Pane::Projects {
            self.check_deadlines(today);
        }
    }

    /// Queue a popup and switch to popup mode
    pub fn show_popup(&mut self, title: &str, message: impl Into<String>) {
        self.popups.push(PopupState {
            title: title.to_string(),
            message: message.into(),
        });
        if self.ui_mode != UiMode::Popup {
            self.return_mode = self.ui_mode;
        }
        self.ui_mode = UiMode::Popup;
    }

    /// Close the current popup; the next queued one (if any) takes its place
    pub fn dismiss_popup(&mut self) {
        if !self.popups.is_empty() {
            self.popups.remove(0);
        }
        if self.popups.is_empty() {
            self.ui_mode = self.return_mode;
        }
    }

    fn report(&mut self, err: StoreError) {
        match err {
            // Stale selection; nothing to tell the user
            StoreError::ProjectNotFound(_) => debug!("{}", err),
            _ if err.is_duplicate() => self.show_popup("Duplicate name", err.to_string()),
            _ => self.show_popup("Error", err.to_string()),
        }
    }

    /// Popup (and notify) for active tasks due today or tomorrow
    pub fn check_deadlines(&mut self, today: NaiveDate) {
        for alert in due_alerts(&self.store, today) {
            if self.notifications {
                notifications::notify_due(&alert);
            }
            let title = match alert.when {
                DueWhen::Today => "Due today",
                DueWhen::Tomorrow => "Due soon",
            };
            self.show_popup(title, alert.message());
        }
    }

    fn open_form(&mut self, mode: UiMode, form: InputFormState) {
        self.input_form = Some(form);
        self.ui_mode = mode;
    }

    /// Start adding a new project (opens input form)
    pub fn start_add_project(&mut self) {
        let form = InputFormState::new(" New Project ", vec![("Project name", String::new())], None);
        self.open_form(UiMode::AddingProject, form);
    }

    /// Start renaming the highlighted project
    pub fn start_rename_project(&mut self) {
        let Some(project) = self.current_project() else {
            self.show_popup("Error", "Select a project first");
            return;
        };
        let form = InputFormState::new(
            " Rename Project ",
            vec![("New name", project.clone())],
            Some(project),
        );
        self.open_form(UiMode::RenamingProject, form);
    }

    /// Start adding a task to the highlighted project
    pub fn start_add_task(&mut self) {
        if self.current_project().is_none() {
            self.show_popup("Error", "Select a project first");
            return;
        }
        let form = InputFormState::new(" New Task ", vec![("Task name", String::new())], None);
        self.open_form(UiMode::AddingTask, form);
    }

    /// Open the edit form (name, due date, memo) for the highlighted task
    pub fn start_edit_task(&mut self) {
        let Some(selected) = self.selected_task() else {
            self.show_popup("Error", "Select a task first");
            return;
        };
        if selected.completed {
            self.show_popup("Error", "Completed tasks cannot be edited");
            return;
        }

        let due = self
            .store
            .due_date(&selected.project, &selected.task)
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        let memo = self.store.memo(&selected.project, &selected.task).to_string();
        let form = InputFormState::new(
            " Edit Task ",
            vec![
                ("Name", selected.task.clone()),
                ("Due date (YYYY-MM-DD, blank for none)", due),
                ("Memo", memo),
            ],
            Some(selected.task),
        );
        self.open_form(UiMode::EditingTask, form);
    }

    /// Open the work/rest length form; refused while the timer runs
    pub fn start_timer_settings(&mut self) {
        if self.timer.status().is_running() {
            self.show_popup("Timer running", crate::domain::TimerError::Busy.to_string());
            return;
        }
        let form = InputFormState::new(
            " Timer Settings ",
            vec![
                ("Work minutes (1-60)", self.timer.work_minutes().to_string()),
                ("Rest minutes (1-30)", self.timer.rest_minutes().to_string()),
            ],
            None,
        );
        self.open_form(UiMode::TimerSettings, form);
    }

    /// Move to the next field in the input form
    pub fn input_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.editing_field = (form.editing_field + 1) % form.values.len().max(1);
        }
    }

    /// Add character to input form (current field)
    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            if let Some(value) = form.values.get_mut(form.editing_field) {
                value.push(c);
            }
        }
    }

    /// Backspace in input form (current field)
    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            if let Some(value) = form.values.get_mut(form.editing_field) {
                value.pop();
            }
        }
    }

    /// Cancel input form
    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = self.base_mode;
    }

    /// Submit the open form and apply it to the store or timer
    pub fn submit_input_form(&mut self) {
        let Some(form) = self.input_form.take() else {
            return;
        };
        let mode = self.ui_mode;
        self.ui_mode = self.base_mode;

        match mode {
            UiMode::AddingProject => self.create_project(form.value(0)),
            UiMode::RenamingProject => {
                if let Some(original) = &form.original {
                    self.rename_project(original, form.value(0));
                }
            }
            UiMode::AddingTask => {
                if let Some(project) = self.current_project() {
                    self.add_task(&project, form.value(0));
                }
            }
            UiMode::EditingTask => {
                if let (Some(project), Some(original)) = (self.current_project(), &form.original) {
                    let today = chrono::Local::now().date_naive();
                    self.save_task(&project, original, form.value(0), form.value(1), form.value(2), today);
                }
            }
            UiMode::TimerSettings => self.apply_timer_settings(form.value(0), form.value(1)),
            _ => {}
        }
    }

    /// Create a project and move the cursor onto it
    pub fn create_project(&mut self, name: &str) {
        match self.store.create_project(name) {
            Ok(_) => {
                self.selected_project = self.store.projects().len() - 1;
                self.reset_task_selection();
            }
            Err(e) => self.report(e),
        }
    }

    pub fn rename_project(&mut self, project: &str, new_name: &str) {
        match self.store.rename_project(project, new_name) {
            Ok(()) => {
                if let Some(key) = self.timer.attached_task().cloned() {
                    if key.project == project {
                        self.timer
                            .attach_task(Some(TaskKey::new(new_name, &key.task)));
                    }
                }
                self.show_popup("Renamed", "Project renamed");
            }
            Err(e) => self.report(e),
        }
    }

    pub fn add_task(&mut self, project: &str, name: &str) {
        if let Err(e) = self.store.add_task(project, name) {
            self.report(e);
        }
    }

    /// Apply the edit form: rename, due date and memo in one save.
    /// A rejected rename, an invalid date or a new date before `today` applies nothing.
    pub fn save_task(
        &mut self,
        project: &str,
        original: &str,
        name: &str,
        due: &str,
        memo: &str,
        today: NaiveDate,
    ) {
        let due = due.trim();
        let new_due = if due.is_empty() {
            None
        } else {
            match NaiveDate::parse_from_str(due, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    self.show_popup("Error", format!("Invalid date \"{}\". Use YYYY-MM-DD", due));
                    return;
                }
            }
        };

        let name_changed = name != original;
        let due_changed = new_due != self.store.due_date(project, original);
        let memo_changed = memo != self.store.memo(project, original);

        if !(name_changed || due_changed || memo_changed) {
            self.show_popup("Error", "No changes to save");
            return;
        }
        if due_changed && new_due.map_or(false, |d| d < today) {
            self.show_popup("Error", "Due date cannot be in the past");
            return;
        }

        if name_changed && self.store.is_name_taken(project, name) {
            self.report(StoreError::DuplicateTask(name.to_string()));
            return;
        }

        if name_changed {
            if let Err(e) = self.store.rename_task(project, original, name) {
                self.report(e);
                return;
            }
            if self.timer.attached_task() == Some(&TaskKey::new(project, original)) {
                self.timer.attach_task(Some(TaskKey::new(project, name)));
            }
        }
        if due_changed {
            match new_due {
                Some(date) => self.store.set_due_date(project, name, date),
                None => self.store.clear_due_date(project, name),
            }
        }
        if memo_changed {
            self.store.set_memo(project, name, memo);
        }

        self.after_store_change();
        self.show_popup("Saved", "Task saved");
    }

    /// Replace the memo of a task (used by the external editor flow)
    pub fn set_memo(&mut self, project: &str, task: &str, memo: &str) {
        self.store.set_memo(project, task, memo);
    }

    fn apply_timer_settings(&mut self, work: &str, rest: &str) {
        let (Ok(work), Ok(rest)) = (work.trim().parse::<u32>(), rest.trim().parse::<u32>()) else {
            self.show_popup("Error", "Enter a valid number");
            return;
        };
        if let Err(e) = self.timer.reconfigure(Some(work), Some(rest)) {
            self.show_popup("Error", e.to_string());
        }
    }

    /// Complete the highlighted active task, or restore the highlighted completed one
    pub fn toggle_complete(&mut self) {
        let Some(selected) = self.selected_task() else {
            self.show_popup("Error", "Select a task first");
            return;
        };

        if selected.completed {
            if let Err(e) = self.store.restore_task(&selected.project, &selected.task) {
                self.report(e);
            }
        } else {
            self.store.complete_task(&selected.project, &selected.task);
        }
        self.after_store_change();
    }

    /// Ask for confirmation before deleting the highlighted project or task
    pub fn request_delete(&mut self) {
        let action = match self.focus {
            Pane::Projects => self.current_project().map(PendingDelete::Project),
            _ => self.selected_task().map(|s| {
                if s.completed {
                    PendingDelete::CompletedTask {
                        project: s.project,
                        task: s.task,
                    }
                } else {
                    PendingDelete::ActiveTask {
                        project: s.project,
                        task: s.task,
                    }
                }
            }),
        };

        let Some(action) = action else {
            return;
        };
        let message = match &action {
            PendingDelete::Project(name) => {
                format!("Delete project \"{}\" and all of its tasks?", name)
            }
            PendingDelete::ActiveTask { task, .. } | PendingDelete::CompletedTask { task, .. } => {
                format!("Delete task \"{}\"?", task)
            }
        };
        self.confirm = Some(ConfirmState { message, action });
        self.ui_mode = UiMode::Confirm;
    }

    /// Confirm answer: run the pending delete
    pub fn confirm_yes(&mut self) {
        let Some(confirm) = self.confirm.take() else {
            return;
        };
        self.ui_mode = self.base_mode;

        match confirm.action {
            PendingDelete::Project(name) => {
                self.store.delete_project(&name);
                self.reset_task_selection();
            }
            PendingDelete::ActiveTask { project, task } => self.store.delete_task(&project, &task),
            PendingDelete::CompletedTask { project, task } => {
                self.store.delete_completed_task(&project, &task)
            }
        }
        self.after_store_change();
        self.show_popup("Deleted", "Deleted");
    }

    /// Confirm answer: keep everything
    pub fn confirm_no(&mut self) {
        self.confirm = None;
        self.ui_mode = self.base_mode;
    }

    /// Switch to the timer screen
    pub fn open_timer(&mut self) {
        self.base_mode = UiMode::Timer;
        self.ui_mode = UiMode::Timer;
        if self.timer.attached_task().is_none() {
            self.cycle_timer_task();
        }
    }

    /// Back to the task lists; the countdown keeps going
    pub fn close_timer(&mut self) {
        self.base_mode = UiMode::Normal;
        self.ui_mode = UiMode::Normal;
    }

    /// Attach the next active task (across all projects) to the timer
    pub fn cycle_timer_task(&mut self) {
        let choices = timer_choices(&self.store);
        if choices.is_empty() {
            self.timer_choice = None;
            self.timer.attach_task(None);
            return;
        }

        let next = self.timer_choice.map_or(0, |i| (i + 1) % choices.len());
        self.timer_choice = Some(next);
        self.timer.attach_task(Some(choices[next].clone()));
    }

    pub fn toggle_timer(&mut self) {
        self.timer.toggle();
    }

    pub fn stop_timer(&mut self) {
        self.timer.stop();
    }

    /// Advance the interval timer by one tick and announce a phase change
    pub fn tick(&mut self) -> Option<PhaseComplete> {
        let event = self.timer.tick()?;
        if self.notifications {
            notifications::notify_phase_complete(&event);
        }
        let (title, message) = event.message();
        self.show_popup(title, message);
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Phase, TimerStatus};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_app() -> AppState {
        let mut store = TaskStore::new();
        store.create_project("Home").unwrap();
        store.create_project("Work").unwrap();
        store.add_task("Home", "Clean").unwrap();
        store.add_task("Home", "Cook").unwrap();
        AppState::new(store, IntervalTimer::new(), false)
    }

    #[test]
    fn test_app_state_new() {
        let app = create_test_app();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.focus, Pane::Projects);
        assert_eq!(app.current_project().as_deref(), Some("Home"));
        assert!(app.selected_task().is_none());
    }

    #[test]
    fn test_move_selection() {
        let mut app = create_test_app();
        app.move_selection_down();
        assert_eq!(app.current_project().as_deref(), Some("Work"));
        app.move_selection_down();
        assert_eq!(app.selected_project, 1);
        app.move_selection_up();
        assert_eq!(app.current_project().as_deref(), Some("Home"));

        app.focus = Pane::ActiveTasks;
        app.move_selection_down();
        assert_eq!(app.selected_task().unwrap().task, "Cook");
    }

    #[test]
    fn test_create_project_selects_it() {
        let mut app = create_test_app();
        app.create_project("Garden");
        assert_eq!(app.current_project().as_deref(), Some("Garden"));
    }

    #[test]
    fn test_duplicate_project_shows_popup() {
        let mut app = create_test_app();
        app.create_project("Home");
        assert_eq!(app.ui_mode, UiMode::Popup);
        assert_eq!(app.popups[0].title, "Duplicate name");
        assert_eq!(app.store.projects().len(), 2);

        app.dismiss_popup();
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_add_task_via_form() {
        let mut app = create_test_app();
        app.start_add_task();
        assert_eq!(app.ui_mode, UiMode::AddingTask);
        for c in "Shop".chars() {
            app.input_form_add_char(c);
        }
        app.submit_input_form();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.input_form.is_none());
        assert_eq!(app.store.project("Home").unwrap().active_tasks(), &["Clean", "Cook", "Shop"]);
    }

    #[test]
    fn test_rename_project_via_form() {
        let mut app = create_test_app();
        app.start_rename_project();
        let form = app.input_form.as_mut().unwrap();
        form.values[0] = "House".to_string();
        app.submit_input_form();

        assert!(app.store.project("House").is_some());
        assert_eq!(app.popups[0].title, "Renamed");
    }

    #[test]
    fn test_save_task_applies_all_fields() {
        let mut app = create_test_app();
        app.save_task("Home", "Clean", "Tidy", "2024-01-10", "kitchen", date(2024, 1, 1));

        assert_eq!(app.store.project("Home").unwrap().active_tasks(), &["Tidy", "Cook"]);
        assert_eq!(app.store.due_date("Home", "Tidy"), Some(date(2024, 1, 10)));
        assert_eq!(app.store.memo("Home", "Tidy"), "kitchen");
        assert_eq!(app.popups[0].title, "Saved");
    }

    #[test]
    fn test_save_task_without_changes() {
        let mut app = create_test_app();
        app.save_task("Home", "Clean", "Clean", "", "", date(2024, 1, 1));
        assert_eq!(app.popups[0].message, "No changes to save");
    }

    #[test]
    fn test_save_task_rename_collision_applies_nothing() {
        let mut app = create_test_app();
        app.save_task("Home", "Clean", "Cook", "2024-01-10", "memo", date(2024, 1, 1));

        assert_eq!(app.popups[0].title, "Duplicate name");
        assert_eq!(app.store.due_date("Home", "Clean"), None);
        assert_eq!(app.store.memo("Home", "Clean"), "");
    }

    #[test]
    fn test_save_task_rejects_past_due_date() {
        let mut app = create_test_app();
        app.save_task("Home", "Clean", "Clean", "2023-12-31", "", date(2024, 1, 1));
        assert_eq!(app.popups[0].message, "Due date cannot be in the past");
        assert_eq!(app.store.due_date("Home", "Clean"), None);

        // Today is allowed
        app.save_task("Home", "Clean", "Clean", "2024-01-01", "", date(2024, 1, 1));
        assert_eq!(app.store.due_date("Home", "Clean"), Some(date(2024, 1, 1)));
    }

    #[test]
    fn test_save_task_keeps_existing_past_due_date() {
        let mut app = create_test_app();
        app.store.set_due_date("Home", "Clean", date(2023, 6, 1));
        app.save_task("Home", "Clean", "Clean", "2023-06-01", "kitchen", date(2024, 1, 1));

        assert_eq!(app.popups[0].title, "Saved");
        assert_eq!(app.store.memo("Home", "Clean"), "kitchen");
    }

    #[test]
    fn test_save_task_rename_follows_timer_task() {
        let mut app = create_test_app();
        app.open_timer();
        assert_eq!(app.timer.attached_task(), Some(&TaskKey::new("Home", "Clean")));

        app.save_task("Home", "Clean", "Tidy", "", "", date(2024, 1, 1));
        assert_eq!(app.timer.attached_task(), Some(&TaskKey::new("Home", "Tidy")));
    }

    #[test]
    fn test_popup_during_form_returns_to_form() {
        let mut app = create_test_app();
        app.timer.reconfigure(Some(1), None).unwrap();
        app.toggle_timer();
        app.start_add_task();

        for _ in 0..60 {
            app.tick();
        }
        assert_eq!(app.ui_mode, UiMode::Popup);

        app.dismiss_popup();
        assert_eq!(app.ui_mode, UiMode::AddingTask);
        assert!(app.input_form.is_some());
    }

    #[test]
    fn test_popup_during_confirm_returns_to_confirm() {
        let mut app = create_test_app();
        app.request_delete();
        app.show_popup("Back to work", "Focus for 25 minutes.");
        app.dismiss_popup();

        assert_eq!(app.ui_mode, UiMode::Confirm);
        app.confirm_no();
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_save_task_invalid_date() {
        let mut app = create_test_app();
        app.save_task("Home", "Clean", "Clean", "next week", "", date(2024, 1, 1));
        assert!(app.popups[0].message.contains("Invalid date"));
    }

    #[test]
    fn test_save_task_clears_due_date() {
        let mut app = create_test_app();
        app.store.set_due_date("Home", "Clean", date(2024, 1, 10));
        app.save_task("Home", "Clean", "Clean", "", "", date(2024, 1, 1));
        assert_eq!(app.store.due_date("Home", "Clean"), None);
    }

    #[test]
    fn test_edit_completed_task_refused() {
        let mut app = create_test_app();
        app.store.complete_task("Home", "Clean");
        app.focus = Pane::CompletedTasks;

        app.start_edit_task();
        assert!(app.input_form.is_none());
        assert_eq!(app.popups[0].message, "Completed tasks cannot be edited");
    }

    #[test]
    fn test_edit_form_prefilled() {
        let mut app = create_test_app();
        app.store.set_due_date("Home", "Clean", date(2024, 1, 10));
        app.store.set_memo("Home", "Clean", "kitchen");
        app.focus = Pane::ActiveTasks;

        app.start_edit_task();
        let form = app.input_form.as_ref().unwrap();
        assert_eq!(form.values, vec!["Clean", "2024-01-10", "kitchen"]);
        assert_eq!(form.original.as_deref(), Some("Clean"));
    }

    #[test]
    fn test_toggle_complete_and_restore() {
        let mut app = create_test_app();
        app.focus = Pane::ActiveTasks;
        app.toggle_complete();
        assert_eq!(app.store.project("Home").unwrap().completed_tasks(), &["Clean"]);

        app.focus = Pane::CompletedTasks;
        app.toggle_complete();
        assert_eq!(app.store.project("Home").unwrap().active_tasks(), &["Cook", "Clean"]);
        assert!(app.store.project("Home").unwrap().completed_tasks().is_empty());
    }

    #[test]
    fn test_delete_project_with_confirmation() {
        let mut app = create_test_app();
        app.request_delete();
        assert_eq!(app.ui_mode, UiMode::Confirm);
        assert_eq!(app.confirm.as_ref().unwrap().action, PendingDelete::Project("Home".to_string()));

        app.confirm_no();
        assert_eq!(app.store.projects().len(), 2);

        app.request_delete();
        app.confirm_yes();
        assert_eq!(app.store.projects().len(), 1);
        assert_eq!(app.current_project().as_deref(), Some("Work"));
    }

    #[test]
    fn test_delete_last_task_clamps_selection() {
        let mut app = create_test_app();
        app.focus = Pane::ActiveTasks;
        app.move_selection_down();
        app.request_delete();
        app.confirm_yes();

        assert_eq!(app.store.project("Home").unwrap().active_tasks(), &["Clean"]);
        assert_eq!(app.selected_active, 0);
    }

    #[test]
    fn test_deadline_popups_on_return_to_projects() {
        let today = date(2024, 1, 10);
        let mut app = create_test_app();
        app.store.set_due_date("Home", "Clean", today);
        app.store.set_due_date("Home", "Cook", date(2024, 1, 11));

        app.focus = Pane::CompletedTasks;
        app.focus_next_pane(today);

        assert_eq!(app.focus, Pane::Projects);
        let titles: Vec<&str> = app.popups.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Due today", "Due soon"]);

        app.dismiss_popup();
        assert_eq!(app.ui_mode, UiMode::Popup);
        app.dismiss_popup();
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_timer_settings_refused_while_running() {
        let mut app = create_test_app();
        app.open_timer();
        app.toggle_timer();
        app.start_timer_settings();

        assert!(app.input_form.is_none());
        assert_eq!(app.popups[0].title, "Timer running");
        app.dismiss_popup();
        assert_eq!(app.ui_mode, UiMode::Timer);
    }

    #[test]
    fn test_timer_settings_form() {
        let mut app = create_test_app();
        app.start_timer_settings();
        let form = app.input_form.as_mut().unwrap();
        form.values = vec!["1".to_string(), "2".to_string()];
        app.submit_input_form();

        assert_eq!(app.timer.work_minutes(), 1);
        assert_eq!(app.timer.rest_minutes(), 2);
        assert_eq!(app.timer.remaining(), chrono::Duration::minutes(1));
    }

    #[test]
    fn test_timer_settings_rejects_bad_input() {
        let mut app = create_test_app();
        app.apply_timer_settings("abc", "5");
        assert_eq!(app.popups[0].message, "Enter a valid number");

        app.apply_timer_settings("61", "5");
        assert!(app.popups[1].message.contains("between 1 and 60"));
        assert_eq!(app.timer.work_minutes(), 25);
    }

    #[test]
    fn test_tick_announces_phase_change() {
        let mut app = create_test_app();
        app.timer.reconfigure(Some(1), None).unwrap();
        app.open_timer();
        app.toggle_timer();

        for _ in 0..59 {
            assert!(app.tick().is_none());
        }
        let event = app.tick().unwrap();
        assert_eq!(event.ended, Phase::Work);
        assert_eq!(app.timer.phase(), Phase::Rest);
        assert_eq!(app.ui_mode, UiMode::Popup);
        assert_eq!(app.popups[0].title, "Time to rest");

        app.dismiss_popup();
        assert_eq!(app.ui_mode, UiMode::Timer);
        assert_eq!(app.timer.status(), TimerStatus::Running);
    }

    #[test]
    fn test_cycle_timer_task() {
        let mut app = create_test_app();
        app.open_timer();
        assert_eq!(app.timer.attached_task(), Some(&TaskKey::new("Home", "Clean")));

        app.cycle_timer_task();
        assert_eq!(app.timer.attached_task(), Some(&TaskKey::new("Home", "Cook")));
        app.cycle_timer_task();
        assert_eq!(app.timer.attached_task(), Some(&TaskKey::new("Home", "Clean")));
    }

    #[test]
    fn test_timer_task_follows_project_rename_and_delete() {
        let mut app = create_test_app();
        app.open_timer();
        app.rename_project("Home", "House");
        assert_eq!(app.timer.attached_task(), Some(&TaskKey::new("House", "Clean")));

        app.close_timer();
        app.focus = Pane::ActiveTasks;
        app.request_delete();
        app.confirm_yes();
        assert!(app.timer.attached_task().is_none());
    }

    #[test]
    fn test_display_state_tracks_selection() {
        let mut app = create_test_app();
        app.store.set_due_date("Home", "Cook", date(2024, 1, 10));

        let state = app.display_state();
        assert_eq!(state.active_labels, vec!["Clean", "Cook [2024-01-10]"]);

        app.move_selection_down();
        assert!(app.display_state().active_labels.is_empty());
    }
}
