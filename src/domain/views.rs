use super::enums::{Phase, TimerStatus};
use super::store::{TaskKey, TaskStore};
use super::timer::IntervalTimer;
use chrono::{Duration, NaiveDate};

/// Date format used in task labels and the edit form
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Label shown in task lists: "name" or "name [YYYY-MM-DD]"
pub fn task_label(name: &str, due: Option<NaiveDate>) -> String {
    match due {
        Some(date) => format!("{} [{}]", name, date.format(DATE_FORMAT)),
        None => name.to_string(),
    }
}

/// Recover the task name from a label produced by `task_label`.
/// Only a trailing " [YYYY-MM-DD]" with a valid date is stripped.
pub fn parse_task_label(label: &str) -> &str {
    let Some(open) = label.rfind(" [") else {
        return label;
    };
    let suffix = &label[open + 2..];
    match suffix.strip_suffix(']') {
        Some(date) if NaiveDate::parse_from_str(date, DATE_FORMAT).is_ok() => &label[..open],
        _ => label,
    }
}

/// Format a countdown as "MM:SS"
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.num_seconds().max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Read-only snapshot handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub project_names: Vec<String>,
    pub active_labels: Vec<String>,
    pub completed_labels: Vec<String>,
    pub timer_phase: Phase,
    pub timer_status: TimerStatus,
    pub remaining: Duration,
}

/// Build the display snapshot for the selected project (if any)
pub fn display_state(store: &TaskStore, project: Option<&str>, timer: &IntervalTimer) -> DisplayState {
    let selected = project.and_then(|name| store.project(name));
    let labels = |tasks: &[String], project: &str| -> Vec<String> {
        tasks
            .iter()
            .map(|task| store.format_task_label(project, task))
            .collect()
    };

    DisplayState {
        project_names: store.projects().iter().map(|p| p.name().to_string()).collect(),
        active_labels: selected
            .map(|p| labels(p.active_tasks(), p.name()))
            .unwrap_or_default(),
        completed_labels: selected
            .map(|p| labels(p.completed_tasks(), p.name()))
            .unwrap_or_default(),
        timer_phase: timer.phase(),
        timer_status: timer.status(),
        remaining: timer.remaining(),
    }
}

/// How close a deadline is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueWhen {
    Today,
    Tomorrow,
}

/// An active task whose due date is today or tomorrow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueAlert {
    pub key: TaskKey,
    pub when: DueWhen,
}

impl DueAlert {
    pub fn message(&self) -> String {
        match self.when {
            DueWhen::Today => format!("\"{}\" ({}) is due today!", self.key.task, self.key.project),
            DueWhen::Tomorrow => format!("\"{}\" ({}) is due tomorrow.", self.key.task, self.key.project),
        }
    }
}

/// Collect deadline alerts for active tasks across all projects
pub fn due_alerts(store: &TaskStore, today: NaiveDate) -> Vec<DueAlert> {
    let tomorrow = today.succ_opt();
    let mut alerts = Vec::new();

    for project in store.projects() {
        for task in project.active_tasks() {
            let when = match store.due_date(project.name(), task) {
                Some(date) if date == today => DueWhen::Today,
                Some(date) if Some(date) == tomorrow => DueWhen::Tomorrow,
                _ => continue,
            };
            alerts.push(DueAlert {
                key: TaskKey::new(project.name(), task),
                when,
            });
        }
    }

    alerts
}

/// Every active task across projects, in the order the timer chooser cycles them
pub fn timer_choices(store: &TaskStore) -> Vec<TaskKey> {
    store
        .projects()
        .iter()
        .flat_map(|p| p.active_tasks().iter().map(move |t| TaskKey::new(p.name(), t)))
        .collect()
}
