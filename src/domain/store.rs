use super::views::{parse_task_label, task_label};
use chrono::NaiveDate;
use log::{debug, info};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Identity of a task: the owning project's name plus the task's name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskKey {
    pub project: String,
    pub task: String,
}

impl TaskKey {
    pub fn new(project: &str, task: &str) -> Self {
        Self {
            project: project.to_string(),
            task: task.to_string(),
        }
    }
}

impl fmt::Display for TaskKey {
    /// Format used by the timer's task chooser: "[Home] - Clean"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] - {}", self.project, self.task)
    }
}

/// Errors surfaced to the user by store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("A project named \"{0}\" already exists")]
    DuplicateProject(String),
    #[error("A task named \"{0}\" already exists in this project")]
    DuplicateTask(String),
    #[error("Name cannot be empty")]
    EmptyName,
    #[error("Task name \"{0}\" cannot end with a bracketed date")]
    DateSuffix(String),
    #[error("Project \"{0}\" not found")]
    ProjectNotFound(String),
}

impl StoreError {
    /// True for the duplicate-name rejections (project or task)
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateProject(_) | Self::DuplicateTask(_))
    }
}

/// A named container of active and completed tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,
    active_tasks: Vec<String>,
    completed_tasks: Vec<String>,
}

impl Project {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            active_tasks: Vec::new(),
            completed_tasks: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active task names in insertion order
    pub fn active_tasks(&self) -> &[String] {
        &self.active_tasks
    }

    /// Completed task names in completion order
    pub fn completed_tasks(&self) -> &[String] {
        &self.completed_tasks
    }

    pub fn is_active(&self, task: &str) -> bool {
        self.active_tasks.iter().any(|t| t == task)
    }

    pub fn is_completed(&self, task: &str) -> bool {
        self.completed_tasks.iter().any(|t| t == task)
    }

    /// True if the task exists in either list
    pub fn has_task(&self, task: &str) -> bool {
        self.is_active(task) || self.is_completed(task)
    }
}

/// Owns every project plus the due-date and memo side tables.
///
/// All mutation goes through the methods below so that renames and deletes
/// keep the side tables consistent with the task lists.
#[derive(Debug, Default)]
pub struct TaskStore {
    projects: Vec<Project>,
    due_dates: HashMap<TaskKey, NaiveDate>,
    memos: HashMap<TaskKey, String>,
}

fn ensure_named(name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        Err(StoreError::EmptyName)
    } else {
        Ok(())
    }
}

/// Task names must not end in " [YYYY-MM-DD]" or labels become ambiguous
fn ensure_task_named(name: &str) -> Result<(), StoreError> {
    ensure_named(name)?;
    if parse_task_label(name) != name {
        return Err(StoreError::DateSuffix(name.to_string()));
    }
    Ok(())
}

/// Rebuild a side table with every key of `old` moved under `new`
fn rekey_project<V>(table: HashMap<TaskKey, V>, old: &str, new: &str) -> HashMap<TaskKey, V> {
    table
        .into_iter()
        .map(|(key, value)| {
            if key.project == old {
                (TaskKey::new(new, &key.task), value)
            } else {
                (key, value)
            }
        })
        .collect()
}

/// Move (or copy, when `keep_old`) a single entry from `from` to `to`
fn rekey_task<V: Clone>(table: &mut HashMap<TaskKey, V>, from: &TaskKey, to: TaskKey, keep_old: bool) {
    let value = if keep_old {
        table.get(from).cloned()
    } else {
        table.remove(from)
    };
    if let Some(value) = value {
        table.insert(to, value);
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All projects in creation order
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    fn project_mut(&mut self, name: &str) -> Result<&mut Project, StoreError> {
        self.projects
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| StoreError::ProjectNotFound(name.to_string()))
    }

    fn has_task(&self, project: &str, task: &str) -> bool {
        self.project(project).map_or(false, |p| p.has_task(task))
    }

    pub fn create_project(&mut self, name: &str) -> Result<&Project, StoreError> {
        ensure_named(name)?;
        if self.project(name).is_some() {
            return Err(StoreError::DuplicateProject(name.to_string()));
        }

        info!("created project {:?}", name);
        self.projects.push(Project::new(name));
        let idx = self.projects.len() - 1;
        Ok(&self.projects[idx])
    }

    /// Rename a project and re-key its due dates and memos.
    /// Renaming a project to its current name is a no-op.
    pub fn rename_project(&mut self, project: &str, new_name: &str) -> Result<(), StoreError> {
        ensure_named(new_name)?;
        if self.project(project).is_none() {
            return Err(StoreError::ProjectNotFound(project.to_string()));
        }
        if project == new_name {
            return Ok(());
        }
        if self.project(new_name).is_some() {
            return Err(StoreError::DuplicateProject(new_name.to_string()));
        }

        self.project_mut(project)?.name = new_name.to_string();

        // Build both tables from a full snapshot, then swap them in
        let due_dates = rekey_project(std::mem::take(&mut self.due_dates), project, new_name);
        let memos = rekey_project(std::mem::take(&mut self.memos), project, new_name);
        self.due_dates = due_dates;
        self.memos = memos;

        info!("renamed project {:?} to {:?}", project, new_name);
        Ok(())
    }

    /// Remove a project together with all of its due dates and memos
    pub fn delete_project(&mut self, project: &str) {
        let before = self.projects.len();
        self.projects.retain(|p| p.name != project);
        if self.projects.len() == before {
            debug!("delete_project: {:?} not found", project);
            return;
        }

        self.due_dates.retain(|key, _| key.project != project);
        self.memos.retain(|key, _| key.project != project);
        info!("deleted project {:?}", project);
    }

    pub fn add_task(&mut self, project: &str, name: &str) -> Result<(), StoreError> {
        ensure_task_named(name)?;
        let p = self.project_mut(project)?;
        if p.is_active(name) {
            return Err(StoreError::DuplicateTask(name.to_string()));
        }

        p.active_tasks.push(name.to_string());
        debug!("added task {:?} to {:?}", name, project);
        Ok(())
    }

    /// Rename an active task in place and carry its due date and memo over.
    /// Does nothing if `old` is not an active task of the project.
    pub fn rename_task(&mut self, project: &str, old: &str, new: &str) -> Result<(), StoreError> {
        let p = self.project_mut(project)?;
        let Some(pos) = p.active_tasks.iter().position(|t| t == old) else {
            return Ok(());
        };
        if old == new {
            return Ok(());
        }
        ensure_task_named(new)?;
        if p.is_active(new) {
            return Err(StoreError::DuplicateTask(new.to_string()));
        }
        // Taking over a completed task's name would overwrite its due date and memo
        let twin_has_metadata = p.is_completed(new) && {
            let key = TaskKey::new(project, new);
            self.due_dates.contains_key(&key) || self.memos.contains_key(&key)
        };
        if twin_has_metadata {
            return Err(StoreError::DuplicateTask(new.to_string()));
        }

        let p = self.project_mut(project)?;
        p.active_tasks[pos] = new.to_string();
        // A completed task with the old name keeps its own metadata
        let keep_old = p.is_completed(old);

        let from = TaskKey::new(project, old);
        let to = TaskKey::new(project, new);
        rekey_task(&mut self.due_dates, &from, to.clone(), keep_old);
        rekey_task(&mut self.memos, &from, to, keep_old);

        debug!("renamed task {:?} to {:?} in {:?}", old, new, project);
        Ok(())
    }

    /// Delete an active task and purge its due date and memo
    pub fn delete_task(&mut self, project: &str, name: &str) {
        let Ok(p) = self.project_mut(project) else {
            return;
        };
        let Some(pos) = p.active_tasks.iter().position(|t| t == name) else {
            return;
        };
        p.active_tasks.remove(pos);
        let still_exists = p.has_task(name);

        if !still_exists {
            self.purge_task(project, name);
        }
        debug!("deleted task {:?} from {:?}", name, project);
    }

    /// Delete a completed task and purge its due date and memo
    pub fn delete_completed_task(&mut self, project: &str, name: &str) {
        let Ok(p) = self.project_mut(project) else {
            return;
        };
        let Some(pos) = p.completed_tasks.iter().position(|t| t == name) else {
            return;
        };
        p.completed_tasks.remove(pos);
        let still_exists = p.has_task(name);

        if !still_exists {
            self.purge_task(project, name);
        }
        debug!("deleted completed task {:?} from {:?}", name, project);
    }

    fn purge_task(&mut self, project: &str, name: &str) {
        let key = TaskKey::new(project, name);
        self.due_dates.remove(&key);
        self.memos.remove(&key);
    }

    /// Move an active task to the end of the completed list
    pub fn complete_task(&mut self, project: &str, name: &str) {
        let Ok(p) = self.project_mut(project) else {
            return;
        };
        if let Some(pos) = p.active_tasks.iter().position(|t| t == name) {
            let task = p.active_tasks.remove(pos);
            p.completed_tasks.push(task);
            debug!("completed task {:?} in {:?}", name, project);
        }
    }

    /// Move a completed task to the end of the active list.
    /// Fails if an active task already uses the name.
    pub fn restore_task(&mut self, project: &str, name: &str) -> Result<(), StoreError> {
        let p = self.project_mut(project)?;
        let Some(pos) = p.completed_tasks.iter().position(|t| t == name) else {
            return Ok(());
        };
        if p.is_active(name) {
            return Err(StoreError::DuplicateTask(name.to_string()));
        }

        let task = p.completed_tasks.remove(pos);
        p.active_tasks.push(task);
        debug!("restored task {:?} in {:?}", name, project);
        Ok(())
    }

    pub fn set_due_date(&mut self, project: &str, name: &str, date: NaiveDate) {
        if !self.has_task(project, name) {
            debug!("set_due_date: no task {:?} in {:?}", name, project);
            return;
        }
        self.due_dates.insert(TaskKey::new(project, name), date);
    }

    pub fn clear_due_date(&mut self, project: &str, name: &str) {
        self.due_dates.remove(&TaskKey::new(project, name));
    }

    pub fn due_date(&self, project: &str, name: &str) -> Option<NaiveDate> {
        self.due_dates.get(&TaskKey::new(project, name)).copied()
    }

    /// Store a memo; an empty memo removes the entry
    pub fn set_memo(&mut self, project: &str, name: &str, text: &str) {
        if !self.has_task(project, name) {
            debug!("set_memo: no task {:?} in {:?}", name, project);
            return;
        }
        let key = TaskKey::new(project, name);
        if text.is_empty() {
            self.memos.remove(&key);
        } else {
            self.memos.insert(key, text.to_string());
        }
    }

    /// Memo text, or "" when none was set
    pub fn memo(&self, project: &str, name: &str) -> &str {
        self.memos
            .get(&TaskKey::new(project, name))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Only active tasks count; a completed task's name may be reused
    pub fn is_name_taken(&self, project: &str, name: &str) -> bool {
        self.project(project).map_or(false, |p| p.is_active(name))
    }

    /// Display label: "name" or "name [YYYY-MM-DD]" when a due date is set
    pub fn format_task_label(&self, project: &str, name: &str) -> String {
        task_label(name, self.due_date(project, name))
    }
}
