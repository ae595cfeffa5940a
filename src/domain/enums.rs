/// Phase of the interval timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Work,
    Rest,
}

impl Phase {
    /// The phase that follows this one when the countdown reaches zero
    pub fn next(&self) -> Self {
        match self {
            Self::Work => Self::Rest,
            Self::Rest => Self::Work,
        }
    }

    /// Display label for the timer pane
    pub fn label(&self) -> &'static str {
        match self {
            Self::Work => "WORK",
            Self::Rest => "REST",
        }
    }
}

/// Run status of the interval timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

impl TimerStatus {
    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Which list currently receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Projects,
    ActiveTasks,
    CompletedTasks,
}

impl Pane {
    /// Cycle focus: projects -> active -> completed -> projects
    pub fn next(&self) -> Self {
        match self {
            Self::Projects => Self::ActiveTasks,
            Self::ActiveTasks => Self::CompletedTasks,
            Self::CompletedTasks => Self::Projects,
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    Timer,
    AddingProject,
    RenamingProject,
    AddingTask,
    EditingTask,
    TimerSettings,
    Confirm,
    Popup,
}

impl UiMode {
    /// Modes that own an input form
    pub fn is_form(&self) -> bool {
        matches!(
            self,
            Self::AddingProject
                | Self::RenamingProject
                | Self::AddingTask
                | Self::EditingTask
                | Self::TimerSettings
        )
    }
}
