pub mod enums;
pub mod store;
pub mod timer;
pub mod views;

pub use enums::{Pane, Phase, TimerStatus, UiMode};
pub use store::{StoreError, TaskKey, TaskStore};
pub use timer::{IntervalTimer, PhaseComplete, TimerError};
pub use views::{
    display_state, due_alerts, format_remaining, parse_task_label, timer_choices, DisplayState,
    DueAlert, DueWhen, DATE_FORMAT,
};
