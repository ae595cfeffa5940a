use super::enums::{Phase, TimerStatus};
use super::store::TaskKey;
use chrono::Duration;
use log::{debug, info};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Default work interval in minutes
pub const DEFAULT_WORK_MINUTES: u32 = 25;

/// Default rest interval in minutes
pub const DEFAULT_REST_MINUTES: u32 = 5;

pub const WORK_MINUTES_RANGE: RangeInclusive<u32> = 1..=60;
pub const REST_MINUTES_RANGE: RangeInclusive<u32> = 1..=30;

/// Errors returned by `IntervalTimer::reconfigure`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("Timer is running. Pause or stop it before changing durations")]
    Busy,
    #[error("{setting} time must be between {min} and {max} minutes (got {value})")]
    OutOfRange {
        setting: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

/// Emitted by `tick` when a countdown reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseComplete {
    /// The phase that just ended
    pub ended: Phase,
    /// Length in minutes of the phase that starts now
    pub next_minutes: u32,
}

impl PhaseComplete {
    /// Popup title and message for the transition
    pub fn message(&self) -> (&'static str, String) {
        match self.ended {
            Phase::Work => (
                "Time to rest",
                format!("Take a break for {} minutes.", self.next_minutes),
            ),
            Phase::Rest => (
                "Back to work",
                format!("Focus for {} minutes.", self.next_minutes),
            ),
        }
    }
}

fn check_range(setting: &'static str, value: u32, range: &RangeInclusive<u32>) -> Result<(), TimerError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(TimerError::OutOfRange {
            setting,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Work/rest countdown driven by an external once-per-second tick
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    phase: Phase,
    remaining: Duration,
    status: TimerStatus,
    work_minutes: u32,
    rest_minutes: u32,
    /// Task shown next to the countdown (display only)
    task: Option<TaskKey>,
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self {
            phase: Phase::Work,
            remaining: Duration::minutes(DEFAULT_WORK_MINUTES as i64),
            status: TimerStatus::Idle,
            work_minutes: DEFAULT_WORK_MINUTES,
            rest_minutes: DEFAULT_REST_MINUTES,
            task: None,
        }
    }
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an idle timer with custom lengths (validated against the bounds)
    pub fn with_lengths(work_minutes: u32, rest_minutes: u32) -> Result<Self, TimerError> {
        let mut timer = Self::new();
        timer.reconfigure(Some(work_minutes), Some(rest_minutes))?;
        Ok(timer)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn work_minutes(&self) -> u32 {
        self.work_minutes
    }

    pub fn rest_minutes(&self) -> u32 {
        self.rest_minutes
    }

    pub fn attached_task(&self) -> Option<&TaskKey> {
        self.task.as_ref()
    }

    pub fn attach_task(&mut self, task: Option<TaskKey>) {
        self.task = task;
    }

    fn minutes_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_minutes,
            Phase::Rest => self.rest_minutes,
        }
    }

    /// Full length of the current phase
    pub fn phase_length(&self) -> Duration {
        Duration::minutes(self.minutes_for(self.phase) as i64)
    }

    /// Fraction of the current phase already elapsed (0.0 to 1.0)
    pub fn progress_ratio(&self) -> f64 {
        let total = self.phase_length().num_seconds() as f64;
        if total == 0.0 {
            return 1.0;
        }
        let elapsed = total - self.remaining.num_seconds() as f64;
        (elapsed / total).clamp(0.0, 1.0)
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.remaining = self.phase_length();
    }

    /// Start or resume in the current phase
    pub fn start(&mut self) {
        if self.status != TimerStatus::Running {
            debug!("timer {} -> RUNNING ({})", self.status.to_tag(), self.phase.label());
            self.status = TimerStatus::Running;
        }
    }

    /// Pause a running countdown, keeping phase and remaining time
    pub fn pause(&mut self) {
        if self.status == TimerStatus::Running {
            debug!("timer paused at {}s", self.remaining.num_seconds());
            self.status = TimerStatus::Paused;
        }
    }

    /// Toggle between running and paused
    pub fn toggle(&mut self) {
        match self.status {
            TimerStatus::Idle | TimerStatus::Paused => self.start(),
            TimerStatus::Running => self.pause(),
        }
    }

    /// Back to idle at the start of a work phase
    pub fn stop(&mut self) {
        self.status = TimerStatus::Idle;
        self.enter(Phase::Work);
        debug!("timer stopped");
    }

    /// Advance the countdown by one second.
    ///
    /// Returns the completed phase when the countdown reaches zero; the timer
    /// then switches phase and keeps running. Ticks while idle or paused are
    /// ignored.
    pub fn tick(&mut self) -> Option<PhaseComplete> {
        if self.status != TimerStatus::Running {
            return None;
        }

        if self.remaining > Duration::zero() {
            self.remaining = self.remaining - Duration::seconds(1);
        }
        if self.remaining > Duration::zero() {
            return None;
        }

        let ended = self.phase;
        self.enter(ended.next());
        info!("{} phase complete, starting {}", ended.label(), self.phase.label());

        Some(PhaseComplete {
            ended,
            next_minutes: self.minutes_for(self.phase),
        })
    }

    /// Change work and/or rest length in minutes.
    ///
    /// Refused while running. Both values are validated before either is
    /// applied. An idle timer restarts its countdown from the new work length.
    pub fn reconfigure(&mut self, work_minutes: Option<u32>, rest_minutes: Option<u32>) -> Result<(), TimerError> {
        if self.status == TimerStatus::Running {
            return Err(TimerError::Busy);
        }
        if let Some(work) = work_minutes {
            check_range("Work", work, &WORK_MINUTES_RANGE)?;
        }
        if let Some(rest) = rest_minutes {
            check_range("Rest", rest, &REST_MINUTES_RANGE)?;
        }

        if let Some(work) = work_minutes {
            self.work_minutes = work;
        }
        if let Some(rest) = rest_minutes {
            self.rest_minutes = rest;
        }
        if self.status == TimerStatus::Idle {
            self.enter(Phase::Work);
        }

        info!("timer set to {}m work / {}m rest", self.work_minutes, self.rest_minutes);
        Ok(())
    }
}
