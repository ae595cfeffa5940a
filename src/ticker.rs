use std::time::{Duration, Instant};

/// Default UI refresh interval in milliseconds
pub const DEFAULT_REFRESH_MS: u64 = 250;

/// Default timer tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Get refresh duration (how long the event loop waits for input)
pub fn refresh_duration(refresh_ms: u64) -> Duration {
    Duration::from_millis(refresh_ms)
}

/// Paces timer ticks independently of the UI refresh rate.
///
/// `due` reports at most one tick per call, so a stalled loop never produces
/// a burst of catch-up ticks.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    last: Instant,
}

impl Ticker {
    pub fn new(tick_ms: u64) -> Self {
        Self::starting_at(tick_ms, Instant::now())
    }

    pub fn starting_at(tick_ms: u64, start: Instant) -> Self {
        Self {
            interval: Duration::from_millis(tick_ms),
            last: start,
        }
    }

    /// True when a tick interval has passed since the last tick
    pub fn due(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }
}
