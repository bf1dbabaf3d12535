use std::time::Duration;

/// Fixed-interval tick gate. Converts a free-running render callback into
/// discrete simulation steps and carries the difficulty ramp: the interval
/// shrinks as food is eaten, clamped to a floor.
#[derive(Debug)]
pub struct TickClock {
    last_tick: Duration,
    interval: f32,
}

impl TickClock {
    pub fn new(interval: f32) -> Self {
        Self {
            last_tick: Duration::ZERO,
            interval,
        }
    }

    /// Seconds per tick right now.
    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn due(&self, now: Duration) -> bool {
        now.saturating_sub(self.last_tick) >= Duration::from_secs_f32(self.interval)
    }

    /// Record that a tick fired at `now`.
    pub fn mark(&mut self, now: Duration) {
        self.last_tick = now;
    }

    /// Re-anchor without changing the interval. Used on unpause and game
    /// start so a stale timestamp never produces a catch-up burst.
    pub fn rearm(&mut self, now: Duration) {
        self.last_tick = now;
    }

    /// Shrink the interval by `step`, never below `floor`.
    pub fn quicken(&mut self, step: f32, floor: f32) {
        self.interval = (self.interval - step).max(floor);
    }

    pub fn reset(&mut self, interval: f32) {
        self.interval = interval;
        self.last_tick = Duration::ZERO;
    }
}
