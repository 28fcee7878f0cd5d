use std::time::{Duration, Instant};

/// Frame clock for the render loop.
pub struct Timer {
    started: Instant,
    last_tick: Instant,
    /// Time since the previous tick.
    pub delta: Duration,
    /// Total time since creation.
    pub elapsed: Duration,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Starts the clock at the moment of the call.
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_tick: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    /// Advances the clock; call once at the top of each frame.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_tick;
        self.elapsed = now - self.started;
        self.last_tick = now;
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}
