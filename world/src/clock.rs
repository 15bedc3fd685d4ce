//! Pausable, scalable virtual time source for every gameplay timer.

use std::time::Duration;

/// Monotonic simulation clock that every timed subsystem reads instead of
/// wall-clock time.
///
/// Pausing freezes the reading without stopping the game loop, so code that
/// compares against the clock simply observes no time having passed.
#[derive(Clone, Copy, Debug)]
pub struct VirtualClock {
    now: Duration,
    paused: bool,
    scale: f32,
}

impl VirtualClock {
    /// Creates a running clock at time zero with unit scale.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
            paused: false,
            scale: 1.0,
        }
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Advances the clock by `dt` adjusted for the scale factor.
    ///
    /// Returns the effective duration that elapsed; zero while paused.
    pub fn advance(&mut self, dt: Duration) -> Duration {
        if self.paused {
            return Duration::ZERO;
        }
        let scaled = dt.mul_f32(self.scale);
        self.now = self.now.saturating_add(scaled);
        scaled
    }

    /// Freezes the clock.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes the clock.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Reports whether the clock is currently frozen.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Sets the time scale factor; negative values are clamped to zero.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(0.0);
    }

    /// Current time scale factor.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Deadline helper measured against a [`VirtualClock`] reading.
///
/// A `None` duration is the sentinel "never fires"; such a timer reports
/// elapsed time but is never over.
#[derive(Clone, Copy, Debug)]
pub struct Timer {
    started_at: Duration,
    duration: Option<Duration>,
}

impl Timer {
    /// Creates a timer that fires `duration` after the provided clock reading.
    #[must_use]
    pub const fn new(duration: Option<Duration>, now: Duration) -> Self {
        Self {
            started_at: now,
            duration,
        }
    }

    /// Time elapsed since the timer started or was last restarted.
    #[must_use]
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }

    /// Reports whether the timer's duration has fully elapsed.
    #[must_use]
    pub fn is_over(&self, now: Duration) -> bool {
        match self.duration {
            Some(duration) => self.elapsed(now) >= duration,
            None => false,
        }
    }

    /// Restarts the timer from the provided clock reading.
    pub fn restart(&mut self, now: Duration) {
        self.started_at = now;
    }

    /// Replaces the timer's duration without restarting it.
    pub fn set_duration(&mut self, duration: Option<Duration>) {
        self.duration = duration;
    }

    /// Configured duration, `None` when the timer never fires.
    #[must_use]
    pub const fn duration(&self) -> Option<Duration> {
        self.duration
    }
}
