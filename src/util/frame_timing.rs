//! Frame clock measuring per-frame time steps.

use std::time::Duration;

use web_time::Instant;

/// Time step handed to the frame driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock started.
    pub elapsed: f32,
    /// Seconds since the previous tick.
    pub delta: f32,
}

/// Elapsed/delta clock with smoothed FPS tracking
pub struct FrameClock {
    start: Instant,
    /// Last frame timestamp
    last_frame: Instant,
    last_report: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameClock {
    /// How often [`report_due`](Self::report_due) fires.
    const REPORT_INTERVAL: Duration = Duration::from_secs(1);

    /// Start a clock at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Start a clock at `now`.
    #[must_use]
    pub fn starting_at(now: Instant) -> Self {
        Self {
            start: now,
            last_frame: now,
            last_report: now,
            smoothed_fps: 60.0,
            smoothing: 0.05, // 5% new value, 95% old value
        }
    }

    /// Restart elapsed time from zero at `now`.
    pub fn reset(&mut self, now: Instant) {
        *self = Self::starting_at(now);
    }

    /// Record a frame at `now` and return its time step.
    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let delta = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if delta > 0.0 {
            let instant_fps = 1.0 / delta;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }

        FrameTime {
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            delta,
        }
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Returns `true` at most once per second, for periodic stat logging.
    pub fn report_due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_report)
            >= Self::REPORT_INTERVAL
        {
            self.last_report = now;
            true
        } else {
            false
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_and_delta() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        let a = clock.tick(t0 + Duration::from_millis(16));
        let b = clock.tick(t0 + Duration::from_millis(48));
        assert!((a.elapsed - 0.016).abs() < 1e-4);
        assert!((b.delta - 0.032).abs() < 1e-4);
        assert!((b.elapsed - 0.048).abs() < 1e-4);
    }

    #[test]
    fn report_fires_once_per_interval() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        assert!(!clock.report_due(t0 + Duration::from_millis(500)));
        assert!(clock.report_due(t0 + Duration::from_millis(1000)));
        assert!(!clock.report_due(t0 + Duration::from_millis(1500)));
    }
}
