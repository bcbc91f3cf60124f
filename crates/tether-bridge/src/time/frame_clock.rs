use std::time::{Duration, Instant};

/// Timing of one engine update.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous update, clamped.
    pub dt: f32,

    /// Updates observed before this one.
    pub frame_index: u64,
}

/// Delta-time clock for engines driven through the bridge.
///
/// Engine updates take no arguments, so an engine that needs `dt` measures
/// it itself: call `tick()` at the top of every update.
///
/// The first tick after construction or `restart()` measures from that
/// point. Deltas are clamped so a stall (debugger, backgrounded app,
/// surface recreation) does not produce a huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    frames: u64,
    min_dt: Duration,
    max_dt: Duration,
}

impl FrameClock {
    pub const DEFAULT_MIN_DT: Duration = Duration::from_micros(100);
    pub const DEFAULT_MAX_DT: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self::with_clamps(Self::DEFAULT_MIN_DT, Self::DEFAULT_MAX_DT)
    }

    pub fn with_clamps(min_dt: Duration, max_dt: Duration) -> Self {
        debug_assert!(min_dt <= max_dt);
        Self {
            start: Instant::now(),
            frames: 0,
            min_dt,
            max_dt,
        }
    }

    /// Unclamped time since the last tick or restart.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Moves the baseline to now without counting a frame.
    pub fn restart(&mut self) {
        self.start = Instant::now();
    }

    /// Measures the step since the previous tick and restarts.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.start)
            .clamp(self.min_dt, self.max_dt);
        self.start = now;

        let frame_index = self.frames;
        self.frames = self.frames.wrapping_add(1);

        FrameTime {
            dt: dt.as_secs_f32(),
            frame_index,
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
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        clock.restart();
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn dt_is_clamped_to_minimum() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(5), Duration::from_millis(10));
        let ft = clock.tick();
        assert!(ft.dt >= 0.005);
    }

    #[test]
    fn dt_is_clamped_to_maximum() {
        let mut clock = FrameClock::with_clamps(Duration::ZERO, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(20));
        let ft = clock.tick();
        assert!(ft.dt <= 0.001 + f32::EPSILON);
    }
}
