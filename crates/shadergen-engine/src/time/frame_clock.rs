use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds.
    pub dt: f32,

    /// Sum of every `dt` since the clock was (re)started, in seconds.
    pub elapsed: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Each step is clamped from below, so `elapsed` is strictly increasing even
/// when two ticks land on the same `Instant`. There is no upper clamp; shader
/// time tracks the wall clock across stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: Duration,
    frame_index: u64,
    dt_min: Duration,
}

impl FrameClock {
    /// Minimum step between two ticks.
    pub const DEFAULT_DT_MIN: Duration = Duration::from_micros(100);

    /// Creates a clock that follows wall time.
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            elapsed: Duration::ZERO,
            frame_index: 0,
            dt_min: Self::DEFAULT_DT_MIN,
        }
    }

    /// Restarts the clock: zero elapsed time, frame counter back to 0.
    pub fn reset(&mut self) {
        self.last = Instant::now();
        self.elapsed = Duration::ZERO;
        self.frame_index = 0;
    }

    /// Seconds accumulated so far.
    pub fn elapsed(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    ///
    /// A `now` earlier than the previous tick counts as the minimum step.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now.saturating_duration_since(self.last).max(self.dt_min);

        self.last = now.max(self.last);
        self.elapsed += dt;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: self.elapsed.as_secs_f32(),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
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
    fn elapsed_strictly_increases_on_identical_instants() {
        let mut clock = FrameClock::new();
        let now = Instant::now();
        let a = clock.tick_at(now);
        let b = clock.tick_at(now);
        let c = clock.tick_at(now);
        assert!(a.elapsed < b.elapsed && b.elapsed < c.elapsed);
        assert_eq!(c.frame_index, 2);
    }

    #[test]
    fn follows_wall_time_across_stalls() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);
        let ft = clock.tick_at(start + Duration::from_secs(5));
        assert!((ft.dt - 5.0).abs() < 1e-3);
    }

    #[test]
    fn reset_zeroes_elapsed_and_counter() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.tick();
        clock.reset();
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.tick().frame_index, 0);
    }
}
