use std::time::{Duration, Instant};

/// Default lower clamp on a frame's delta.
pub const DEFAULT_DT_MIN: Duration = Duration::from_micros(100);
/// Default upper clamp on a frame's delta, bounding catch-up after a stall.
pub const DEFAULT_DT_MAX: Duration = Duration::from_millis(1000);

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Clamped time since the previous tick, in seconds.
    pub dt: f32,

    /// Sum of all clamped deltas so far, in seconds. Drives sprite animation.
    pub elapsed: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped so a debugger pause or a long stall cannot feed the
/// simulation a huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: Duration,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Clock clamped to `[100 µs, 1000 ms]`.
    pub fn new() -> Self {
        Self::with_clamps(DEFAULT_DT_MIN, DEFAULT_DT_MAX)
    }

    /// Clock clamped to `[dt_min, dt_max]`. A reversed pair is swapped.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        Self {
            last: Instant::now(),
            elapsed: Duration::ZERO,
            frame_index: 0,
            dt_min: dt_min.min(dt_max),
            dt_max: dt_max.max(dt_min),
        }
    }

    /// Resets the delta baseline, e.g. when resuming from suspension.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock to now.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now.saturating_duration_since(self.last).clamp(self.dt_min, self.dt_max);

        self.last = now;
        self.elapsed += dt;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: self.elapsed.as_secs_f32(),
            now,
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
    fn long_stall_is_clamped_to_one_second() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.last = start;
        let ft = clock.tick_at(start + Duration::from_secs(5));
        assert_eq!(ft.dt, 1.0);
    }

    #[test]
    fn zero_delta_is_raised_to_minimum() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.last = start;
        let ft = clock.tick_at(start);
        assert!((ft.dt - 0.0001).abs() < 1e-7);
    }

    #[test]
    fn elapsed_accumulates_clamped_deltas() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(100));
        let start = Instant::now();
        clock.last = start;
        clock.tick_at(start + Duration::from_millis(50));
        let ft = clock.tick_at(start + Duration::from_millis(1050));
        assert!((ft.elapsed - 0.15).abs() < 1e-5);
        assert_eq!(ft.frame_index, 1);
    }

    #[test]
    fn time_going_backwards_counts_as_minimum() {
        let mut clock = FrameClock::new();
        let start = Instant::now() + Duration::from_secs(1);
        clock.last = start;
        let ft = clock.tick_at(start - Duration::from_millis(10));
        assert!((ft.dt - 0.0001).abs() < 1e-7);
    }

    #[test]
    fn reversed_clamps_are_swapped() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(100), Duration::from_millis(1));
        let start = Instant::now();
        clock.last = start;
        let ft = clock.tick_at(start + Duration::from_secs(1));
        assert!((ft.dt - 0.1).abs() < 1e-6);
        let ft = clock.tick_at(start + Duration::from_secs(1));
        assert!((ft.dt - 0.001).abs() < 1e-6);
    }
}
