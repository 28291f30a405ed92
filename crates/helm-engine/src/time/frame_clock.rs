use std::time::{Duration, Instant};

/// Engine time snapshot taken at a frame boundary.
#[derive(Debug, Copy, Clone, Default)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds.
    pub dt: f32,

    /// Same as `dt`, full precision.
    pub dt64: f64,

    /// Time since the first tick, in seconds.
    pub total: f64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Owned by the session and ticked once per frame by the frame-begin
/// subsystem. The clock starts at its first tick, which reports zero delta
/// and zero total, so time spent before the first frame is never counted.
/// Later deltas are clamped so a debugger pause or a long stall does not
/// hand downstream subsystems a huge step; total time is not clamped.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Option<Instant>,
    last: Option<Instant>,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps (0.1 ms to 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            start: None,
            last: None,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let start = *self.start.get_or_insert(now);
        let dt = match self.last.replace(now) {
            Some(last) => now
                .saturating_duration_since(last)
                .clamp(self.dt_min, self.dt_max),
            None => Duration::ZERO,
        };

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            dt64: dt.as_secs_f64(),
            total: now.saturating_duration_since(start).as_secs_f64(),
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

    fn clamped() -> FrameClock {
        FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(50))
    }

    #[test]
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn first_tick_starts_the_clock() {
        let mut clock = clamped();
        let first = clock.tick_at(Instant::now() + Duration::from_secs(5));
        assert_eq!(first.dt64, 0.0);
        assert_eq!(first.total, 0.0);
    }

    #[test]
    fn delta_is_clamped_but_total_is_not() {
        let mut clock = clamped();
        let start = Instant::now();
        clock.tick_at(start);

        let ft = clock.tick_at(start + Duration::from_secs(3));
        assert_eq!(ft.dt64, 0.05);
        assert_eq!(ft.total, 3.0);
    }

    #[test]
    fn tiny_delta_raised_to_minimum() {
        let mut clock = clamped();
        let at = Instant::now();
        clock.tick_at(at);
        assert_eq!(clock.tick_at(at).dt64, 0.001);
    }
}
