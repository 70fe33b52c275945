use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time since the previous tick returned, in seconds. Includes the wait.
    pub dt: f64,

    /// Monotonic timestamp taken when the tick returned.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Holds a loop at a target rate by spinning until a frame period has passed.
///
/// The wait is a busy spin and occupies a core until the period has passed. The
/// baseline moves to the moment each tick returns, so a slow frame is never
/// caught up by shortening the next one.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    started: Instant,
    previous: Instant,
    frame_index: u64,
}

impl FrameLimiter {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            previous: now,
            frame_index: 0,
        }
    }

    /// Frame period for `target_fps`, or `None` when the rate is unlimited.
    pub fn period(target_fps: f64) -> Option<Duration> {
        (target_fps.is_finite() && target_fps > 0.0)
            .then(|| Duration::from_secs_f64(1.0 / target_fps))
    }

    /// Waits until at least `1 / target_fps` seconds have passed since the previous tick.
    ///
    /// Non-positive or non-finite rates do not wait.
    pub fn tick(&mut self, target_fps: f64) -> FrameTime {
        if let Some(period) = Self::period(target_fps) {
            while self.previous.elapsed() < period {
                std::hint::spin_loop();
            }
        }

        let now = Instant::now();
        let dt = now.saturating_duration_since(self.previous).as_secs_f64();
        self.previous = now;

        let ft = FrameTime {
            dt,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    /// Resets the baseline to now.
    pub fn reset(&mut self) {
        self.previous = Instant::now();
    }

    /// Seconds since the limiter was created.
    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

impl Default for FrameLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_waits_at_least_one_period() {
        let mut limiter = FrameLimiter::new();
        limiter.reset();
        let ft = limiter.tick(100.0);
        assert!(ft.dt >= 0.01, "dt was {}", ft.dt);
        assert_eq!(ft.frame_index, 0);
        assert_eq!(limiter.tick(0.0).frame_index, 1);
    }

    #[test]
    fn invalid_rates_do_not_wait() {
        assert!(FrameLimiter::period(0.0).is_none());
        assert!(FrameLimiter::period(-30.0).is_none());
        assert!(FrameLimiter::period(f64::NAN).is_none());
        assert!(FrameLimiter::period(f64::INFINITY).is_none());
        assert_eq!(FrameLimiter::period(4.0), Some(Duration::from_millis(250)));
    }

    #[test]
    fn slow_frame_is_not_made_up() {
        let mut limiter = FrameLimiter::new();
        std::thread::sleep(Duration::from_millis(30));
        // Already past the period: returns immediately.
        let start = Instant::now();
        limiter.tick(100.0);
        assert!(start.elapsed() < Duration::from_millis(10));
        // Next tick still waits a full period from the previous return.
        let ft = limiter.tick(100.0);
        assert!(ft.dt >= 0.01);
    }
}
