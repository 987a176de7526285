/// Frame scheduling
///
/// The animation runs on one cooperative per-frame tick. `FrameScheduler`
/// turns clock readings into per-tick deltas (in milliseconds) and can be
/// stopped while a sheet is swapped. The clock is abstracted so tests can
/// drive ticks with a manual fixed-step clock.
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic time
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to
///
/// Clones share the same time, so a test can keep one handle and give the
/// other to a scheduler.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Start/stop/tick driver for the animation loop
pub struct FrameScheduler<C: Clock> {
    clock: C,

    /// Whether ticks are currently delivered
    running: bool,

    /// Clock reading of the previous tick (None until the first tick)
    last_frame_time: Option<Duration>,
}

impl<C: Clock> FrameScheduler<C> {
    /// Create a stopped scheduler
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            running: false,
            last_frame_time: None,
        }
    }

    /// Start delivering ticks; the first tick has a zero delta
    pub fn start(&mut self) {
        self.running = true;
        self.last_frame_time = None;
        log::debug!("Frame scheduler started");
    }

    /// Stop delivering ticks
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.last_frame_time = None;
            log::debug!("Frame scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance one frame
    ///
    /// Returns the elapsed milliseconds since the previous tick, or `None`
    /// while stopped.
    pub fn tick(&mut self) -> Option<f32> {
        if !self.running {
            return None;
        }

        let now = self.clock.now();
        let frame_time = self
            .last_frame_time
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_frame_time = Some(now);

        Some(frame_time.as_secs_f32() * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scheduler_starts_stopped() {
        let mut scheduler = FrameScheduler::new(ManualClock::new());
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.tick(), None);
    }

    #[test]
    fn test_first_tick_has_zero_delta() {
        let clock = ManualClock::new();
        clock.advance_ms(500);

        let mut scheduler = FrameScheduler::new(clock.clone());
        scheduler.start();
        assert_eq!(scheduler.tick(), Some(0.0));
    }

    #[test]
    fn test_tick_reports_elapsed_ms() {
        let clock = ManualClock::new();
        let mut scheduler = FrameScheduler::new(clock.clone());
        scheduler.start();
        scheduler.tick();

        clock.advance_ms(16);
        assert_relative_eq!(scheduler.tick().unwrap(), 16.0, epsilon = 1e-3);

        clock.advance_ms(250);
        assert_relative_eq!(scheduler.tick().unwrap(), 250.0, epsilon = 1e-3);
    }

    #[test]
    fn test_stop_and_restart_resets_delta() {
        let clock = ManualClock::new();
        let mut scheduler = FrameScheduler::new(clock.clone());
        scheduler.start();
        scheduler.tick();

        scheduler.stop();
        clock.advance_ms(1000);
        assert_eq!(scheduler.tick(), None);

        scheduler.start();
        assert_eq!(scheduler.tick(), Some(0.0));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
