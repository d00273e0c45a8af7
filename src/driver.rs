// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use tracing::trace;

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Calls the frame body once per period.
///
/// The body runs under `&mut self`, so a frame can never start while
/// another is running. Slots that pass while a frame overruns are dropped
/// rather than replayed.
#[derive(Debug)]
pub struct FrameDriver<C: Clock> {
    clock: C,
    period: Duration,
    next_frame: Instant,
    frames: u64,
    dropped: u64,
}

impl<C: Clock> FrameDriver<C> {
    pub fn new(clock: C, fps: f64) -> Self {
        let period = Duration::from_secs_f64(1.0 / fps.clamp(1.0, 1000.0));
        let next_frame = clock.now();
        Self {
            clock,
            period,
            next_frame,
            frames: 0,
            dropped: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Time left until the next frame is due.
    pub fn until_next_frame(&self) -> Duration {
        self.next_frame.saturating_duration_since(self.clock.now())
    }

    /// Runs `body` if a frame is due. Returns whether it ran.
    pub fn run_frame<F: FnOnce()>(&mut self, body: F) -> bool {
        let now = self.clock.now();
        if now < self.next_frame {
            return false;
        }

        body();
        self.frames += 1;

        self.next_frame += self.period;
        let done = self.clock.now();
        if done > self.next_frame {
            let behind = done.saturating_duration_since(self.next_frame);
            let missed = (behind.as_nanos() / self.period.as_nanos().max(1)) as u64;
            if missed > 0 {
                self.dropped += missed;
                trace!(missed, "dropped frames after overrun");
            }
            self.next_frame = done;
        }
        true
    }
}

/// Keeps only the latest resize seen between two frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingResize(Option<(u16, u16)>);

impl PendingResize {
    pub fn push(&mut self, cols: u16, rows: u16) {
        self.0 = Some((cols, rows));
    }

    pub fn take(&mut self) -> Option<(u16, u16)> {
        self.0.take()
    }

    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[derive(Clone)]
    struct ManualClock {
        base: Instant,
        offset: Rc<Cell<Duration>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                base: Instant::now(),
                offset: Rc::new(Cell::new(Duration::ZERO)),
            }
        }

        fn advance(&self, d: Duration) {
            self.offset.set(self.offset.get() + d);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + self.offset.get()
        }
    }

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn first_frame_runs_immediately_then_waits_a_period() {
        let clock = ManualClock::new();
        let mut driver = FrameDriver::new(clock.clone(), 50.0);
        assert_eq!(driver.period(), 20 * MS);

        assert!(driver.run_frame(|| {}));
        assert!(!driver.run_frame(|| panic!("ran early")));
        assert_eq!(driver.until_next_frame(), 20 * MS);

        clock.advance(19 * MS);
        assert!(!driver.run_frame(|| {}));
        clock.advance(MS);
        assert!(driver.run_frame(|| {}));
        assert_eq!(driver.frames(), 2);
    }

    #[test]
    fn overrun_drops_missed_frames_instead_of_queueing() {
        let clock = ManualClock::new();
        let mut driver = FrameDriver::new(clock.clone(), 100.0);

        let slow = clock.clone();
        assert!(driver.run_frame(move || slow.advance(55 * MS)));
        assert_eq!(driver.dropped(), 4);

        // One frame now, not a burst of catch-up frames.
        assert!(driver.run_frame(|| {}));
        assert!(!driver.run_frame(|| {}));
        assert_eq!(driver.frames(), 2);
    }

    #[test]
    fn pending_resize_keeps_the_latest() {
        let mut p = PendingResize::default();
        assert!(!p.is_pending());
        p.push(80, 24);
        p.push(100, 30);
        assert_eq!(p.take(), Some((100, 30)));
        assert_eq!(p.take(), None);
    }
}
