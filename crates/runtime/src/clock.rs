use std::cell::{Cell, OnceCell};
use std::time::Instant;

/// Monotonic source of seconds elapsed since the clock started.
///
/// Readings are `f64` so long sessions keep sub-millisecond resolution.
pub trait Clock {
    fn elapsed(&self) -> f64;
}

/// Wall-clock time, starting at the first reading.
///
/// The first call to [`Clock::elapsed`] returns 0, so time spent between
/// construction and the first frame (window and GPU setup) is not counted.
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    start: OnceCell<Instant>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> f64 {
        self.start.get_or_init(Instant::now).elapsed().as_secs_f64()
    }
}

/// Clock advanced by hand. Used by tests and the headless CLI.
///
/// Time only moves forward: [`ManualClock::set`] ignores earlier times.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, seconds: f64) {
        if seconds > 0.0 {
            self.now.set(self.now.get() + seconds);
        }
    }

    pub fn set(&self, seconds: f64) {
        if seconds > self.now.get() {
            self.now.set(seconds);
        }
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> f64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn elapsed(&self) -> f64 {
        (**self).elapsed()
    }
}
