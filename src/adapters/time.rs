//! Clock adapters.
//!
//! Provides wall-clock time for the resume protocol.
//!
//! - [`SystemClock`] — `std::time::SystemTime`, for real hosts.
//! - [`ManualClock`] — a settable clock for tests and simulations.

use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::app::ports::ClockPort;

/// Host wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for SystemClock {
    /// Seconds since the Unix epoch.  A clock set before 1970 reads as a
    /// negative value, which the resume protocol treats as "no catch-up".
    fn now_secs(&self) -> f64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs_f64(),
            Err(e) => -e.duration().as_secs_f64(),
        }
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_secs: f64) -> Self {
        Self {
            now: Cell::new(start_secs),
        }
    }

    /// Move forward (or backward, with a negative delta).
    pub fn advance(&self, delta_secs: f64) {
        self.now.set(self.now.get() + delta_secs);
    }
}

impl ClockPort for ManualClock {
    fn now_secs(&self) -> f64 {
        self.now.get()
    }
}
