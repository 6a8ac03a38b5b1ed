//! Repeating-timer engine.
//!
//! The host-side implementation of [`TimerPort`].  Time only moves when the
//! owner calls [`Scheduler::tick`] with the seconds that passed, so the same
//! engine runs under a real-time loop (the terminal host) and under tests
//! that advance time by hand.  Firings are reported to a
//! [`SchedulerDelegate`] rather than invoked as callbacks, so the scheduler
//! never holds a reference to the controller.
//!
//! ```text
//!   host loop ── tick(dt) ──▶ Scheduler ── on_timer_fired(h) ──▶ delegate
//!                                                     │
//!                           SessionController::on_timer(h) ◀──┘
//! ```

use crate::app::ports::{SchedulerDelegate, TimerHandle, TimerPort};
use log::{debug, info, warn};

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Maximum number of concurrent schedules (stack-allocated).
const MAX_SCHEDULES: usize = 4;

/// Internal bookkeeping for a live schedule.
#[derive(Debug, Clone)]
struct ScheduleEntry {
    handle: TimerHandle,
    interval_secs: f64,
    /// Seconds accumulated since the last fire.
    elapsed_secs: f64,
}

/// The scheduler engine.
pub struct Scheduler {
    schedules: [Option<ScheduleEntry>; MAX_SCHEDULES],
    next_id: u32,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            schedules: [None, None, None, None],
            next_id: 1,
        }
    }

    /// Advance every live schedule by `elapsed_secs`.
    ///
    /// A schedule fires once per whole interval covered, so a long `dt`
    /// produces several firings; the remainder carries to the next call.
    pub fn tick(&mut self, elapsed_secs: f64, delegate: &mut dyn SchedulerDelegate) {
        if elapsed_secs.is_nan() || elapsed_secs <= 0.0 {
            return;
        }
        for entry in self.schedules.iter_mut().flatten() {
            entry.elapsed_secs += elapsed_secs;
            while entry.elapsed_secs >= entry.interval_secs {
                entry.elapsed_secs -= entry.interval_secs;
                delegate.on_timer_fired(entry.handle);
            }
        }
    }

    /// Number of live schedules.
    pub fn active_count(&self) -> usize {
        self.schedules.iter().filter(|s| s.is_some()).count()
    }

    /// Whether `handle` is still scheduled.
    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.schedules
            .iter()
            .flatten()
            .any(|e| e.handle == handle)
    }

    fn allocate_handle(&mut self) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        handle
    }
}

impl TimerPort for Scheduler {
    fn schedule_repeating(&mut self, interval_secs: f64) -> TimerHandle {
        let handle = self.allocate_handle();
        if interval_secs.is_nan() || interval_secs <= 0.0 {
            warn!(
                "Scheduler: refusing non-positive interval {}s for {:?}",
                interval_secs, handle
            );
            return handle;
        }
        for (i, slot) in self.schedules.iter_mut().enumerate() {
            if slot.is_none() {
                info!(
                    "Scheduler: {:?} every {}s at slot {}",
                    handle, interval_secs, i
                );
                *slot = Some(ScheduleEntry {
                    handle,
                    interval_secs,
                    elapsed_secs: 0.0,
                });
                return handle;
            }
        }
        // All slots full; the handle is valid but never fires.
        warn!("Scheduler: no free slot for {:?}", handle);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        for slot in &mut self.schedules {
            if slot.as_ref().is_some_and(|e| e.handle == handle) {
                debug!("Scheduler: cancelled {:?}", handle);
                *slot = None;
            }
        }
    }
}

/// Delegate that queues fired handles for later dispatch.
#[derive(Debug, Default)]
pub struct FiredTimers {
    fired: Vec<TimerHandle>,
}

impl FiredTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued handle, oldest first.
    pub fn drain(&mut self) -> std::vec::Drain<'_, TimerHandle> {
        self.fired.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}

impl SchedulerDelegate for FiredTimers {
    fn on_timer_fired(&mut self, handle: TimerHandle) {
        self.fired.push(handle);
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
