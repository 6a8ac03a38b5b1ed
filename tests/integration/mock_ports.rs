//! Mock adapters for integration tests.
//!
//! Records every emitted event and every snapshot write so tests can
//! assert on the full history without a real disk or real time.

use tamo::adapters::time::ManualClock;
use tamo::app::events::SessionEvent;
use tamo::app::ports::{EventSink, SnapshotPort};
use tamo::app::session::{SessionController, SessionSnapshot};
use tamo::config::SessionConfig;
use tamo::pet::PetState;
use tamo::scheduler::{FiredTimers, Scheduler};

/// Epoch seconds every test starts from.
pub const T0: f64 = 1_700_000_000.0;

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<SessionEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&SessionEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn last(&self) -> Option<&SessionEvent> {
        self.events.last()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &SessionEvent) {
        self.events.push(event.clone());
    }
}

// ── MemorySnapshots ───────────────────────────────────────────

/// Single-slot snapshot store that counts writes.
#[derive(Default)]
pub struct MemorySnapshots {
    pub slot: Option<SessionSnapshot>,
    pub saves: usize,
}

impl MemorySnapshots {
    pub fn with(snapshot: SessionSnapshot) -> Self {
        Self {
            slot: Some(snapshot),
            saves: 0,
        }
    }
}

impl SnapshotPort for MemorySnapshots {
    fn load(&self) -> Option<SessionSnapshot> {
        self.slot
    }

    fn save(&mut self, snapshot: &SessionSnapshot) {
        self.slot = Some(*snapshot);
        self.saves += 1;
    }
}

// ── Helpers ───────────────────────────────────────────────────

pub type TestController = SessionController<ManualClock, MemorySnapshots, Scheduler, RecordingSink>;

pub fn pet(hunger: f64, happiness: f64, energy: f64, is_sleeping: bool) -> PetState {
    PetState {
        hunger,
        happiness,
        energy,
        is_sleeping,
    }
}

pub fn snapshot(pet: PetState, last_active_timestamp: f64) -> SessionSnapshot {
    SessionSnapshot {
        pet,
        last_active_timestamp,
    }
}

/// Controller at `T0` with the given store, still backgrounded.
pub fn controller(store: MemorySnapshots) -> TestController {
    SessionController::new(
        SessionConfig::default(),
        ManualClock::new(T0),
        store,
        Scheduler::new(),
        RecordingSink::default(),
    )
}

/// Controller resumed at `T0` with no saved pet.
pub fn fresh_session() -> TestController {
    let mut ctrl = controller(MemorySnapshots::default());
    ctrl.on_foreground();
    ctrl.sink_mut().clear();
    ctrl
}

/// Let `secs` of wall time pass while the host is running: the clock
/// moves, the scheduler fires, and every firing reaches the controller.
pub fn advance<S, E>(ctrl: &mut SessionController<ManualClock, S, Scheduler, E>, secs: f64)
where
    S: SnapshotPort,
    E: EventSink,
{
    ctrl.clock().advance(secs);
    let mut fired = FiredTimers::new();
    ctrl.timer_mut().tick(secs, &mut fired);
    for handle in fired.drain() {
        ctrl.on_timer(handle);
    }
}
