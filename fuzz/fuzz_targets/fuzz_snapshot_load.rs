//! Fuzz target: snapshot loading and resume
//!
//! Stores arbitrary bytes as the session snapshot (first byte picks the
//! format), then resumes a session on top of it.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - A loaded pet always has every stat inside `[0, 100]`
//! - At most one timer is live after resume
//!
//! cargo fuzz run fuzz_snapshot_load

#![no_main]

use libfuzzer_sys::fuzz_target;
use tamo::adapters::kv::KvStore;
use tamo::adapters::log_sink::LogEventSink;
use tamo::adapters::snapshot::SnapshotStore;
use tamo::adapters::time::ManualClock;
use tamo::app::ports::StoragePort;
use tamo::app::session::SessionController;
use tamo::config::{SessionConfig, SnapshotFormat};
use tamo::scheduler::Scheduler;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };
    let format = if selector & 1 == 0 {
        SnapshotFormat::Json
    } else {
        SnapshotFormat::Postcard
    };

    let mut kv = KvStore::in_memory();
    if kv.write("tamo", "session", payload).is_err() {
        return;
    }

    let config = SessionConfig {
        snapshot_format: format,
        ..SessionConfig::default()
    };
    let store = SnapshotStore::new(kv, config.namespace.clone(), format);
    let mut ctrl = SessionController::new(
        config,
        ManualClock::new(1_700_000_000.0),
        store,
        Scheduler::new(),
        LogEventSink::new(),
    );
    ctrl.on_foreground();

    let pet = ctrl.pet();
    for v in [pet.hunger, pet.happiness, pet.energy] {
        assert!((0.0..=100.0).contains(&v), "stat out of range: {v}");
    }
    assert!(ctrl.timer().active_count() <= 1);
});
