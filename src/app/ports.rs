//! Port traits — the hexagonal boundary between the pet session and its host.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SessionController (domain)
//! ```
//!
//! Driven adapters (clock, timer, snapshot store, event sink) implement
//! these traits.  The [`SessionController`](super::session::SessionController)
//! owns one of each, injected at construction, so the domain core never
//! reaches for ambient time, timers, or storage.
//!
//! ## Persistence notes
//!
//! - **SnapshotPort** failures never surface to the domain: a missing or
//!   undecodable snapshot is reported as `None`.
//! - **ConfigPort** implementations MUST validate before persisting.
//! - **StoragePort** writes MUST be atomic per key.

use crate::app::events::SessionEvent;
use crate::app::session::SessionSnapshot;
use crate::config::SessionConfig;

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: host wall clock → domain)
// ───────────────────────────────────────────────────────────────

/// Wall-clock source, replaceable in tests.
pub trait ClockPort {
    /// Seconds since the Unix epoch.
    fn now_secs(&self) -> f64;
}

// ───────────────────────────────────────────────────────────────
// Snapshot port (driven adapter: domain ↔ persisted session)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the session snapshot.
pub trait SnapshotPort {
    /// Read the last persisted snapshot.  Absence and decode failure both
    /// yield `None`.
    fn load(&self) -> Option<SessionSnapshot>;

    /// Persist a snapshot.  Best effort; failures are the adapter's to log.
    fn save(&mut self, snapshot: &SessionSnapshot);
}

// ───────────────────────────────────────────────────────────────
// Timer port (driven adapter: host periodic timer ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Opaque cancel handle for a repeating timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u32);

/// Repeating timer primitive.
///
/// The host reports each firing back to the controller with the handle it
/// was given here; see
/// [`SessionController::on_timer`](super::session::SessionController::on_timer).
pub trait TimerPort {
    /// Start a timer that fires every `interval_secs`.
    fn schedule_repeating(&mut self, interval_secs: f64) -> TimerHandle;

    /// Stop a timer.  Cancelling an unknown or already-cancelled handle is
    /// a no-op.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Callback trait the host [`Scheduler`](crate::scheduler::Scheduler)
/// invokes when a timer fires.
///
/// This decouples the scheduler from the controller: the host loop
/// collects fired handles and forwards them to
/// [`SessionController::on_timer`](super::session::SessionController::on_timer).
pub trait SchedulerDelegate {
    fn on_timer_fired(&mut self, handle: TimerHandle);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / UI)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`SessionEvent`]s through this port.
/// Adapters decide where they go (log, terminal, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &SessionEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: host ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists session configuration.
///
/// Invalid values are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration.
    /// Returns [`SessionConfig::default()`] if no stored config exists.
    fn load_config(&self) -> Result<SessionConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save_config(&mut self, config: &SessionConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: host ↔ key-value store)
// ───────────────────────────────────────────────────────────────

/// Namespaced key-value byte storage backing snapshots and config.
pub trait StoragePort {
    /// Read a value in full.
    fn read(&self, namespace: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed to deserialize.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Underlying storage failed.
    Storage(StorageError),
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Namespace or key contains characters the backend cannot store.
    InvalidKey,
    /// Generic I/O error.
    IoError,
}

impl From<StorageError> for ConfigError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::Storage(e) => write!(f, "storage: {}", e),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::InvalidKey => write!(f, "invalid namespace or key"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for StorageError {}
