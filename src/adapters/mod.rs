//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                 |
//! |----------------|--------------------|-----------------------------|
//! | `kv`           | StoragePort        | in-memory map / state dir   |
//! |                | ConfigPort         |                             |
//! | `log_sink`     | EventSink          | `log` facade                |
//! | `snapshot`     | SnapshotPort       | any StoragePort             |
//! | `time`         | ClockPort          | system clock / manual clock |
//!
//! The TimerPort implementation is the [`Scheduler`](crate::scheduler::Scheduler).

pub mod kv;
pub mod log_sink;
pub mod snapshot;
pub mod time;
