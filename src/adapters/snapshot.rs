//! Snapshot persistence adapter.
//!
//! Implements [`SnapshotPort`] on top of any [`StoragePort`].  The snapshot
//! lives under `<namespace>::session`, encoded as JSON or postcard per
//! [`SnapshotFormat`].  Every failure path degrades to "no snapshot": the
//! controller never sees a storage or codec error.

use log::{info, warn};

use crate::app::ports::{SnapshotPort, StorageError, StoragePort};
use crate::app::session::SessionSnapshot;
use crate::config::SnapshotFormat;

const SNAPSHOT_KEY: &str = "session";

/// [`SnapshotPort`] backed by a key-value store.
pub struct SnapshotStore<S: StoragePort> {
    storage: S,
    namespace: String,
    format: SnapshotFormat,
}

impl<S: StoragePort> SnapshotStore<S> {
    pub fn new(storage: S, namespace: impl Into<String>, format: SnapshotFormat) -> Self {
        Self {
            storage,
            namespace: namespace.into(),
            format,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Whether a snapshot is stored (decodable or not).
    pub fn has_snapshot(&self) -> bool {
        self.storage.exists(&self.namespace, SNAPSHOT_KEY)
    }

    /// Drop the persisted snapshot so the next resume starts fresh.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.delete(&self.namespace, SNAPSHOT_KEY)
    }

    fn encode(&self, snapshot: &SessionSnapshot) -> Option<Vec<u8>> {
        let encoded = match self.format {
            SnapshotFormat::Json => serde_json::to_vec(snapshot).map_err(|e| e.to_string()),
            SnapshotFormat::Postcard => postcard::to_allocvec(snapshot).map_err(|e| e.to_string()),
        };
        encoded
            .map_err(|e| warn!("SnapshotStore: encode failed: {}", e))
            .ok()
    }

    fn decode(&self, bytes: &[u8]) -> Option<SessionSnapshot> {
        let decoded = match self.format {
            SnapshotFormat::Json => {
                serde_json::from_slice::<SessionSnapshot>(bytes).map_err(|e| e.to_string())
            }
            SnapshotFormat::Postcard => {
                postcard::from_bytes::<SessionSnapshot>(bytes).map_err(|e| e.to_string())
            }
        };
        let snapshot = decoded
            .map_err(|e| warn!("SnapshotStore: corrupt snapshot ignored: {}", e))
            .ok()?;
        if !snapshot.pet.is_valid() {
            warn!("SnapshotStore: snapshot with non-finite stats ignored");
            return None;
        }
        Some(SessionSnapshot {
            pet: snapshot.pet.sanitized(),
            last_active_timestamp: snapshot.last_active_timestamp,
        })
    }
}

impl<S: StoragePort> SnapshotPort for SnapshotStore<S> {
    fn load(&self) -> Option<SessionSnapshot> {
        match self.storage.read(&self.namespace, SNAPSHOT_KEY) {
            Ok(bytes) => self.decode(&bytes),
            Err(StorageError::NotFound) => {
                info!("SnapshotStore: no snapshot stored");
                None
            }
            Err(e) => {
                warn!("SnapshotStore: read failed: {}", e);
                None
            }
        }
    }

    fn save(&mut self, snapshot: &SessionSnapshot) {
        let Some(bytes) = self.encode(snapshot) else {
            return;
        };
        match self.storage.write(&self.namespace, SNAPSHOT_KEY, &bytes) {
            Ok(()) => info!(
                "SnapshotStore: saved {} bytes ({:?})",
                bytes.len(),
                self.format
            ),
            Err(e) => warn!("SnapshotStore: write failed: {}", e),
        }
    }
}
