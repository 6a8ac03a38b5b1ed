//! Key-value store adapter.
//!
//! Implements both [`StoragePort`] and [`ConfigPort`].
//!
//! Two backends:
//!
//! - **Memory** — a `HashMap` keyed by `namespace::key`; nothing outlives
//!   the process (tests, `--ephemeral`).
//! - **Directory** — one file per `namespace.key` under a state directory.
//!   Writes go to a temporary file first and are renamed into place, so a
//!   crash mid-write leaves the previous value intact.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::{SessionConfig, validate_config};

const CONFIG_NAMESPACE: &str = "tamo";
const CONFIG_KEY: &str = "config";
const MAX_NAME_LEN: usize = 32;

enum Backend {
    Memory(HashMap<String, Vec<u8>>),
    Directory(PathBuf),
}

/// Namespaced byte store.
pub struct KvStore {
    backend: Backend,
}

impl Default for KvStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl KvStore {
    /// Volatile store.
    pub fn in_memory() -> Self {
        info!("KvStore: memory backend");
        Self {
            backend: Backend::Memory(HashMap::new()),
        }
    }

    /// Store rooted at `dir`, created if missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            warn!("KvStore: cannot create {}: {}", dir.display(), e);
            StorageError::IoError
        })?;
        info!("KvStore: directory backend at {}", dir.display());
        Ok(Self {
            backend: Backend::Directory(dir),
        })
    }

    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    fn check_name(name: &str) -> Result<(), StorageError> {
        let ok = !name.is_empty()
            && name.len() <= MAX_NAME_LEN
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if ok { Ok(()) } else { Err(StorageError::InvalidKey) }
    }

    fn checked(namespace: &str, key: &str) -> Result<(), StorageError> {
        Self::check_name(namespace)?;
        Self::check_name(key)
    }

    fn file_path(dir: &Path, namespace: &str, key: &str) -> PathBuf {
        dir.join(format!("{}.{}", namespace, key))
    }
}

fn io_error(op: &str, path: &Path, e: &std::io::Error) -> StorageError {
    warn!("KvStore: {} {} failed: {}", op, path.display(), e);
    StorageError::IoError
}

impl StoragePort for KvStore {
    fn read(&self, namespace: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        Self::checked(namespace, key)?;
        match &self.backend {
            Backend::Memory(map) => map
                .get(&Self::composite_key(namespace, key))
                .cloned()
                .ok_or(StorageError::NotFound),
            Backend::Directory(dir) => {
                let path = Self::file_path(dir, namespace, key);
                match fs::read(&path) {
                    Ok(bytes) => Ok(bytes),
                    Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound),
                    Err(e) => Err(io_error("read", &path, &e)),
                }
            }
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        Self::checked(namespace, key)?;
        match &mut self.backend {
            Backend::Memory(map) => {
                map.insert(Self::composite_key(namespace, key), data.to_vec());
                Ok(())
            }
            Backend::Directory(dir) => {
                let path = Self::file_path(dir, namespace, key);
                let tmp = dir.join(format!("{}.{}.tmp", namespace, key));
                fs::write(&tmp, data).map_err(|e| io_error("write", &tmp, &e))?;
                fs::rename(&tmp, &path).map_err(|e| io_error("rename", &path, &e))
            }
        }
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        Self::checked(namespace, key)?;
        match &mut self.backend {
            Backend::Memory(map) => {
                map.remove(&Self::composite_key(namespace, key));
                Ok(())
            }
            Backend::Directory(dir) => {
                let path = Self::file_path(dir, namespace, key);
                match fs::remove_file(&path) {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                    Err(e) => Err(io_error("delete", &path, &e)),
                }
            }
        }
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        if Self::checked(namespace, key).is_err() {
            return false;
        }
        match &self.backend {
            Backend::Memory(map) => map.contains_key(&Self::composite_key(namespace, key)),
            Backend::Directory(dir) => Self::file_path(dir, namespace, key).is_file(),
        }
    }
}

impl ConfigPort for KvStore {
    fn load_config(&self) -> Result<SessionConfig, ConfigError> {
        match self.read(CONFIG_NAMESPACE, CONFIG_KEY) {
            Ok(bytes) => {
                let cfg: SessionConfig =
                    serde_json::from_slice(&bytes).map_err(|_| ConfigError::Corrupted)?;
                validate_config(&cfg).map_err(ConfigError::ValidationFailed)?;
                info!("KvStore: loaded config from store");
                Ok(cfg)
            }
            Err(StorageError::NotFound) => {
                info!("KvStore: no stored config, using defaults");
                Ok(SessionConfig::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save_config(&mut self, config: &SessionConfig) -> Result<(), ConfigError> {
        validate_config(config).map_err(ConfigError::ValidationFailed)?;
        let bytes = serde_json::to_vec_pretty(config).map_err(|_| ConfigError::Corrupted)?;
        self.write(CONFIG_NAMESPACE, CONFIG_KEY, &bytes)?;
        info!("KvStore: config saved");
        Ok(())
    }
}
