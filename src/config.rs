//! Session configuration parameters
//!
//! Tunable host parameters for a pet session.  Values can be overridden
//! from the key-value store (`config` key) or from the command line.
//! Pet rules themselves are fixed constants in [`crate::pet`].

use serde::{Deserialize, Serialize};

/// Encoding used for the persisted session snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// Human-readable JSON (default, good for the directory backend).
    #[default]
    Json,
    /// Compact postcard binary.
    Postcard,
}

/// Core session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    // --- Simulation ---
    /// Seconds of wall-clock time per decay / restoration tick
    pub tick_interval_secs: f64,

    // --- Host loop ---
    /// How often the terminal host polls timers and input (milliseconds)
    pub poll_interval_ms: u32,

    // --- Persistence ---
    /// Snapshot encoding
    pub snapshot_format: SnapshotFormat,
    /// Storage namespace for snapshot and config keys
    pub namespace: String,
    /// Seconds between checkpoints while running (0 disables)
    pub autosave_secs: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 3.0,
            poll_interval_ms: 100,
            snapshot_format: SnapshotFormat::Json,
            namespace: String::from("tamo"),
            autosave_secs: 10,
        }
    }
}

impl SessionConfig {
    /// Host poll interval in seconds.
    pub fn poll_interval_secs(&self) -> f64 {
        self.poll_interval_ms as f64 / 1000.0
    }
}

/// Range-check every field.  Returns the name of the first offending field.
pub fn validate_config(cfg: &SessionConfig) -> Result<(), &'static str> {
    if !(0.1..=3600.0).contains(&cfg.tick_interval_secs) {
        return Err("tick_interval_secs must be 0.1–3600.0");
    }
    if !(10..=5000).contains(&cfg.poll_interval_ms) {
        return Err("poll_interval_ms must be 10–5000");
    }
    if cfg.poll_interval_secs() >= cfg.tick_interval_secs {
        return Err("poll_interval_ms must be shorter than tick_interval_secs");
    }
    if cfg.autosave_secs > 3600 {
        return Err("autosave_secs must be 0–3600");
    }
    if cfg.namespace.is_empty() || cfg.namespace.len() > 32 {
        return Err("namespace must be 1–32 characters");
    }
    if !cfg
        .namespace
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    {
        return Err("namespace may only use ASCII letters, digits, '_' and '-'");
    }
    Ok(())
}
