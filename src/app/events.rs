//! Outbound session events.
//!
//! The [`SessionController`](super::session::SessionController) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them — log, redraw a view, record for
//! assertions.

use serde::Serialize;

use super::commands::PetCommand;
use crate::pet::{Mood, PetState};

/// Which periodic rule set is driving ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Regime {
    /// No timer running (backgrounded, game over, or not started).
    Stopped,
    /// Awake: each tick applies decay.
    Active,
    /// Asleep: each tick restores energy.
    Sleep,
}

/// Structured events emitted by the session core.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Resume protocol finished.
    Resumed(CatchUp),

    /// Snapshot written, timers stopped.
    Suspended { timestamp: f64 },

    /// The running regime switched.
    RegimeChanged { from: Regime, to: Regime },

    /// The derived mood changed after a transition.
    MoodChanged { from: Mood, to: Mood },

    /// A sleeping pet reached full energy and woke up.
    AutoWake,

    /// An active tick observed game-over; the active regime is halted.
    GameOver,

    /// The pet was replaced by a fresh one.
    Reset,

    /// A command was refused by a guard (sleeping, game over, ...).
    ActionIgnored(PetCommand),
}

/// Summary of one resume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchUp {
    /// A persisted snapshot replaced the in-memory pet.
    pub restored: bool,
    /// Seconds since the snapshot was written (0 when skipped).
    pub elapsed_secs: f64,
    /// Whole ticks applied.
    pub missed_ticks: u64,
    /// The ticks were restoration (sleep) ticks rather than decay ticks.
    pub slept: bool,
}

impl CatchUp {
    pub const NONE: CatchUp = CatchUp {
        restored: false,
        elapsed_secs: 0.0,
        missed_ticks: 0,
        slept: false,
    };
}

/// Read-only view for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetView {
    pub hunger: f64,
    pub happiness: f64,
    pub energy: f64,
    pub is_sleeping: bool,
    pub mood: Mood,
}

impl From<&PetState> for PetView {
    fn from(pet: &PetState) -> Self {
        Self {
            hunger: pet.hunger,
            happiness: pet.happiness,
            energy: pet.energy,
            is_sleeping: pet.is_sleeping,
            mood: pet.mood(),
        }
    }
}

impl PetView {
    /// One-line status text for hosts.
    pub fn status_message(&self) -> String {
        match self.mood {
            Mood::GameOver => "Your pet has passed away. Start over?".into(),
            Mood::Sleeping => format!("Zzz... energy {}%", self.energy as u32),
            Mood::Tired => "Feeling worn out. Time for a nap?".into(),
            Mood::Sad => "Feeling down. Some food or a game would help.".into(),
            Mood::Happy => "Doing great!".into(),
        }
    }
}
