//! Pet model — attributes, derived mood, and pure transition rules.
//!
//! Every transition is total: guards turn an invalid request into a no-op
//! instead of an error.  Nothing in here reads the clock or touches
//! storage; the [`SessionController`](crate::app::session::SessionController)
//! decides *when* a rule runs.
//!
//! ```text
//!            feed / play / apply_decay          sleep_tick
//!   ┌───────────┐  set_sleeping(true)  ┌───────────┐
//!   │   Awake   │ ───────────────────▶ │ Sleeping  │
//!   │           │ ◀─────────────────── │           │
//!   └─────┬─────┘  set_sleeping(false) └───────────┘
//!         │ hunger=100, happiness=0, energy=0
//!         ▼
//!   ┌───────────┐
//!   │ Game over │  (terminal until reset)
//!   └───────────┘
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

/// Lower bound shared by all attributes.
pub const STAT_MIN: f64 = 0.0;
/// Upper bound shared by all attributes.
pub const STAT_MAX: f64 = 100.0;

// Per-tick deltas.
const DECAY_HUNGER: f64 = 2.0;
const DECAY_HAPPINESS: f64 = 1.5;
const DECAY_ENERGY: f64 = 1.0;
const FEED_HUNGER: f64 = 20.0;
const PLAY_HAPPINESS: f64 = 15.0;
const PLAY_ENERGY: f64 = 10.0;
const SLEEP_ENERGY: f64 = 5.0;

// Mood thresholds.
const TIRED_BELOW_ENERGY: f64 = 20.0;
const SAD_BELOW_HAPPINESS: f64 = 30.0;
const SAD_ABOVE_HUNGER: f64 = 80.0;

fn clamp_stat(value: f64) -> f64 {
    value.clamp(STAT_MIN, STAT_MAX)
}

// ---------------------------------------------------------------------------
// Mood
// ---------------------------------------------------------------------------

/// Classification of the pet's current attributes.  Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mood {
    Happy,
    Sad,
    Tired,
    Sleeping,
    GameOver,
}

impl Mood {
    /// Every mood, in declaration order.
    pub const ALL: [Mood; 5] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Tired,
        Mood::Sleeping,
        Mood::GameOver,
    ];

    /// Stable machine-readable key.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Tired => "tired",
            Self::Sleeping => "sleeping",
            Self::GameOver => "gameOver",
        }
    }

    /// Short human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Sad => "Sad",
            Self::Tired => "Tired",
            Self::Sleeping => "Sleeping",
            Self::GameOver => "Game Over",
        }
    }

    /// Single glyph for text hosts.
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Happy => "^_^",
            Self::Sad => "T_T",
            Self::Tired => "-_-",
            Self::Sleeping => "z_z",
            Self::GameOver => "x_x",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// PetState
// ---------------------------------------------------------------------------

/// The simulated entity.
///
/// All three attributes stay inside `[0, 100]` after every transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetState {
    /// 0 = full, 100 = starving.
    pub hunger: f64,
    /// 0 = miserable, 100 = ecstatic.
    pub happiness: f64,
    /// 0 = exhausted, 100 = fully rested.
    pub energy: f64,
    pub is_sleeping: bool,
}

impl Default for PetState {
    fn default() -> Self {
        Self {
            hunger: STAT_MIN,
            happiness: STAT_MAX,
            energy: STAT_MAX,
            is_sleeping: false,
        }
    }
}

impl PetState {
    /// A fresh pet: fed, happy, rested, awake.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Derived ───────────────────────────────────────────────

    /// Derive the mood.  Sleeping is checked before game-over, so a
    /// sleeping pet at the terminal thresholds still reads as sleeping.
    pub fn mood(&self) -> Mood {
        if self.is_sleeping {
            return Mood::Sleeping;
        }
        if self.hunger >= STAT_MAX && self.happiness <= STAT_MIN && self.energy <= STAT_MIN {
            return Mood::GameOver;
        }
        if self.energy < TIRED_BELOW_ENERGY {
            return Mood::Tired;
        }
        if self.happiness < SAD_BELOW_HAPPINESS || self.hunger > SAD_ABOVE_HUNGER {
            return Mood::Sad;
        }
        Mood::Happy
    }

    pub fn is_game_over(&self) -> bool {
        self.mood() == Mood::GameOver
    }

    /// Energy has reached the ceiling; a sleeping pet should wake.
    pub fn is_fully_rested(&self) -> bool {
        self.energy >= STAT_MAX
    }

    /// Awake-only actions (decay, feed, play) are allowed.
    fn accepts_awake_action(&self) -> bool {
        !self.is_sleeping && !self.is_game_over()
    }

    // ── Decay ─────────────────────────────────────────────────

    /// One decay tick.  No-op while sleeping or after game-over.
    pub fn apply_decay(&mut self) {
        if !self.accepts_awake_action() {
            return;
        }
        self.hunger = clamp_stat(self.hunger + DECAY_HUNGER);
        self.happiness = clamp_stat(self.happiness - DECAY_HAPPINESS);
        self.energy = clamp_stat(self.energy - DECAY_ENERGY);
    }

    /// Apply `ticks` decay ticks in sequence, clamping after each one.
    ///
    /// Stops early once the guard would turn every remaining tick into a
    /// no-op; the resulting state is identical to the full loop.
    pub fn apply_decay_ticks(&mut self, ticks: u64) {
        for _ in 0..ticks {
            if !self.accepts_awake_action() {
                break;
            }
            self.apply_decay();
        }
    }

    // ── Actions ───────────────────────────────────────────────

    pub fn feed(&mut self) {
        if !self.accepts_awake_action() {
            return;
        }
        self.hunger = clamp_stat(self.hunger - FEED_HUNGER);
    }

    pub fn play(&mut self) {
        if !self.accepts_awake_action() {
            return;
        }
        self.happiness = clamp_stat(self.happiness + PLAY_HAPPINESS);
        self.energy = clamp_stat(self.energy - PLAY_ENERGY);
    }

    /// One restoration tick.  No-op unless sleeping.
    ///
    /// Does not clear `is_sleeping` on its own; the caller applies the
    /// auto-wake rule via [`is_fully_rested`](Self::is_fully_rested).
    pub fn sleep_tick(&mut self) {
        if !self.is_sleeping {
            return;
        }
        self.energy = clamp_stat(self.energy + SLEEP_ENERGY);
    }

    /// Put to sleep (`true`) or wake (`false`).
    ///
    /// Returns whether the flag actually changed.  Falling asleep is refused
    /// when already asleep or after game-over; waking is refused unless
    /// asleep.
    pub fn set_sleeping(&mut self, sleeping: bool) -> bool {
        if sleeping {
            if self.is_sleeping || self.is_game_over() {
                return false;
            }
        } else if !self.is_sleeping {
            return false;
        }
        self.is_sleeping = sleeping;
        true
    }

    // ── Loading ───────────────────────────────────────────────

    /// All attributes are finite numbers.
    pub fn is_valid(&self) -> bool {
        self.hunger.is_finite() && self.happiness.is_finite() && self.energy.is_finite()
    }

    /// Copy with every attribute pulled back inside `[0, 100]`.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            hunger: clamp_stat(self.hunger),
            happiness: clamp_stat(self.happiness),
            energy: clamp_stat(self.energy),
            is_sleeping: self.is_sleeping,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
