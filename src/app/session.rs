//! Session controller — the hexagonal core.
//!
//! [`SessionController`] owns the pet, the single live timer handle, and
//! the persisted snapshot.  All I/O flows through port traits injected at
//! construction, making the whole resume / catch-up protocol testable with
//! a manual clock and an in-memory store.
//!
//! ```text
//!  ClockPort    ──▶ ┌────────────────────────┐ ──▶ EventSink
//!  SnapshotPort ◀──▶│   SessionController     │
//!  TimerPort    ◀── │  PetState · Regime      │
//!                   └────────────────────────┘
//! ```
//!
//! Exactly one regime drives ticks at a time:
//!
//! | Regime    | Runs while            | Each tick                       |
//! |-----------|-----------------------|---------------------------------|
//! | `Active`  | awake, not game over  | `apply_decay()`                 |
//! | `Sleep`   | sleeping              | `sleep_tick()`, then auto-wake  |
//! | `Stopped` | backgrounded / dead   | —                               |

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::pet::{Mood, PetState};

use super::commands::PetCommand;
use super::events::{CatchUp, PetView, Regime, SessionEvent};
use super::ports::{ClockPort, EventSink, SnapshotPort, TimerHandle, TimerPort};

// ───────────────────────────────────────────────────────────────
// Snapshot
// ───────────────────────────────────────────────────────────────

/// What survives between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub pet: PetState,
    /// Epoch seconds of the write.  `<= 0` means "no timestamp".
    pub last_active_timestamp: f64,
}

/// Whole ticks contained in `elapsed_secs`.
///
/// The fractional remainder is dropped.  Negative, zero or NaN
/// elapsed time yields zero.
pub fn missed_ticks(elapsed_secs: f64, tick_interval_secs: f64) -> u64 {
    let usable = |x: f64| !x.is_nan() && x > 0.0;
    if !usable(elapsed_secs) || !usable(tick_interval_secs) {
        return 0;
    }
    // `as` saturates, so absurd gaps become u64::MAX rather than wrapping.
    (elapsed_secs / tick_interval_secs).floor() as u64
}

// ───────────────────────────────────────────────────────────────
// SessionController
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunningTimer {
    regime: Regime,
    handle: TimerHandle,
}

/// Orchestrates the pet across timer ticks, user actions and host
/// foreground/background transitions.
pub struct SessionController<C, S, T, E>
where
    C: ClockPort,
    S: SnapshotPort,
    T: TimerPort,
    E: EventSink,
{
    config: SessionConfig,
    pet: PetState,
    clock: C,
    store: S,
    timer: T,
    sink: E,
    /// At most one live handle across both regimes.
    running: Option<RunningTimer>,
    foreground: bool,
    tick_count: u64,
}

impl<C, S, T, E> SessionController<C, S, T, E>
where
    C: ClockPort,
    S: SnapshotPort,
    T: TimerPort,
    E: EventSink,
{
    /// Construct the controller with a fresh pet.
    ///
    /// Starts backgrounded with no timer; call
    /// [`on_foreground`](Self::on_foreground) next.
    pub fn new(config: SessionConfig, clock: C, store: S, timer: T, sink: E) -> Self {
        Self {
            config,
            pet: PetState::new(),
            clock,
            store,
            timer,
            sink,
            running: None,
            foreground: false,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Resume: load the snapshot, fast-forward the time spent away, then
    /// start the regime matching the resulting state.
    pub fn on_foreground(&mut self) -> CatchUp {
        if self.foreground {
            debug!("Session: already in foreground, resume skipped");
            return CatchUp::NONE;
        }
        self.foreground = true;

        let before = self.pet.mood();
        let catch_up = self.catch_up();
        self.report_mood_change(before);

        self.switch_regime(self.regime_for_state());
        info!(
            "Session: resumed (restored={}, elapsed={:.1}s, missed_ticks={}, slept={}) mood={}",
            catch_up.restored,
            catch_up.elapsed_secs,
            catch_up.missed_ticks,
            catch_up.slept,
            self.pet.mood()
        );
        self.sink.emit(&SessionEvent::Resumed(catch_up));
        catch_up
    }

    /// Suspend: persist `{pet, now}`, then stop whichever timer is running.
    pub fn on_background(&mut self) {
        if !self.foreground {
            debug!("Session: already in background, suspend skipped");
            return;
        }
        let timestamp = self.persist();
        self.switch_regime(Regime::Stopped);
        self.foreground = false;
        info!("Session: suspended at {:.0}", timestamp);
        self.sink.emit(&SessionEvent::Suspended { timestamp });
    }

    /// Persist `{pet, now}` without leaving the foreground, so a host that
    /// dies before suspending resumes from here.  No-op while backgrounded.
    pub fn checkpoint(&mut self) {
        if !self.foreground {
            debug!("Session: checkpoint skipped in background");
            return;
        }
        let timestamp = self.persist();
        debug!("Session: checkpoint at {:.0}", timestamp);
    }

    // ── Timer dispatch ────────────────────────────────────────

    /// A repeating timer fired.  Handles other than the live one are stale
    /// (cancelled earlier) and ignored.
    pub fn on_timer(&mut self, handle: TimerHandle) {
        let Some(running) = self.running else {
            debug!("Session: timer {:?} fired with no regime running", handle);
            return;
        };
        if running.handle != handle {
            debug!("Session: stale timer {:?} ignored", handle);
            return;
        }
        self.tick_count += 1;
        match running.regime {
            Regime::Active => self.active_tick(),
            Regime::Sleep => self.sleep_regime_tick(),
            Regime::Stopped => {}
        }
    }

    fn active_tick(&mut self) {
        if self.pet.is_game_over() {
            warn!("Session: game over, halting active regime");
            self.switch_regime(Regime::Stopped);
            self.sink.emit(&SessionEvent::GameOver);
            return;
        }
        self.mutate(PetState::apply_decay);
    }

    fn sleep_regime_tick(&mut self) {
        self.mutate(PetState::sleep_tick);
        if self.pet.is_sleeping && self.pet.is_fully_rested() {
            info!("Session: fully rested, waking up");
            self.mutate(|p| {
                p.set_sleeping(false);
            });
            self.sink.emit(&SessionEvent::AutoWake);
            self.switch_regime(Regime::Active);
        }
    }

    // ── User actions ──────────────────────────────────────────

    /// Process a host command.
    pub fn handle_command(&mut self, cmd: PetCommand) {
        match cmd {
            PetCommand::Feed => self.feed(),
            PetCommand::Play => self.play(),
            PetCommand::Sleep => self.sleep(),
            PetCommand::Wake => self.wake(),
            PetCommand::Reset => self.reset(),
            PetCommand::Foreground => {
                self.on_foreground();
            }
            PetCommand::Background => self.on_background(),
        }
    }

    pub fn feed(&mut self) {
        if self.refuse_awake_action(PetCommand::Feed) {
            return;
        }
        self.mutate(PetState::feed);
    }

    pub fn play(&mut self) {
        if self.refuse_awake_action(PetCommand::Play) {
            return;
        }
        self.mutate(PetState::play);
    }

    /// Put the pet to sleep and swap the active regime for the sleep one.
    pub fn sleep(&mut self) {
        if self.refuse_awake_action(PetCommand::Sleep) {
            return;
        }
        self.mutate(|p| {
            p.set_sleeping(true);
        });
        self.switch_regime(Regime::Sleep);
    }

    /// Wake the pet and swap the sleep regime for the active one.
    pub fn wake(&mut self) {
        if !self.pet.is_sleeping {
            self.sink.emit(&SessionEvent::ActionIgnored(PetCommand::Wake));
            return;
        }
        self.mutate(|p| {
            p.set_sleeping(false);
        });
        self.switch_regime(Regime::Active);
    }

    /// Stop everything, replace the pet with a fresh one, restart decay.
    pub fn reset(&mut self) {
        self.switch_regime(Regime::Stopped);
        self.mutate(|p| *p = PetState::new());
        info!("Session: pet reset");
        self.sink.emit(&SessionEvent::Reset);
        self.switch_regime(Regime::Active);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Read-only snapshot for rendering.
    pub fn view(&self) -> PetView {
        PetView::from(&self.pet)
    }

    pub fn pet(&self) -> &PetState {
        &self.pet
    }

    /// Regime currently driving ticks.
    pub fn regime(&self) -> Regime {
        self.running.map_or(Regime::Stopped, |r| r.regime)
    }

    /// The live timer handle, if any.
    pub fn timer_handle(&self) -> Option<TimerHandle> {
        self.running.map(|r| r.handle)
    }

    pub fn is_foreground(&self) -> bool {
        self.foreground
    }

    /// Timer ticks handled since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Mutable timer access for hosts that drive the timer themselves.
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut E {
        &mut self.sink
    }

    // ── Internal ──────────────────────────────────────────────

    /// Steps 1–5 of the resume protocol.
    fn catch_up(&mut self) -> CatchUp {
        let mut summary = CatchUp::NONE;

        let Some(snapshot) = self.store.load() else {
            info!("Session: no snapshot, keeping current pet");
            return summary;
        };
        self.pet = snapshot.pet;
        summary.restored = true;

        let stamp = snapshot.last_active_timestamp;
        if stamp.is_nan() || stamp <= 0.0 {
            info!("Session: snapshot has no timestamp, catch-up skipped");
            return summary;
        }

        let elapsed = self.clock.now_secs() - snapshot.last_active_timestamp;
        if elapsed.is_nan() || elapsed < 0.0 {
            warn!(
                "Session: clock went backwards by {:.1}s, catch-up skipped",
                -elapsed
            );
            return summary;
        }
        summary.elapsed_secs = elapsed;

        let missed = missed_ticks(elapsed, self.config.tick_interval_secs);
        if missed == 0 {
            return summary;
        }
        summary.missed_ticks = missed;

        if self.pet.is_sleeping {
            summary.slept = true;
            for _ in 0..missed {
                if self.pet.is_fully_rested() {
                    break;
                }
                self.pet.sleep_tick();
            }
            if self.pet.is_fully_rested() {
                self.pet.set_sleeping(false);
                self.sink.emit(&SessionEvent::AutoWake);
            }
        } else {
            self.pet.apply_decay_ticks(missed);
        }
        summary
    }

    fn persist(&mut self) -> f64 {
        let timestamp = self.clock.now_secs();
        self.store.save(&SessionSnapshot {
            pet: self.pet,
            last_active_timestamp: timestamp,
        });
        timestamp
    }

    fn regime_for_state(&self) -> Regime {
        if self.pet.is_sleeping {
            Regime::Sleep
        } else if self.pet.is_game_over() {
            Regime::Stopped
        } else {
            Regime::Active
        }
    }

    /// Cancel the live timer (if any), then start `to`.  While backgrounded
    /// nothing is started.
    fn switch_regime(&mut self, to: Regime) {
        let from = self.regime();
        if let Some(running) = self.running.take() {
            self.timer.cancel(running.handle);
        }

        let to = if self.foreground { to } else { Regime::Stopped };
        if to != Regime::Stopped {
            let handle = self.timer.schedule_repeating(self.config.tick_interval_secs);
            self.running = Some(RunningTimer { regime: to, handle });
        }

        if from != to {
            debug!("Session: regime {:?} -> {:?}", from, to);
            self.sink.emit(&SessionEvent::RegimeChanged { from, to });
        }
    }

    /// Guard shared by feed, play and sleep.  Emits `ActionIgnored` and
    /// returns `true` when the action must not run.
    fn refuse_awake_action(&mut self, cmd: PetCommand) -> bool {
        if self.pet.is_sleeping || self.pet.is_game_over() {
            debug!("Session: '{}' ignored in mood {}", cmd, self.pet.mood());
            self.sink.emit(&SessionEvent::ActionIgnored(cmd));
            return true;
        }
        false
    }

    /// Apply a transition and report any resulting mood change.
    fn mutate(&mut self, f: impl FnOnce(&mut PetState)) {
        let before = self.pet.mood();
        f(&mut self.pet);
        self.report_mood_change(before);
    }

    fn report_mood_change(&mut self, before: Mood) {
        let after = self.pet.mood();
        if before != after {
            self.sink
                .emit(&SessionEvent::MoodChanged { from: before, to: after });
        }
    }
}
