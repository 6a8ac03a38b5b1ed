//! Foreground session behaviour: regimes, actions, timers.
//!
//! Drives a `SessionController` with a `ManualClock`, the real `Scheduler`
//! and mock snapshot/event ports from `mock_ports`.

use crate::mock_ports::*;

use tamo::app::commands::PetCommand;
use tamo::app::events::{Regime, SessionEvent};
use tamo::app::ports::TimerPort;
use tamo::pet::{Mood, PetState};

// ── Startup ───────────────────────────────────────────────────

#[test]
fn fresh_session_starts_active_with_one_timer() {
    let ctrl = fresh_session();
    assert_eq!(*ctrl.pet(), PetState::new());
    assert_eq!(ctrl.regime(), Regime::Active);
    assert_eq!(ctrl.timer().active_count(), 1);
    assert!(ctrl.is_foreground());
}

#[test]
fn active_ticks_apply_decay() {
    let mut ctrl = fresh_session();
    advance(&mut ctrl, 9.0);
    assert_eq!(ctrl.tick_count(), 3);
    assert_eq!(*ctrl.pet(), pet(6.0, 95.5, 97.0, false));
}

#[test]
fn partial_interval_does_not_tick() {
    let mut ctrl = fresh_session();
    advance(&mut ctrl, 2.0);
    assert_eq!(ctrl.tick_count(), 0);
    advance(&mut ctrl, 1.0);
    assert_eq!(ctrl.tick_count(), 1);
    assert_eq!(ctrl.pet().hunger, 2.0);
}

// ── Actions ───────────────────────────────────────────────────

#[test]
fn feed_play_sleep_then_auto_wake() {
    let mut ctrl = fresh_session();

    ctrl.feed();
    assert_eq!(*ctrl.pet(), pet(0.0, 100.0, 100.0, false));

    ctrl.play();
    assert_eq!(*ctrl.pet(), pet(0.0, 100.0, 90.0, false));

    ctrl.sleep();
    assert!(ctrl.pet().is_sleeping);
    assert_eq!(ctrl.regime(), Regime::Sleep);
    assert_eq!(ctrl.view().mood, Mood::Sleeping);

    // 90 -> 95 -> 100; the pet wakes on the tick that fills energy.
    advance(&mut ctrl, 9.0);
    assert_eq!(*ctrl.pet(), pet(0.0, 100.0, 100.0, false));
    assert_eq!(ctrl.regime(), Regime::Active);
    assert_eq!(ctrl.sink().count(|e| *e == SessionEvent::AutoWake), 1);
    assert_eq!(ctrl.view().mood, Mood::Happy);
}

#[test]
fn sleep_swaps_the_live_timer() {
    let mut ctrl = fresh_session();
    let active = ctrl.timer_handle().unwrap();

    ctrl.sleep();
    let sleeping = ctrl.timer_handle().unwrap();

    assert_ne!(active, sleeping);
    assert!(!ctrl.timer().is_scheduled(active));
    assert!(ctrl.timer().is_scheduled(sleeping));
    assert_eq!(ctrl.timer().active_count(), 1);
    assert_eq!(
        ctrl.sink().count(|e| matches!(
            e,
            SessionEvent::RegimeChanged {
                from: Regime::Active,
                to: Regime::Sleep
            }
        )),
        1
    );
}

#[test]
fn sleep_ticks_restore_energy_and_pause_decay() {
    let mut ctrl = fresh_session();
    ctrl.play();
    ctrl.play();
    ctrl.sleep();
    advance(&mut ctrl, 6.0);
    // hunger and happiness frozen while asleep
    assert_eq!(*ctrl.pet(), pet(0.0, 100.0, 90.0, true));
}

#[test]
fn manual_wake_restarts_decay() {
    let mut ctrl = fresh_session();
    ctrl.play();
    ctrl.sleep();
    advance(&mut ctrl, 3.0);
    ctrl.wake();

    assert!(!ctrl.pet().is_sleeping);
    assert_eq!(ctrl.regime(), Regime::Active);
    assert_eq!(ctrl.timer().active_count(), 1);

    advance(&mut ctrl, 3.0);
    assert_eq!(*ctrl.pet(), pet(2.0, 98.5, 94.0, false));
}

#[test]
fn awake_actions_ignored_while_sleeping() {
    let mut ctrl = fresh_session();
    ctrl.play();
    ctrl.sleep();
    let before = *ctrl.pet();
    let handle = ctrl.timer_handle();

    ctrl.feed();
    ctrl.play();
    ctrl.sleep();

    assert_eq!(*ctrl.pet(), before);
    assert_eq!(ctrl.timer_handle(), handle);
    let ignored = ctrl
        .sink()
        .count(|e| matches!(e, SessionEvent::ActionIgnored(_)));
    assert_eq!(ignored, 3);
}

#[test]
fn wake_while_awake_is_ignored() {
    let mut ctrl = fresh_session();
    let handle = ctrl.timer_handle();
    ctrl.wake();
    assert_eq!(ctrl.timer_handle(), handle);
    assert_eq!(
        ctrl.sink().last(),
        Some(&SessionEvent::ActionIgnored(PetCommand::Wake))
    );
}

#[test]
fn handle_command_dispatches() {
    let mut ctrl = fresh_session();
    for text in ["play", "p", "sleep"] {
        ctrl.handle_command(text.parse().unwrap());
    }
    assert_eq!(*ctrl.pet(), pet(0.0, 100.0, 80.0, true));

    ctrl.handle_command(PetCommand::Wake);
    assert!(!ctrl.pet().is_sleeping);

    ctrl.handle_command(PetCommand::Background);
    assert!(!ctrl.is_foreground());
    ctrl.handle_command(PetCommand::Foreground);
    assert!(ctrl.is_foreground());
}

// ── Timers ────────────────────────────────────────────────────

#[test]
fn stale_handle_is_ignored() {
    let mut ctrl = fresh_session();
    let stale = ctrl.timer_handle().unwrap();
    ctrl.play();
    ctrl.sleep();
    let before = *ctrl.pet();

    ctrl.on_timer(stale);

    assert_eq!(*ctrl.pet(), before);
    assert_eq!(ctrl.tick_count(), 0);
}

#[test]
fn unknown_handle_is_ignored() {
    let mut ctrl = fresh_session();
    let foreign = ctrl.timer_mut().schedule_repeating(1.0);
    ctrl.on_timer(foreign);
    assert_eq!(*ctrl.pet(), PetState::new());
}

#[test]
fn at_most_one_timer_across_transitions() {
    let mut ctrl = fresh_session();
    let steps: [fn(&mut TestController); 7] = [
        TestController::sleep,
        TestController::wake,
        TestController::sleep,
        TestController::reset,
        TestController::on_background,
        |c: &mut TestController| {
            c.on_foreground();
        },
        TestController::sleep,
    ];
    for step in steps {
        step(&mut ctrl);
        assert!(ctrl.timer().active_count() <= 1);
        assert_eq!(ctrl.timer().active_count(), usize::from(ctrl.timer_handle().is_some()));
        advance(&mut ctrl, 3.0);
        assert!(ctrl.timer().active_count() <= 1);
    }
}

// ── Game over / reset ─────────────────────────────────────────

fn dying_session() -> TestController {
    let store = MemorySnapshots::with(snapshot(pet(99.0, 1.0, 1.0, false), T0));
    let mut ctrl = controller(store);
    ctrl.on_foreground();
    ctrl
}

#[test]
fn game_over_halts_active_regime() {
    let mut ctrl = dying_session();
    assert_eq!(ctrl.regime(), Regime::Active);

    advance(&mut ctrl, 3.0);
    assert_eq!(*ctrl.pet(), pet(100.0, 0.0, 0.0, false));
    assert_eq!(ctrl.view().mood, Mood::GameOver);
    assert_eq!(
        ctrl.sink().count(|e| matches!(e, SessionEvent::MoodChanged { to: Mood::GameOver, .. })),
        1
    );

    // The next tick notices and stops the timer.
    advance(&mut ctrl, 3.0);
    assert_eq!(ctrl.regime(), Regime::Stopped);
    assert_eq!(ctrl.timer().active_count(), 0);
    assert_eq!(ctrl.sink().count(|e| *e == SessionEvent::GameOver), 1);

    advance(&mut ctrl, 30.0);
    assert_eq!(*ctrl.pet(), pet(100.0, 0.0, 0.0, false));
}

#[test]
fn game_over_refuses_actions() {
    let mut ctrl = dying_session();
    advance(&mut ctrl, 6.0);
    ctrl.feed();
    ctrl.play();
    ctrl.sleep();
    assert_eq!(*ctrl.pet(), pet(100.0, 0.0, 0.0, false));
    assert_eq!(ctrl.regime(), Regime::Stopped);
}

#[test]
fn reset_revives_and_restarts_decay() {
    let mut ctrl = dying_session();
    advance(&mut ctrl, 6.0);

    ctrl.reset();
    assert_eq!(*ctrl.pet(), PetState::new());
    assert_eq!(ctrl.regime(), Regime::Active);
    assert_eq!(ctrl.timer().active_count(), 1);
    assert_eq!(ctrl.sink().count(|e| *e == SessionEvent::Reset), 1);

    advance(&mut ctrl, 3.0);
    assert_eq!(ctrl.pet().hunger, 2.0);
}

#[test]
fn reset_while_sleeping_cancels_sleep_timer() {
    let mut ctrl = fresh_session();
    ctrl.play();
    ctrl.sleep();
    let sleep_handle = ctrl.timer_handle().unwrap();

    ctrl.reset();
    assert!(!ctrl.timer().is_scheduled(sleep_handle));
    assert_eq!(ctrl.regime(), Regime::Active);
    assert!(!ctrl.pet().is_sleeping);
}

// ── Background ────────────────────────────────────────────────

#[test]
fn background_saves_and_stops() {
    let mut ctrl = fresh_session();
    advance(&mut ctrl, 3.0);
    ctrl.on_background();

    assert_eq!(ctrl.regime(), Regime::Stopped);
    assert_eq!(ctrl.timer().active_count(), 0);
    assert_eq!(ctrl.store().saves, 1);
    let saved = ctrl.store().slot.unwrap();
    assert_eq!(saved.pet, *ctrl.pet());
    assert_eq!(saved.last_active_timestamp, T0 + 3.0);
    assert_eq!(
        ctrl.sink().last(),
        Some(&SessionEvent::Suspended {
            timestamp: T0 + 3.0
        })
    );
}

#[test]
fn checkpoint_saves_without_stopping() {
    let mut ctrl = fresh_session();
    ctrl.play();
    advance(&mut ctrl, 6.0);
    let handle = ctrl.timer_handle();

    ctrl.checkpoint();

    assert_eq!(ctrl.store().saves, 1);
    let saved = ctrl.store().slot.unwrap();
    assert_eq!(saved.pet, *ctrl.pet());
    assert_eq!(saved.last_active_timestamp, T0 + 6.0);
    assert!(ctrl.is_foreground());
    assert_eq!(ctrl.timer_handle(), handle);
    assert_eq!(ctrl.regime(), Regime::Active);
}

#[test]
fn checkpoint_in_background_is_a_no_op() {
    let mut ctrl = fresh_session();
    ctrl.on_background();
    ctrl.checkpoint();
    assert_eq!(ctrl.store().saves, 1);
}

#[test]
fn repeated_background_is_a_no_op() {
    let mut ctrl = fresh_session();
    ctrl.on_background();
    ctrl.on_background();
    assert_eq!(ctrl.store().saves, 1);
}

#[test]
fn repeated_foreground_is_a_no_op() {
    let mut ctrl = fresh_session();
    let handle = ctrl.timer_handle();
    let summary = ctrl.on_foreground();
    assert!(!summary.restored);
    assert_eq!(ctrl.timer_handle(), handle);
    assert_eq!(ctrl.timer().active_count(), 1);
}

#[test]
fn actions_while_backgrounded_start_no_timer() {
    let mut ctrl = fresh_session();
    ctrl.on_background();

    ctrl.reset();
    ctrl.sleep();
    assert_eq!(ctrl.regime(), Regime::Stopped);
    assert_eq!(ctrl.timer().active_count(), 0);

    // Resuming reloads the snapshot written when the session was suspended.
    let summary = ctrl.on_foreground();
    assert!(summary.restored);
    assert_eq!(*ctrl.pet(), PetState::new());
    assert_eq!(ctrl.regime(), Regime::Active);
}
