//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured session events to the
//! `log` facade.  A UI host would implement the same trait to redraw.

use log::{info, warn};

use crate::app::events::SessionEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`SessionEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Resumed(c) => {
                info!(
                    "RESUME | restored={} elapsed={:.1}s missed_ticks={} slept={}",
                    c.restored, c.elapsed_secs, c.missed_ticks, c.slept
                );
            }
            SessionEvent::Suspended { timestamp } => {
                info!("SUSPEND | timestamp={:.0}", timestamp);
            }
            SessionEvent::RegimeChanged { from, to } => {
                info!("REGIME | {:?} -> {:?}", from, to);
            }
            SessionEvent::MoodChanged { from, to } => {
                info!("MOOD | {} -> {}", from.key(), to.key());
            }
            SessionEvent::AutoWake => {
                info!("WAKE | fully rested");
            }
            SessionEvent::GameOver => {
                warn!("GAME OVER | active regime halted");
            }
            SessionEvent::Reset => {
                info!("RESET | fresh pet");
            }
            SessionEvent::ActionIgnored(cmd) => {
                info!("IGNORED | action={}", cmd);
            }
        }
    }
}
