//! Application core — session orchestration, zero direct I/O.
//!
//! This module contains the session rules for the pet: regime switching,
//! offline catch-up, and the action surface exposed to hosts.  All
//! interaction with the clock, timers and storage happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable without
//! real time passing.

pub mod commands;
pub mod events;
pub mod ports;
pub mod session;
