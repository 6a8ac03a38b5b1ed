//! Tamo virtual pet library.
//!
//! Exposes the pet model, the session controller and the host adapters for
//! integration testing and for alternative front ends.  The terminal host
//! in `main.rs` is one such front end.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod pet;
pub mod scheduler;
