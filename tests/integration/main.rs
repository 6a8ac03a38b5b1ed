//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the session controller
//! against mock or in-memory adapters.  Time only moves when a test
//! advances the manual clock and the scheduler together.

mod mock_ports;
mod session_tests;
