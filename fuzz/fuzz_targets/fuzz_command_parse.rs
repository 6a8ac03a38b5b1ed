//! Fuzz target: `PetCommand` parsing
//!
//! Any parsed command must round-trip through its canonical name.
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use tamo::app::commands::PetCommand;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(cmd) = text.parse::<PetCommand>() {
        assert_eq!(cmd.name().parse::<PetCommand>(), Ok(cmd));
    }
});
