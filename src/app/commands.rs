//! Inbound commands to the session controller.
//!
//! These represent actions requested by the outside world (terminal input,
//! a UI button, host lifecycle notifications) that the
//! [`SessionController`](super::session::SessionController) interprets.

use core::fmt;
use core::str::FromStr;

/// Commands that host adapters can send into the session core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetCommand {
    Feed,
    Play,
    Sleep,
    Wake,
    /// Replace the pet with a fresh one.
    Reset,
    /// Host came to the foreground; run the resume protocol.
    Foreground,
    /// Host is going to the background; persist and stop timers.
    Background,
}

impl PetCommand {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Play => "play",
            Self::Sleep => "sleep",
            Self::Wake => "wake",
            Self::Reset => "reset",
            Self::Foreground => "fg",
            Self::Background => "bg",
        }
    }
}

impl fmt::Display for PetCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognised command text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command '{}'", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

impl FromStr for PetCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "feed" | "f" => Ok(Self::Feed),
            "play" | "p" => Ok(Self::Play),
            "sleep" | "s" => Ok(Self::Sleep),
            "wake" | "w" => Ok(Self::Wake),
            "reset" | "restart" => Ok(Self::Reset),
            "fg" | "foreground" => Ok(Self::Foreground),
            "bg" | "background" => Ok(Self::Background),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}
