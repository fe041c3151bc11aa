//! Event phase and the pure transition function.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::window::EventWindow;

/// The event's relation to the current time.
///
/// Variants are declared in lifecycle order so that `Ord` follows it:
/// `Upcoming < Live < Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPhase {
    /// `now < start`
    Upcoming,
    /// `start <= now < end`
    Live,
    /// `now >= end`; terminal
    Finished,
}

impl EventPhase {
    /// Derives the phase from the window alone, with no history.
    #[must_use]
    pub fn at(window: &EventWindow, now: DateTime<Utc>) -> Self {
        if now < window.start() {
            Self::Upcoming
        } else if now < window.end() {
            Self::Live
        } else {
            Self::Finished
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Live => "live",
            Self::Finished => "finished",
        }
    }

    /// Position in the lifecycle, starting at 0.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Upcoming => 0,
            Self::Live => 1,
            Self::Finished => 2,
        }
    }
}

impl std::fmt::Display for EventPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advances `phase` to what `now` implies, never moving backwards.
///
/// A clock that steps back (NTP correction, manual change) leaves the phase
/// where it was.
#[must_use]
pub fn next(phase: EventPhase, now: DateTime<Utc>, window: &EventWindow) -> EventPhase {
    phase.max(EventPhase::at(window, now))
}
