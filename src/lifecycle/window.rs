//! Event window: the configured start/end pair.

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use tracing::warn;

use flagpole_core::config::SiteContent;

use crate::error::WindowError;

/// Days between building the placeholder window and its start.
pub const PLACEHOLDER_LEAD_DAYS: i64 = 7;

/// Length of the placeholder window in hours.
pub const PLACEHOLDER_LENGTH_HOURS: i64 = 24;

/// Half-open interval `[start, end)` during which the event is live.
///
/// Always satisfies `start < end`; every constructor enforces it.
/// Timestamps keep the offset they were written with so they can be
/// displayed in the organisers' local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl EventWindow {
    /// Builds a window, rejecting `end <= start`.
    ///
    /// # Errors
    ///
    /// Returns `WindowError::Inverted` for an empty or inverted window.
    pub fn new(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Self, WindowError> {
        if end <= start {
            return Err(WindowError::Inverted {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses a window from two ISO-8601 timestamps with offsets.
    ///
    /// # Errors
    ///
    /// Returns `WindowError::Unparseable` naming the first bad field, or
    /// `WindowError::Inverted` if the parsed window is empty or inverted.
    pub fn parse(start: &str, end: &str) -> Result<Self, WindowError> {
        let start = parse_timestamp("start", start)?;
        let end = parse_timestamp("end", end)?;
        Self::new(start, end)
    }

    /// Parses the window carried by a content document.
    ///
    /// # Errors
    ///
    /// Returns `WindowError::Missing` if either field is absent, otherwise
    /// whatever [`parse`](Self::parse) returns.
    pub fn from_content(content: &SiteContent) -> Result<Self, WindowError> {
        let start = content.start.as_deref().ok_or(WindowError::Missing("start"))?;
        let end = content.end.as_deref().ok_or(WindowError::Missing("end"))?;
        Self::parse(start, end)
    }

    /// Parses the document's window, substituting the placeholder window
    /// anchored at `now` on any failure.
    #[must_use]
    pub fn from_content_or_placeholder(content: &SiteContent, now: DateTime<Utc>) -> Self {
        Self::from_content(content).unwrap_or_else(|e| {
            warn!(error = %e, "invalid event window, using placeholder dates");
            Self::placeholder(now)
        })
    }

    /// A window starting seven days after `now` and lasting 24 hours.
    #[must_use]
    pub fn placeholder(now: DateTime<Utc>) -> Self {
        let start = now.fixed_offset() + TimeDelta::days(PLACEHOLDER_LEAD_DAYS);
        Self {
            start,
            end: start + TimeDelta::hours(PLACEHOLDER_LENGTH_HOURS),
        }
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    /// Whether `now` falls inside `[start, end)`.
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now < self.end
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<FixedOffset>, WindowError> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|_| WindowError::Unparseable {
        field,
        value: value.to_string(),
    })
}
