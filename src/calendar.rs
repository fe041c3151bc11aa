//! Calendar export.
//!
//! Produces an iCalendar (RFC 5545) document for the event window.

use std::path::Path;

use chrono::{DateTime, Utc};
use flagpole_core::config::SiteContent;
use tracing::info;

use crate::lifecycle::EventWindow;

/// Suggested file name of the exported document.
pub const DEFAULT_FILENAME: &str = "acucys-ctf-2025.ics";

pub const PRODID: &str = "-//ACUCyS//Christmas CTF 2025//EN";
pub const UID: &str = "ctf2025@acucys.org";

pub const DEFAULT_LOCATION: &str = "Online (Discord)";
pub const DEFAULT_SITE_URL: &str = "https://ctf.acucys.org";
pub const DEFAULT_DESCRIPTION: &str = "Free student-built cybersecurity competition for Australian uni students. Beginner friendly. Join solo or as a team.";

const ICS_STAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Content lines longer than this many octets are folded.
const MAX_LINE_OCTETS: usize = 75;

/// Everything a calendar entry needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: String,
    pub url: String,
}

impl CalendarEvent {
    /// Builds the entry for `window`, taking text from `content` and
    /// falling back to the defaults above for anything missing.
    #[must_use]
    pub fn new(content: &SiteContent, window: &EventWindow) -> Self {
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
        Self {
            title: non_empty(&content.event_name)
                .unwrap_or_else(|| SiteContent::embedded_default().event_name),
            description: non_empty(&content.tagline)
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            start: window.start().with_timezone(&Utc),
            end: window.end().with_timezone(&Utc),
            location: content
                .location
                .as_deref()
                .and_then(non_empty)
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            url: content
                .site_url
                .as_deref()
                .and_then(non_empty)
                .unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
        }
    }

    /// Renders the iCalendar document, stamped at `now`.
    #[must_use]
    pub fn to_ics(&self, now: DateTime<Utc>) -> String {
        let lines = [
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{PRODID}"),
            "CALSCALE:GREGORIAN".to_string(),
            "METHOD:PUBLISH".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{UID}"),
            format!("DTSTAMP:{}", ics_stamp(now)),
            format!("DTSTART:{}", ics_stamp(self.start)),
            format!("DTEND:{}", ics_stamp(self.end)),
            format!("SUMMARY:{}", escape_text(&self.title)),
            format!("DESCRIPTION:{}", escape_text(&self.description)),
            format!("LOCATION:{}", escape_text(&self.location)),
            format!("URL:{}", self.url),
            "END:VEVENT".to_string(),
            "END:VCALENDAR".to_string(),
        ];

        let mut out = String::new();
        for line in &lines {
            out.push_str(&fold_line(line));
            out.push_str("\r\n");
        }
        out
    }
}

/// Writes `ics` to `path`.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be written.
pub fn write_ics(path: &Path, ics: &str) -> std::io::Result<()> {
    std::fs::write(path, ics)?;
    info!(path = %path.display(), "calendar file written");
    Ok(())
}

fn ics_stamp(at: DateTime<Utc>) -> String {
    at.format(ICS_STAMP_FORMAT).to_string()
}

/// RFC 5545 TEXT escaping.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Folds a content line at [`MAX_LINE_OCTETS`], never splitting a UTF-8
/// sequence. Continuation lines start with a single space.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(ch);
        width += len;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> EventWindow {
        EventWindow::parse("2025-12-14T12:00:00+11:00", "2025-12-15T12:00:00+11:00").unwrap()
    }

    fn stamp() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-11-01T08:30:15Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn document_has_fixed_ids_and_utc_times() {
        let event = CalendarEvent::new(&SiteContent::embedded_default(), &window());
        let ics = event.to_ics(stamp());

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert!(ics.contains("PRODID:-//ACUCyS//Christmas CTF 2025//EN\r\n"));
        assert!(ics.contains("UID:ctf2025@acucys.org\r\n"));
        assert!(ics.contains("DTSTAMP:20251101T083015Z\r\n"));
        assert!(ics.contains("DTSTART:20251214T010000Z\r\n"));
        assert!(ics.contains("DTEND:20251215T010000Z\r\n"));
        assert!(ics.contains("SUMMARY:ACUCyS Christmas CTF 2025\r\n"));
        assert!(ics.contains("LOCATION:Online (Discord)\r\n"));
        assert!(ics.contains("URL:https://ctf.acucys.org\r\n"));
        assert!(!ics.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn content_overrides_location_and_url() {
        let mut content = SiteContent::embedded_default();
        content.location = Some("Melbourne; Room 1, Level 2".to_string());
        content.site_url = Some("https://example.org/ctf".to_string());
        let ics = CalendarEvent::new(&content, &window()).to_ics(stamp());
        assert!(ics.contains("LOCATION:Melbourne\\; Room 1\\, Level 2\r\n"));
        assert!(ics.contains("URL:https://example.org/ctf\r\n"));
    }

    #[test]
    fn escapes_text() {
        assert_eq!(escape_text("a,b;c\\d\ne"), "a\\,b\\;c\\\\d\\ne");
    }

    #[test]
    fn folds_long_lines() {
        let line = format!("DESCRIPTION:{}", "é".repeat(60));
        let folded = fold_line(&line);
        for part in folded.split("\r\n") {
            assert!(part.len() <= MAX_LINE_OCTETS, "{}", part.len());
        }
        assert_eq!(folded.replace("\r\n ", ""), line);
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_FILENAME);
        write_ics(&path, "BEGIN:VCALENDAR\r\n").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "BEGIN:VCALENDAR\r\n");
    }
}
