//! Structured event stream.
//!
//! Discrete, typed events emitted as the page components change state.
//! Events are serialized as newline-delimited JSON (JSONL) and include a
//! monotonically increasing sequence number for ordering. The emitter is
//! also the concrete [`AnalyticsSink`] handed to components that want one.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::lifecycle::EventPhase;
use crate::notify::AnalyticsSink;
use crate::theme::ThemeMode;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during operation.
///
/// Each variant is tagged with `"type"` when serialized to JSON so consumers
/// can dispatch on the event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The content document was loaded (or replaced by the embedded one).
    ContentLoaded {
        timestamp: DateTime<Utc>,
        /// Path or URL that was requested.
        source: String,
        /// Whether the embedded document was substituted.
        fallback: bool,
    },

    /// The event lifecycle entered a new phase.
    PhaseEntered {
        timestamp: DateTime<Utc>,
        phase: EventPhase,
    },

    /// A teaser answer was submitted.
    TeaserAttempted {
        timestamp: DateTime<Utc>,
        correct: bool,
    },

    /// The teaser was solved for the first time on this profile.
    TeaserSolved { timestamp: DateTime<Utc> },

    /// The solved teaser was shared.
    TeaserShared { timestamp: DateTime<Utc> },

    /// A registration passed validation and is being sent.
    RegistrationSubmitted {
        timestamp: DateTime<Utc>,
        university: String,
        study_level: String,
        team_status: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        referral: Option<String>,
    },

    /// The registration endpoint accepted the submission.
    RegistrationSucceeded { timestamp: DateTime<Utc> },

    /// The registration could not be delivered.
    RegistrationFailed {
        timestamp: DateTime<Utc>,
        reason: String,
    },

    /// The displayed theme changed.
    ThemeChanged {
        timestamp: DateTime<Utc>,
        theme: ThemeMode,
        /// Whether the change came from an explicit user toggle.
        explicit: bool,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    /// Zero-based, monotonically increasing sequence counter.
    sequence: u64,
    /// The wrapped event (flattened into the same JSON object).
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) atomically increments the sequence
/// counter, serializes the event as a single JSON line, and flushes the
/// underlying writer. Serialization or I/O failures are silently dropped
/// because event output must never break the page components.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug; provide a manual impl.
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to a file at `path`, appending.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or opened.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

impl AnalyticsSink for EventEmitter {
    fn record(&self, event: Event) {
        self.emit(event);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
