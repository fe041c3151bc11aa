//! Notification and analytics seams.
//!
//! Components never look collaborators up globally. A [`Notifier`] (the
//! transient-message surface) is always supplied; an [`AnalyticsSink`] is
//! optional and supplied as `Option<Arc<dyn AnalyticsSink>>`.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::observability::Event;

/// Visual category of a transient message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Transient-message surface ("toast").
pub trait Notifier: Send + Sync {
    /// Shows `message` briefly.
    fn notify(&self, message: &str, kind: ToastKind);
}

/// Optional analytics collaborator.
pub trait AnalyticsSink: Send + Sync {
    /// Records one analytics event.
    fn record(&self, event: Event);
}

/// Shared handle to an optional analytics sink.
pub type Analytics = Option<Arc<dyn AnalyticsSink>>;

/// Records `event` if an analytics sink was supplied.
pub fn track(analytics: &Analytics, event: impl FnOnce() -> Event) {
    if let Some(sink) = analytics {
        sink.record(event());
    }
}

// ============================================================================
// Implementations
// ============================================================================

/// Notifier that prints to stdout and mirrors the message into the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, kind: ToastKind) {
        match kind {
            ToastKind::Success => info!(kind = kind.as_str(), "{message}"),
            ToastKind::Error => warn!(kind = kind.as_str(), "{message}"),
        }
        println!("» {message}");
    }
}

/// Notifier that only remembers what it was asked to show.
///
/// Used by the countdown when output is handled elsewhere and by tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, ToastKind)>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages shown so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<(String, ToastKind)> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, kind: ToastKind) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((message.to_string(), kind));
    }
}
