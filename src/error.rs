//! Error types for `flagpole`
//!
//! Most failures on the landing page are recoverable by design (a missing
//! content document falls back to the embedded one, a bad date falls back to
//! a placeholder window) and never reach this module. What remains are the
//! failures a CLI invocation has to report: storage that cannot be read or
//! written, a registration that could not be delivered, an output file that
//! cannot be created.

use std::path::PathBuf;
use thiserror::Error;

pub use flagpole_core::error::{ConfigError, Severity, ValidationIssue};

use crate::registration::FieldName;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `flagpole` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Content document error (invalid JSON, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (storage file, calendar output)
    pub const IO_ERROR: i32 = 3;

    /// Network error (submission endpoint unreachable or rejecting)
    pub const NETWORK_ERROR: i32 = 4;

    /// Usage error (invalid arguments, form fields failing validation)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `flagpole` operations.
///
/// Aggregates the domain-specific errors and maps each to an exit code.
#[derive(Debug, Error)]
pub enum FlagpoleError {
    /// Content document loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Client-side storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Content fetch error
    #[error(transparent)]
    Content(#[from] ContentError),

    /// Registration submission error
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FlagpoleError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) => ExitCode::CONFIG_ERROR,
            Self::Content(ContentError::Parse(_)) => ExitCode::CONFIG_ERROR,
            Self::Storage(_) | Self::Io(_) | Self::Content(ContentError::Io { .. }) => {
                ExitCode::IO_ERROR
            }
            Self::Content(_) => ExitCode::NETWORK_ERROR,
            Self::Submit(SubmitError::Invalid { .. }) => ExitCode::USAGE_ERROR,
            Self::Submit(SubmitError::InProgress) => ExitCode::ERROR,
            Self::Submit(_) => ExitCode::NETWORK_ERROR,
        }
    }
}

// ============================================================================
// Storage Errors
// ============================================================================

/// Errors from the persistent key/value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written
    #[error("storage I/O error at {path}: {source}")]
    Io {
        /// Backing file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a JSON object of strings
    #[error("storage file {path} is corrupt: {message}")]
    Corrupt {
        /// Backing file path
        path: PathBuf,
        /// Parser message
        message: String,
    },
}

// ============================================================================
// Event Window Errors
// ============================================================================

/// Reasons an event window could not be built from its inputs.
///
/// Never fatal: the lifecycle substitutes a placeholder window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// A timestamp field was absent
    #[error("missing '{0}' timestamp")]
    Missing(&'static str),

    /// A timestamp field was not ISO-8601 with an offset
    #[error("'{field}' is not an ISO-8601 timestamp with offset: '{value}'")]
    Unparseable {
        /// Field name (`start` or `end`)
        field: &'static str,
        /// The rejected input
        value: String,
    },

    /// The window ends at or before it starts
    #[error("event window ends ({end}) at or before it starts ({start})")]
    Inverted {
        /// Parsed start, RFC 3339
        start: String,
        /// Parsed end, RFC 3339
        end: String,
    },
}

// ============================================================================
// Content Errors
// ============================================================================

/// Errors while retrieving the content document.
///
/// The populator never propagates these: it logs them and substitutes the
/// embedded document. They surface only through `content validate`.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Connection or transport failure
    #[error("content fetch failed: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("content fetch returned HTTP {0}")]
    HttpStatus(u16),

    /// Local content file could not be read
    #[error("content file {path}: {source}")]
    Io {
        /// Content file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Document was retrieved but is not valid
    #[error(transparent)]
    Parse(#[from] ConfigError),
}

// ============================================================================
// Submission Errors
// ============================================================================

/// Registration submission errors.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// One or more required fields failed client-side validation
    #[error("{} field(s) failed validation", fields.len())]
    Invalid {
        /// Fields carrying an error message
        fields: Vec<FieldName>,
    },

    /// A submission is already in flight
    #[error("a submission is already in progress")]
    InProgress,

    /// Connection or transport failure
    #[error("submission failed: {0}")]
    Network(String),

    /// Endpoint answered with a non-success status
    #[error("submission rejected with HTTP {0}")]
    HttpStatus(u16),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `flagpole` operations.
pub type Result<T> = std::result::Result<T, FlagpoleError>;
