//! Content document schema
//!
//! The landing page is populated from a single JSON document. Field names
//! follow the document's `camelCase` convention; every field is optional on
//! the wire so that a partially filled document still deserializes, and the
//! validation pass decides what is worth warning about.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Embedded fallback document, substituted whole when the remote document
/// cannot be fetched or parsed.
const DEFAULT_CONTENT_JSON: &str = include_str!("../../assets/default_content.json");

static DEFAULT_CONTENT: LazyLock<SiteContent> = LazyLock::new(|| {
    serde_json::from_str(DEFAULT_CONTENT_JSON).expect("embedded default content is valid JSON")
});

/// Top-level content document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteContent {
    /// Display name of the event.
    pub event_name: String,

    /// One-line strapline shown under the event name.
    pub tagline: String,

    /// Event start, ISO-8601 with offset (e.g. `2025-12-14T12:00:00+11:00`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    /// Event end, ISO-8601 with offset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    /// IANA zone name (e.g. `Australia/Melbourne`) start and end are
    /// displayed in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Registration call-to-action target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register_url: Option<String>,

    /// Community invite link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub beginner_guide_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub what_is_ctf_url: Option<String>,

    /// Participating clubs, in display order.
    pub clubs: Vec<Club>,

    /// Sponsors, in display order.
    pub sponsors: Vec<Sponsor>,

    /// Frequently asked questions, in display order.
    pub faqs: Vec<Faq>,

    /// Where the event takes place, used for calendar export.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Canonical public URL of the site, used for calendar export.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
}

impl SiteContent {
    /// Returns the embedded fallback document.
    ///
    /// # Panics
    ///
    /// Panics if the embedded document is not valid JSON, which is covered
    /// by this crate's tests.
    #[must_use]
    pub fn embedded_default() -> Self {
        DEFAULT_CONTENT.clone()
    }

    /// Parses a content document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` if the text is not a valid content
    /// document.
    pub fn from_json(source: &str, text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::ParseError {
            source_name: source.to_string(),
            line: Some(e.line()),
            message: e.to_string(),
        })
    }
}

/// A participating student club.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Club {
    pub name: String,
    pub campus: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// An event sponsor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sponsor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// A question/answer pair. Serialized as `{ "q": ..., "a": ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Faq {
    #[serde(rename = "q")]
    pub question: String,
    #[serde(rename = "a")]
    pub answer: String,
}
