//! Content document retrieval.
//!
//! The document is fetched once per page load, from a local path or an
//! http(s) URL. Any failure (unreachable, non-2xx, unreadable, malformed)
//! substitutes the embedded default document in full.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use flagpole_core::config::SiteContent;
use tracing::{debug, info, warn};

use crate::error::ContentError;
use crate::notify::{Analytics, track};
use crate::observability::{Event, metrics};

/// Where the content document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    File(PathBuf),
    Url(String),
}

impl ContentSource {
    /// `http://` and `https://` inputs are URLs; anything else is a path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Result of a load, successful or not.
#[derive(Debug, Clone)]
pub struct LoadedContent {
    pub content: Arc<SiteContent>,
    /// The requested source, as text.
    pub source: String,
    /// Why the embedded default was substituted, if it was.
    pub fallback_reason: Option<String>,
}

impl LoadedContent {
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// Creates the HTTP client used for content fetches.
///
/// No timeout is configured; transport defaults apply.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built (should never happen).
#[must_use]
pub fn create_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("flagpole/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("failed to build HTTP client")
}

/// Fetches content documents.
#[derive(Debug, Clone)]
pub struct ContentLoader {
    client: reqwest::Client,
}

impl ContentLoader {
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Retrieves and parses the document at `source`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Network` or `ContentError::HttpStatus` for
    /// remote failures, `ContentError::Io` for unreadable files and
    /// `ContentError::Parse` for malformed documents.
    pub async fn fetch(&self, source: &ContentSource) -> Result<SiteContent, ContentError> {
        let name = source.to_string();
        let text = match source {
            ContentSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| ContentError::Io {
                        path: path.clone(),
                        source: e,
                    })?
            }
            ContentSource::Url(url) => {
                debug!(url = %url, "fetching content document");
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| ContentError::Network(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(ContentError::HttpStatus(status.as_u16()));
                }

                response
                    .text()
                    .await
                    .map_err(|e| ContentError::Network(e.to_string()))?
            }
        };

        Ok(SiteContent::from_json(&name, &text)?)
    }

    /// Retrieves the document, substituting the embedded default on any
    /// failure. Never fails.
    pub async fn load(&self, source: &ContentSource, analytics: &Analytics) -> LoadedContent {
        let name = source.to_string();
        let loaded = match self.fetch(source).await {
            Ok(content) => {
                info!(source = %name, "content document loaded");
                LoadedContent {
                    content: Arc::new(content),
                    source: name,
                    fallback_reason: None,
                }
            }
            Err(e) => {
                warn!(source = %name, error = %e, "could not load content document, using defaults");
                metrics::record_content_fallback();
                LoadedContent {
                    content: Arc::new(SiteContent::embedded_default()),
                    source: name,
                    fallback_reason: Some(e.to_string()),
                }
            }
        };

        track(analytics, || Event::ContentLoaded {
            timestamp: Utc::now(),
            source: loaded.source.clone(),
            fallback: loaded.is_fallback(),
        });
        loaded
    }
}
