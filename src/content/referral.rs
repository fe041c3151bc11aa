//! Referral attribution.
//!
//! A referral code arrives as `?ref=<code>` on the page URL and is
//! remembered in storage so that later visits without the parameter still
//! attribute sign-ups. Every outbound link is rewritten to carry it.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::page::{PageLocation, params, query_pair};
use crate::storage::{Storage, keys};

/// The referral code in effect for this session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Referral {
    code: Option<String>,
}

impl Referral {
    /// No referral.
    #[must_use]
    pub const fn none() -> Self {
        Self { code: None }
    }

    /// A fixed referral code.
    #[must_use]
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
        }
    }

    /// Resolves the session's referral.
    ///
    /// The page URL wins and is written back to storage; otherwise the
    /// stored code (if any) is used. A failed write is logged and the code
    /// still applies to this session.
    pub fn resolve(page: &PageLocation, storage: &Arc<dyn Storage>) -> Self {
        if let Some(code) = page.param(params::REFERRAL) {
            if let Err(e) = storage.set(keys::REFERRAL, &code) {
                warn!(error = %e, "could not persist referral code");
            }
            debug!(code = %code, "referral taken from page URL");
            return Self { code: Some(code) };
        }

        let code = storage.get(keys::REFERRAL).filter(|c| !c.is_empty());
        if let Some(code) = &code {
            debug!(code = %code, "referral restored from storage");
        }
        Self { code }
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Appends `ref=<code>` to `url`, with the code form-encoded.
    ///
    /// Uses `&` when the URL already has a query string and `?` otherwise.
    /// A `#fragment` stays at the end. Without a code the URL is returned
    /// unchanged.
    #[must_use]
    pub fn apply(&self, url: &str) -> String {
        let Some(code) = &self.code else {
            return url.to_string();
        };

        let (base, fragment) = url
            .split_once('#')
            .map_or((url, None), |(base, fragment)| (base, Some(fragment)));
        let separator = if base.contains('?') { '&' } else { '?' };

        let mut out = format!("{base}{separator}{}", query_pair(params::REFERRAL, code));
        if let Some(fragment) = fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }
}
