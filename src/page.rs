//! The URL the page was opened with.
//!
//! Referral and campaign attribution are read from its query string. The
//! CLI accepts it via `--page-url`; without one every lookup is empty.

use std::sync::LazyLock;

use reqwest::Url;
use tracing::warn;

/// Query parameters consumed by the page.
pub mod params {
    pub const REFERRAL: &str = "ref";
    pub const UTM_SOURCE: &str = "utm_source";
    pub const UTM_MEDIUM: &str = "utm_medium";
    pub const UTM_CAMPAIGN: &str = "utm_campaign";
}

/// Site origin used when no page URL is known.
pub const DEFAULT_ORIGIN: &str = "https://ctf.acucys.org";

static QUERY_SCRATCH: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://localhost/").expect("valid URL"));

/// `name=value`, form-encoded for appending to a query string.
#[must_use]
pub fn query_pair(name: &str, value: &str) -> String {
    let mut scratch = QUERY_SCRATCH.clone();
    scratch.query_pairs_mut().append_pair(name, value);
    scratch.query().unwrap_or_default().to_string()
}

/// Parsed page location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLocation {
    url: Option<Url>,
}

impl PageLocation {
    /// A location with no URL (no query parameters, default origin).
    #[must_use]
    pub const fn none() -> Self {
        Self { url: None }
    }

    /// Parses `raw`; an unparseable URL is logged and treated as absent.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) => Self { url: Some(url) },
            Err(e) => {
                warn!(url = raw, error = %e, "ignoring unparseable page URL");
                Self::none()
            }
        }
    }

    /// From an optional command-line value.
    #[must_use]
    pub fn from_arg(raw: Option<&str>) -> Self {
        raw.map_or_else(Self::none, Self::parse)
    }

    /// First non-empty value of query parameter `name`, percent-decoded.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<String> {
        self.url.as_ref().and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
                .filter(|value| !value.is_empty())
        })
    }

    /// `scheme://host[:port]` of the page, or [`DEFAULT_ORIGIN`].
    #[must_use]
    pub fn origin(&self) -> String {
        self.url
            .as_ref()
            .map(Url::origin)
            .filter(|origin| origin.is_tuple())
            .map_or_else(|| DEFAULT_ORIGIN.to_string(), |o| o.ascii_serialization())
    }
}
