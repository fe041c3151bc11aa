//! Populating the page from a content document.
//!
//! Rendering is pure: a [`SiteContent`] and a [`Referral`] go in, a
//! [`PopulatedPage`] comes out. Every outbound link on the page passes
//! through [`Referral::apply`].

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use flagpole_core::config::{Club, SiteContent, Sponsor};
use tracing::warn;

use super::faq::Accordion;
use super::referral::Referral;

/// Clubs shown in the preview region.
pub const CLUB_PREVIEW_LIMIT: usize = 6;

/// Display format for times shown in the event's zone.
const ZONED_DISPLAY_FORMAT: &str = "%-d %b %Y, %I:%M %P %Z";

/// Display format when no event zone is known; keeps the written offset.
const OFFSET_DISPLAY_FORMAT: &str = "%-d %b %Y, %I:%M %P (%:z)";

/// Escapes text for inclusion in HTML element content or a quoted
/// attribute.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Parses an IANA zone name such as `Australia/Melbourne`.
#[must_use]
pub fn parse_zone(name: &str) -> Option<Tz> {
    name.trim().parse().ok()
}

/// The zone the document's `timezone` names, if it is a known IANA zone.
#[must_use]
pub fn event_zone(content: &SiteContent) -> Option<Tz> {
    let name = content.timezone.as_deref()?;
    let zone = parse_zone(name);
    if zone.is_none() {
        warn!(timezone = %name, "unknown event timezone, showing times in their written offset");
    }
    zone
}

/// Formats an ISO-8601 timestamp for display.
///
/// With a zone the instant is shown in that zone's local time and
/// abbreviation (`14 Dec 2025, 12:00 pm AEDT`); without one it keeps the
/// offset it was written with (`14 Dec 2025, 12:00 pm (+11:00)`). Returns
/// `None` if the timestamp does not parse.
#[must_use]
pub fn display_date(raw: &str, zone: Option<Tz>) -> Option<String> {
    let instant = DateTime::<FixedOffset>::parse_from_rfc3339(raw.trim()).ok()?;
    Some(match zone {
        Some(zone) => instant
            .with_timezone(&zone)
            .format(ZONED_DISPLAY_FORMAT)
            .to_string(),
        None => instant.format(OFFSET_DISPLAY_FORMAT).to_string(),
    })
}

// ============================================================================
// Cards
// ============================================================================

/// A participating club, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubCard {
    pub name: String,
    pub campus: String,
    pub logo: Option<String>,
    /// Referral-rewritten link, when the club has one.
    pub href: Option<String>,
}

impl ClubCard {
    #[must_use]
    pub fn new(club: &Club, referral: &Referral) -> Self {
        Self {
            name: club.name.clone(),
            campus: club.campus.clone(),
            logo: club.logo.clone(),
            href: club.url.as_deref().map(|url| referral.apply(url)),
        }
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        let name = escape_html(&self.name);
        let logo = self.logo.as_deref().map_or_else(String::new, |src| {
            format!(
                r#"<img src="{}" alt="{name} logo" loading="lazy" />"#,
                escape_html(src)
            )
        });
        let body = format!(
            concat!(
                r#"<div class="club-logo">{logo}</div>"#,
                r#"<div class="club-info"><h4>{name}</h4><p>{campus}</p></div>"#,
            ),
            logo = logo,
            name = name,
            campus = escape_html(&self.campus),
        );
        wrap_link("club-item", self.href.as_deref(), &body)
    }
}

/// A sponsor, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsorCard {
    pub name: String,
    pub logo: Option<String>,
    pub href: Option<String>,
}

impl SponsorCard {
    #[must_use]
    pub fn new(sponsor: &Sponsor, referral: &Referral) -> Self {
        Self {
            name: sponsor.name.clone(),
            logo: sponsor.logo.clone(),
            href: sponsor.url.as_deref().map(|url| referral.apply(url)),
        }
    }

    /// Shows the logo when there is one, otherwise the name.
    #[must_use]
    pub fn to_html(&self) -> String {
        let name = escape_html(&self.name);
        let body = match &self.logo {
            Some(src) => format!(
                r#"<img src="{}" alt="{name}" class="sponsor-logo">"#,
                escape_html(src)
            ),
            None => format!("<span>{name}</span>"),
        };
        wrap_link("sponsor-item", self.href.as_deref(), &body)
    }
}

fn wrap_link(class: &str, href: Option<&str>, body: &str) -> String {
    match href {
        Some(href) => format!(
            r#"<a class="{class}" href="{}" target="_blank" rel="noopener">{body}</a>"#,
            escape_html(href)
        ),
        None => format!(r#"<div class="{class}">{body}</div>"#),
    }
}

// ============================================================================
// Page
// ============================================================================

/// Targets of the page's fixed call-to-action links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CtaLinks {
    /// `#register-btn`
    pub register: Option<String>,
    /// `#hero-register`
    pub hero_register: Option<String>,
    /// `#discord-btn`
    pub discord: Option<String>,
    pub beginner_guide: Option<String>,
    pub what_is_ctf: Option<String>,
}

/// Everything the populator writes into the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulatedPage {
    pub event_name: String,
    pub tagline: String,
    /// Display form of the start time; `None` keeps the page's static text.
    pub start_display: Option<String>,
    pub end_display: Option<String>,
    /// First [`CLUB_PREVIEW_LIMIT`] clubs.
    pub clubs_preview: Vec<ClubCard>,
    pub clubs_full: Vec<ClubCard>,
    pub sponsors: Vec<SponsorCard>,
    pub faq: Accordion,
    pub links: CtaLinks,
}

impl PopulatedPage {
    /// Builds the page from `content`, rewriting every outbound link with
    /// `referral`.
    #[must_use]
    pub fn populate(content: &SiteContent, referral: &Referral) -> Self {
        let clubs_full: Vec<ClubCard> = content
            .clubs
            .iter()
            .map(|club| ClubCard::new(club, referral))
            .collect();
        let clubs_preview = clubs_full.iter().take(CLUB_PREVIEW_LIMIT).cloned().collect();

        let link = |url: &Option<String>| url.as_deref().map(|u| referral.apply(u));
        let register = link(&content.register_url);
        let zone = event_zone(content);
        let date = |raw: &Option<String>| raw.as_deref().and_then(|r| display_date(r, zone));

        Self {
            event_name: content.event_name.clone(),
            tagline: content.tagline.clone(),
            start_display: date(&content.start),
            end_display: date(&content.end),
            clubs_preview,
            clubs_full,
            sponsors: content
                .sponsors
                .iter()
                .map(|sponsor| SponsorCard::new(sponsor, referral))
                .collect(),
            faq: Accordion::new(content.faqs.clone()),
            links: CtaLinks {
                hero_register: register.clone(),
                register,
                discord: link(&content.discord_url),
                beginner_guide: link(&content.beginner_guide_url),
                what_is_ctf: link(&content.what_is_ctf_url),
            },
        }
    }

    /// Markup for each region, keyed by the element id it fills.
    #[must_use]
    pub fn regions_html(&self) -> Vec<(&'static str, String)> {
        let cards = |cards: &[ClubCard]| cards.iter().map(ClubCard::to_html).collect::<String>();
        vec![
            ("clubs-preview", cards(&self.clubs_preview)),
            ("clubs-full", cards(&self.clubs_full)),
            (
                "sponsors-grid",
                self.sponsors.iter().map(SponsorCard::to_html).collect(),
            ),
            ("faq-list", self.faq.to_html()),
        ]
    }

    /// Plain-text rendering for a terminal.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.event_name);
        if !self.tagline.is_empty() {
            let _ = writeln!(out, "{}", self.tagline);
        }
        out.push('\n');
        if let Some(start) = &self.start_display {
            let _ = writeln!(out, "Starts:  {start}");
        }
        if let Some(end) = &self.end_display {
            let _ = writeln!(out, "Ends:    {end}");
        }
        if let Some(register) = &self.links.register {
            let _ = writeln!(out, "Register: {register}");
        }
        if let Some(discord) = &self.links.discord {
            let _ = writeln!(out, "Discord:  {discord}");
        }

        let _ = writeln!(out, "\nClubs ({}):", self.clubs_full.len());
        for club in &self.clubs_full {
            let _ = writeln!(out, "  {} ({})", club.name, club.campus);
        }

        if !self.sponsors.is_empty() {
            let _ = writeln!(out, "\nSponsors:");
            for sponsor in &self.sponsors {
                let _ = writeln!(out, "  {}", sponsor.name);
            }
        }

        if !self.faq.is_empty() {
            let _ = writeln!(out, "\nFAQ:");
            for faq in self.faq.items() {
                let _ = writeln!(out, "  Q: {}\n  A: {}", faq.question, faq.answer);
            }
        }
        out
    }
}
