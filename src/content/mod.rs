//! Content populator: fetch the content document once, render it many
//! times, rewrite outbound links with the session's referral code.

pub mod faq;
pub mod loader;
pub mod referral;
pub mod render;

pub use faq::Accordion;
pub use loader::{ContentLoader, ContentSource, LoadedContent, create_http_client};
pub use referral::Referral;
pub use render::{
    CLUB_PREVIEW_LIMIT, ClubCard, CtaLinks, PopulatedPage, SponsorCard, display_date, escape_html,
    event_zone, parse_zone,
};
