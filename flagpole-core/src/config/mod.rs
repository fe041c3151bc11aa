//! Content document schema.

pub mod schema;

pub use schema::{Club, Faq, SiteContent, Sponsor};
