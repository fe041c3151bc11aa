//! Configuration: the content document schema, runtime settings and
//! content validation.

pub mod settings;
pub mod validation;

pub use flagpole_core::config::{Club, Faq, SiteContent, Sponsor};
pub use settings::{DEFAULT_CONTENT, DEFAULT_STORAGE, Settings};
pub use validation::{ValidationResult, validate_content};
