//! Shared content schema and error types for `flagpole`.
//!
//! This crate holds the content document consumed by the landing page and
//! the configuration error types shared by the `flagpole` library and CLI.

pub mod config;
pub mod error;

/// Version of the content schema crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
