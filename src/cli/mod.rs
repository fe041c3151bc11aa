//! Command-line interface
//!
//! Argument definitions and command handlers. The terminal stands in for
//! the page: each command builds the components it needs from a [`Site`]
//! and prints what the page would show.
//!
//! [`Site`]: crate::site::Site

pub mod args;
pub mod commands;
