//! `flagpole` - event landing page engine
//!
//! Headless models of the client-side components of a competition landing
//! page (event countdown, content population, registration form, teaser
//! challenge, theme switch and calendar export), plus the CLI that drives
//! them from a terminal.

pub mod calendar;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod observability;
pub mod page;
pub mod registration;
pub mod site;
pub mod storage;
pub mod teaser;
pub mod theme;
