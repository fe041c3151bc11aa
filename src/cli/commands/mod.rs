//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod calendar;
pub mod completions;
pub mod content;
pub mod countdown;
pub mod register;
pub mod teaser;
pub mod theme;
pub mod version;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands, ContentSubcommand};
use crate::config::Settings;
use crate::error::FlagpoleError;
use crate::notify::ConsoleNotifier;
use crate::site::Site;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// `cancel` fires on Ctrl+C or SIGTERM; only long-running commands watch it.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), FlagpoleError> {
    let settings = cli.site.settings();
    match cli.command {
        Commands::Countdown(args) => countdown::run(&args, &settings, cancel).await,
        Commands::Content(cmd) => match cmd.subcommand {
            ContentSubcommand::Show(args) => content::show(&args, &settings).await,
            ContentSubcommand::Validate(args) => content::validate(&args, &settings).await,
        },
        Commands::Register(args) => register::run(&args, &settings).await,
        Commands::Teaser(cmd) => teaser::run(cmd.subcommand, &settings).await,
        Commands::Theme(cmd) => theme::run(cmd.subcommand, &settings).await,
        Commands::Calendar(args) => calendar::run(&args, &settings).await,
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Starts metrics and loads the page with a console notifier.
async fn open_site(settings: &Settings) -> Result<Site, FlagpoleError> {
    settings.init_metrics()?;
    Site::load(settings, Arc::new(ConsoleNotifier)).await
}
