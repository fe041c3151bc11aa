//! `teaser` commands.

use chrono::{SecondsFormat, Utc};

use crate::cli::args::{TeaserAnswerArgs, TeaserSubcommand};
use crate::config::Settings;
use crate::error::FlagpoleError;
use crate::teaser::{Attempt, TeaserResult, TeaserWidget};

use super::open_site;

/// Runs a teaser subcommand.
///
/// # Errors
///
/// Returns an error if storage cannot be opened, or if `reset` cannot
/// remove the stored solve.
pub async fn run(subcommand: TeaserSubcommand, settings: &Settings) -> Result<(), FlagpoleError> {
    let site = open_site(settings).await?;
    let mut widget = site.teaser();

    match subcommand {
        TeaserSubcommand::Question => println!("{}", widget.challenge().question),
        TeaserSubcommand::Answer(args) => answer(&mut widget, &args).await,
        TeaserSubcommand::Status => {
            let state = widget.state();
            match (state.solved, state.solved_at) {
                (true, Some(at)) => {
                    println!("solved at {}", at.to_rfc3339_opts(SecondsFormat::Secs, true));
                }
                (true, None) => println!("solved"),
                (false, _) => println!("not solved"),
            }
        }
        TeaserSubcommand::Share => {
            let message = widget.share(site.page(), Utc::now());
            println!("{}", message.title);
            println!("{}", message.text);
            println!("{}", message.url);
        }
        TeaserSubcommand::Reset => {
            widget.reset()?;
            println!("teaser reset");
        }
    }
    Ok(())
}

async fn answer(widget: &mut TeaserWidget, args: &TeaserAnswerArgs) {
    match widget.answer(args.answer.as_str(), Utc::now()) {
        Attempt::Correct => {
            println!("Well done! You've solved the teaser challenge. Ready for the real thing?");
        }
        Attempt::Locked => {
            println!("Already solved! You've already completed this challenge.");
        }
        Attempt::Incorrect => {
            println!("Not quite right. Try again! Think about the most commonly used passwords.");
            if args.wait
                && let TeaserResult::Incorrect { clears_at } = widget.result()
            {
                let remaining = (clears_at - Utc::now()).to_std().unwrap_or_default();
                tokio::time::sleep(remaining).await;
                widget.clear_expired(Utc::now());
            }
        }
    }
}
