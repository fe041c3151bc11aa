//! `calendar` command.

use std::path::Path;

use chrono::Utc;

use crate::calendar::write_ics;
use crate::cli::args::CalendarArgs;
use crate::config::Settings;
use crate::error::FlagpoleError;

use super::open_site;

/// Writes the event's iCalendar document to `--output`, or stdout for `-`.
///
/// # Errors
///
/// Returns `FlagpoleError::Io` if the output file cannot be written.
pub async fn run(args: &CalendarArgs, settings: &Settings) -> Result<(), FlagpoleError> {
    let site = open_site(settings).await?;
    let ics = site.calendar().to_ics(Utc::now());

    if args.output == Path::new("-") {
        print!("{ics}");
    } else {
        write_ics(&args.output, &ics)?;
        println!("{}", args.output.display());
    }
    Ok(())
}
