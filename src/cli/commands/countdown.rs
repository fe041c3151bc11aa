//! `countdown` command
//!
//! Drives the lifecycle controller against the system clock and prints the
//! countdown panel after every tick.

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cli::args::{CountdownArgs, OutputFormat};
use crate::config::Settings;
use crate::error::FlagpoleError;
use crate::lifecycle::{
    CountdownPanel, EventPhase, PhasePresentation, StopReason, SystemClock, run_countdown,
};

use super::open_site;

/// Runs the countdown until the event finishes or `cancel` fires.
///
/// # Errors
///
/// Returns an error if storage or the event file cannot be opened.
pub async fn run(
    args: &CountdownArgs,
    settings: &Settings,
    cancel: CancellationToken,
) -> Result<(), FlagpoleError> {
    let site = open_site(settings).await?;
    if site.loaded().is_fallback() {
        info!(source = %site.loaded().source, "showing built-in content");
    }

    let mut controller = site.lifecycle(CountdownPanel::new(site.register_href()));
    let format = args.format;

    if args.once {
        let _ = controller.on_tick(Utc::now());
        println!("{}", render(controller.view(), format));
        return Ok(());
    }

    let reason = run_countdown(&mut controller, &SystemClock, cancel, |c| {
        println!("{}", render(c.view(), format));
    })
    .await;

    match reason {
        StopReason::Finished => info!("event finished, countdown stopped"),
        StopReason::Cancelled => info!("countdown interrupted"),
    }
    Ok(())
}

/// One line describing the panel.
fn render(panel: &CountdownPanel, format: OutputFormat) -> String {
    let phase = panel.applied.last().copied();
    let indicator = phase.and_then(|p| PhasePresentation::for_phase(p).indicator_text);

    match format {
        OutputFormat::Human => match indicator {
            Some(indicator) => format!(
                "{} {indicator} | {}: {}",
                panel.label, panel.primary_cta, panel.primary_href
            ),
            None => {
                let [d, h, m, s] = &panel.fields;
                format!("{} {d}d {h}h {m}m {s}s", panel.label)
            }
        },
        OutputFormat::Json => serde_json::json!({
            "phase": phase.map_or("upcoming", EventPhase::as_str),
            "label": panel.label,
            "days": panel.fields[0],
            "hours": panel.fields[1],
            "minutes": panel.fields[2],
            "seconds": panel.fields[3],
            "indicator": indicator,
            "primary_cta": panel.primary_cta,
            "primary_href": panel.primary_href,
        })
        .to_string(),
    }
}
