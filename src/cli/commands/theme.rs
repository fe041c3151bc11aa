//! `theme` commands.

use chrono::Utc;

use crate::cli::args::ThemeSubcommand;
use crate::config::Settings;
use crate::error::FlagpoleError;
use crate::theme::ThemeManager;

use super::open_site;

/// Runs a theme subcommand and prints the resulting theme.
///
/// # Errors
///
/// Returns an error if storage cannot be opened or the preference cannot
/// be written.
pub async fn run(subcommand: ThemeSubcommand, settings: &Settings) -> Result<(), FlagpoleError> {
    let site = open_site(settings).await?;
    let mut manager = site.theme();

    match subcommand {
        ThemeSubcommand::Show => {}
        ThemeSubcommand::Toggle => {
            manager.toggle(Utc::now())?;
        }
        ThemeSubcommand::Reset => {
            manager.reset_to_system(Utc::now())?;
        }
        ThemeSubcommand::SystemChange(args) => {
            if manager.on_system_change(args.mode, Utc::now()).is_none() {
                tracing::info!(system = %args.mode, "saved theme preference kept");
            }
        }
    }

    println!("{}", describe(&manager));
    Ok(())
}

fn describe(manager: &ThemeManager) -> String {
    let preference = manager.preference();
    let origin = if preference.explicit {
        "saved preference"
    } else {
        "following system"
    };
    format!(
        "{} ({origin}) {} {}",
        preference.mode,
        preference.mode.toggle_icon(),
        preference.mode.toggle_label()
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::theme::ThemeMode;

    #[test]
    fn describes_origin_of_theme() {
        let mut manager =
            ThemeManager::new(Arc::new(MemoryStorage::new()), Some(ThemeMode::Dark), None);
        assert_eq!(
            describe(&manager),
            "dark (following system) ☀️ Switch to light theme"
        );
        manager.toggle(Utc::now()).unwrap();
        assert_eq!(
            describe(&manager),
            "light (saved preference) 🌙 Switch to dark theme"
        );
    }
}
