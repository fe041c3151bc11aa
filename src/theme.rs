//! Light/dark theme selection.
//!
//! The initial theme comes from, in order: an explicit stored preference,
//! the OS preference signal, and finally [`FALLBACK_THEME`]. Only a manual
//! toggle stores a preference; once stored, OS changes are ignored until
//! the preference is removed again.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::notify::{Analytics, track};
use crate::observability::Event;
use crate::storage::{Storage, keys};

/// Theme used when there is neither a stored preference nor an OS signal.
pub const FALLBACK_THEME: ThemeMode = ThemeMode::Light;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Class put on the document root.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Light => "light-theme",
            Self::Dark => "dark-theme",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub const fn from_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    /// Parses a stored value. Accepts both `dark` and the class form
    /// `dark-theme`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" | "light-theme" => Some(Self::Light),
            "dark" | "dark-theme" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Icon on the toggle control: a moon offers dark, a sun offers light.
    #[must_use]
    pub const fn toggle_icon(self) -> &'static str {
        match self {
            Self::Light => "🌙",
            Self::Dark => "☀️",
        }
    }

    /// Accessible label of the toggle control.
    #[must_use]
    pub fn toggle_label(self) -> String {
        format!("Switch to {} theme", self.toggled())
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The displayed theme and whether the user chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreference {
    pub mode: ThemeMode,
    /// `false` means the theme tracks the OS.
    pub explicit: bool,
}

/// Resolves, switches and persists the theme.
pub struct ThemeManager {
    storage: Arc<dyn Storage>,
    analytics: Analytics,
    system: Option<ThemeMode>,
    preference: ThemePreference,
}

impl ThemeManager {
    /// Resolves the initial theme. `system` is the OS preference signal,
    /// if one is available.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, system: Option<ThemeMode>, analytics: Analytics) -> Self {
        let preference = match stored_preference(storage.as_ref()) {
            Some(mode) => ThemePreference {
                mode,
                explicit: true,
            },
            None => ThemePreference {
                mode: system.unwrap_or(FALLBACK_THEME),
                explicit: false,
            },
        };
        debug!(theme = %preference.mode, explicit = preference.explicit, "theme resolved");

        Self {
            storage,
            analytics,
            system,
            preference,
        }
    }

    #[must_use]
    pub const fn preference(&self) -> ThemePreference {
        self.preference
    }

    #[must_use]
    pub const fn current(&self) -> ThemeMode {
        self.preference.mode
    }

    /// Switches to the other theme and stores it as an explicit choice.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the preference cannot be stored; the
    /// displayed theme still changes and stays explicit for this session.
    pub fn toggle(&mut self, now: DateTime<Utc>) -> Result<ThemeMode, StorageError> {
        let mode = self.current().toggled();
        self.apply(
            ThemePreference {
                mode,
                explicit: true,
            },
            now,
        );
        self.storage.set(keys::THEME, mode.as_str())?;
        Ok(mode)
    }

    /// The OS preference changed. Followed only while the theme is not an
    /// explicit choice. Returns the new theme if it was applied.
    pub fn on_system_change(
        &mut self,
        system: ThemeMode,
        now: DateTime<Utc>,
    ) -> Option<ThemeMode> {
        self.system = Some(system);
        if self.preference.explicit {
            debug!(system = %system, "ignoring OS theme change, explicit preference set");
            return None;
        }
        self.apply(
            ThemePreference {
                mode: system,
                explicit: false,
            },
            now,
        );
        Some(system)
    }

    /// Forgets the explicit preference and goes back to tracking the OS.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stored preference cannot be removed.
    pub fn reset_to_system(&mut self, now: DateTime<Utc>) -> Result<ThemeMode, StorageError> {
        self.storage.remove(keys::THEME)?;
        let mode = self.system.unwrap_or(FALLBACK_THEME);
        self.apply(
            ThemePreference {
                mode,
                explicit: false,
            },
            now,
        );
        Ok(mode)
    }

    fn apply(&mut self, preference: ThemePreference, now: DateTime<Utc>) {
        self.preference = preference;
        track(&self.analytics, || Event::ThemeChanged {
            timestamp: now,
            theme: preference.mode,
            explicit: preference.explicit,
        });
    }
}

impl fmt::Debug for ThemeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeManager")
            .field("system", &self.system)
            .field("preference", &self.preference)
            .finish_non_exhaustive()
    }
}

fn stored_preference(storage: &dyn Storage) -> Option<ThemeMode> {
    let raw = storage.get(keys::THEME)?;
    let mode = ThemeMode::parse(&raw);
    if mode.is_none() {
        warn!(value = %raw, "ignoring unrecognised stored theme");
    }
    mode
}
