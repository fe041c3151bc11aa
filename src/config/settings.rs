//! Runtime settings shared by every command.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::content::ContentSource;
use crate::error::FlagpoleError;
use crate::notify::{Analytics, AnalyticsSink};
use crate::observability::EventEmitter;
use crate::page::PageLocation;
use crate::storage::{FileStorage, Storage};
use crate::theme::ThemeMode;

/// Default location of the content document.
pub const DEFAULT_CONTENT: &str = "assets/content.json";

/// Default location of the persistent store.
pub const DEFAULT_STORAGE: &str = ".flagpole/storage.json";

/// Resolved global settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub content: ContentSource,
    pub storage_path: PathBuf,
    pub page: PageLocation,
    /// OS dark-mode signal; `None` when unknown.
    pub system_theme: Option<ThemeMode>,
    pub form_endpoint: String,
    /// JSONL event file; events are not recorded without one.
    pub events_path: Option<PathBuf>,
    pub metrics_port: Option<u16>,
}

impl Settings {
    /// Opens the persistent store.
    ///
    /// # Errors
    ///
    /// Returns `FlagpoleError::Storage` if the store exists but is
    /// unreadable or corrupt.
    pub fn open_storage(&self) -> Result<Arc<dyn Storage>, FlagpoleError> {
        Ok(Arc::new(FileStorage::open(&self.storage_path)?))
    }

    /// Opens the analytics sink, if an event file was configured.
    ///
    /// # Errors
    ///
    /// Returns `FlagpoleError::Io` if the event file cannot be opened.
    pub fn analytics(&self) -> Result<Analytics, FlagpoleError> {
        match &self.events_path {
            Some(path) => {
                info!(path = %path.display(), "recording events");
                let sink: Arc<dyn AnalyticsSink> = Arc::new(EventEmitter::from_file(path)?);
                Ok(Some(sink))
            }
            None => Ok(None),
        }
    }

    /// Starts the metrics exporter when a port was given.
    ///
    /// # Errors
    ///
    /// Returns `FlagpoleError::Io` if the exporter cannot bind.
    pub fn init_metrics(&self) -> Result<(), FlagpoleError> {
        if let Some(port) = self.metrics_port {
            crate::observability::init_metrics(Some(port))?;
            info!(port, "Prometheus metrics endpoint started");
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content: ContentSource::parse(DEFAULT_CONTENT),
            storage_path: PathBuf::from(DEFAULT_STORAGE),
            page: PageLocation::none(),
            system_theme: None,
            form_endpoint: crate::registration::DEFAULT_FORM_ENDPOINT.to_string(),
            events_path: None,
            metrics_port: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(
            settings.content,
            ContentSource::File(PathBuf::from("assets/content.json"))
        );
        assert_eq!(settings.storage_path, PathBuf::from(".flagpole/storage.json"));
        assert_eq!(settings.form_endpoint, "https://formspree.io/f/YOUR_FORM_ID");
    }

    #[test]
    fn opens_storage_and_events() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            storage_path: dir.path().join("s/storage.json"),
            events_path: Some(dir.path().join("events.jsonl")),
            ..Settings::default()
        };
        let storage = settings.open_storage().unwrap();
        storage.set("k", "v").unwrap();
        assert!(dir.path().join("s/storage.json").exists());
        assert!(settings.analytics().unwrap().is_some());
    }

    #[test]
    fn corrupt_storage_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();
        let settings = Settings {
            storage_path: path,
            ..Settings::default()
        };
        assert!(matches!(
            settings.open_storage(),
            Err(FlagpoleError::Storage(_))
        ));
    }
}
