//! Page composition.
//!
//! Loads the content document once and hands each component the shared,
//! read-only pieces it needs (content, storage, page location, notifier,
//! analytics) at construction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use flagpole_core::config::SiteContent;

use crate::calendar::CalendarEvent;
use crate::config::Settings;
use crate::content::{ContentLoader, LoadedContent, PopulatedPage, Referral, create_http_client};
use crate::error::FlagpoleError;
use crate::lifecycle::{EventWindow, LifecycleController, LifecycleView};
use crate::notify::{Analytics, Notifier};
use crate::page::PageLocation;
use crate::registration::{HttpTransport, RegistrationHandler, SubmissionTransport};
use crate::storage::Storage;
use crate::teaser::TeaserWidget;
use crate::theme::{ThemeManager, ThemeMode};

/// A loaded landing page.
pub struct Site {
    loaded: LoadedContent,
    window: EventWindow,
    storage: Arc<dyn Storage>,
    page: PageLocation,
    referral: Referral,
    system_theme: Option<ThemeMode>,
    notifier: Arc<dyn Notifier>,
    analytics: Analytics,
    client: reqwest::Client,
}

impl Site {
    /// Opens storage and analytics from `settings` and loads the content
    /// document.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage file or event file cannot be opened.
    /// Content failures never fail the load.
    pub async fn load(
        settings: &Settings,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, FlagpoleError> {
        let storage = settings.open_storage()?;
        let analytics = settings.analytics()?;
        let client = create_http_client();

        let loaded = ContentLoader::new(client.clone())
            .load(&settings.content, &analytics)
            .await;

        Ok(Self::assemble(
            loaded,
            storage,
            settings.page.clone(),
            settings.system_theme,
            notifier,
            analytics,
            client,
            Utc::now(),
        ))
    }

    /// Builds a site from already-loaded parts. `now` anchors the
    /// placeholder window if the document's window is unusable.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn assemble(
        loaded: LoadedContent,
        storage: Arc<dyn Storage>,
        page: PageLocation,
        system_theme: Option<ThemeMode>,
        notifier: Arc<dyn Notifier>,
        analytics: Analytics,
        client: reqwest::Client,
        now: DateTime<Utc>,
    ) -> Self {
        let window = EventWindow::from_content_or_placeholder(&loaded.content, now);
        let referral = Referral::resolve(&page, &storage);
        Self {
            loaded,
            window,
            storage,
            page,
            referral,
            system_theme,
            notifier,
            analytics,
            client,
        }
    }

    #[must_use]
    pub fn content(&self) -> &SiteContent {
        &self.loaded.content
    }

    #[must_use]
    pub const fn loaded(&self) -> &LoadedContent {
        &self.loaded
    }

    #[must_use]
    pub const fn window(&self) -> &EventWindow {
        &self.window
    }

    #[must_use]
    pub const fn referral(&self) -> &Referral {
        &self.referral
    }

    #[must_use]
    pub const fn page(&self) -> &PageLocation {
        &self.page
    }

    #[must_use]
    pub fn storage(&self) -> Arc<dyn Storage> {
        Arc::clone(&self.storage)
    }

    #[must_use]
    pub fn analytics(&self) -> Analytics {
        self.analytics.clone()
    }

    /// Content regions, with the referral applied to every link.
    #[must_use]
    pub fn populate(&self) -> PopulatedPage {
        PopulatedPage::populate(self.content(), &self.referral)
    }

    /// The countdown controller drawing on `view`.
    pub fn lifecycle<V: LifecycleView>(&self, view: V) -> LifecycleController<V> {
        LifecycleController::new(
            self.window,
            view,
            Arc::clone(&self.notifier),
            self.analytics.clone(),
        )
    }

    /// Primary call-to-action target before any phase change.
    #[must_use]
    pub fn register_href(&self) -> String {
        self.content()
            .register_url
            .as_deref()
            .map_or_else(|| "#register".to_string(), |url| self.referral.apply(url))
    }

    #[must_use]
    pub fn teaser(&self) -> TeaserWidget {
        TeaserWidget::new(
            Arc::clone(&self.storage),
            Arc::clone(&self.notifier),
            self.analytics.clone(),
        )
    }

    #[must_use]
    pub fn theme(&self) -> ThemeManager {
        ThemeManager::new(
            Arc::clone(&self.storage),
            self.system_theme,
            self.analytics.clone(),
        )
    }

    /// The registration form posting to `endpoint`.
    #[must_use]
    pub fn registration(&self, endpoint: &str) -> RegistrationHandler {
        let transport: Arc<dyn SubmissionTransport> =
            Arc::new(HttpTransport::new(self.client.clone(), endpoint));
        self.registration_with(transport)
    }

    /// The registration form with a custom transport.
    #[must_use]
    pub fn registration_with(&self, transport: Arc<dyn SubmissionTransport>) -> RegistrationHandler {
        RegistrationHandler::new(
            transport,
            Arc::clone(&self.storage),
            self.page.clone(),
            self.analytics.clone(),
        )
    }

    #[must_use]
    pub fn calendar(&self) -> CalendarEvent {
        CalendarEvent::new(self.content(), &self.window)
    }
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("source", &self.loaded.source)
            .field("fallback", &self.loaded.is_fallback())
            .field("window", &self.window)
            .field("referral", &self.referral)
            .finish_non_exhaustive()
    }
}
