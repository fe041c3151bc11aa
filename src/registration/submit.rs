//! Registration submission.
//!
//! One POST per submission, no retries, no timeout beyond transport
//! defaults. While the call is in flight the form is in its loading state;
//! the state is restored by a guard, so it is undone on every outcome
//! including cancellation of the submitting future.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::SubmitError;
use crate::notify::{Analytics, track};
use crate::observability::{Event, metrics};
use crate::page::{PageLocation, params};
use crate::storage::{Storage, keys};

use super::form::{FORM_INVALID_MESSAGE, FieldName, RegistrationForm, SUBMIT_FAILED_MESSAGE};

/// Default submission endpoint.
pub const DEFAULT_FORM_ENDPOINT: &str = "https://formspree.io/f/YOUR_FORM_ID";

/// Subject line attached to every submission.
pub const SUBMISSION_SUBJECT: &str = "ACUCyS Christmas CTF 2025 Registration";

/// JSON body sent to the form endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationPayload {
    pub name: String,
    pub email: String,
    pub university: String,
    pub study_level: String,
    pub discord: String,
    pub team_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(rename = "_subject")]
    pub subject: &'static str,
}

impl RegistrationPayload {
    /// Builds the body from the form's (trimmed) values plus attribution.
    ///
    /// The referral is read from storage at submission time; campaign
    /// parameters come from the page URL.
    #[must_use]
    pub fn build(form: &RegistrationForm, storage: &dyn Storage, page: &PageLocation) -> Self {
        let value = |name| form.value(name).trim().to_string();
        Self {
            name: value(FieldName::Name),
            email: value(FieldName::Email),
            university: value(FieldName::University),
            study_level: value(FieldName::StudyLevel),
            discord: value(FieldName::Discord),
            team_status: value(FieldName::TeamStatus),
            referral: storage.get(keys::REFERRAL).filter(|r| !r.is_empty()),
            utm_source: page.param(params::UTM_SOURCE),
            utm_medium: page.param(params::UTM_MEDIUM),
            utm_campaign: page.param(params::UTM_CAMPAIGN),
            subject: SUBMISSION_SUBJECT,
        }
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Delivers a registration to the external form service.
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    /// Sends `payload` once.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Network` or `SubmitError::HttpStatus` if the
    /// submission was not accepted.
    async fn send(&self, payload: &RegistrationPayload) -> Result<(), SubmitError>;
}

/// JSON-over-HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    #[must_use]
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SubmissionTransport for HttpTransport {
    async fn send(&self, payload: &RegistrationPayload) -> Result<(), SubmitError> {
        debug!(endpoint = %self.endpoint, "submitting registration");

        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::HttpStatus(status.as_u16()));
        }
        Ok(())
    }
}

// ============================================================================
// Handler
// ============================================================================

/// Restores the form from its loading state when dropped.
struct LoadingGuard<'a> {
    form: &'a mut RegistrationForm,
}

impl<'a> LoadingGuard<'a> {
    fn engage(form: &'a mut RegistrationForm) -> Self {
        form.set_loading(true);
        Self { form }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.form.set_loading(false);
    }
}

/// The registration form wired to its collaborators.
pub struct RegistrationHandler {
    form: RegistrationForm,
    transport: Arc<dyn SubmissionTransport>,
    storage: Arc<dyn Storage>,
    page: PageLocation,
    analytics: Analytics,
}

impl RegistrationHandler {
    #[must_use]
    pub fn new(
        transport: Arc<dyn SubmissionTransport>,
        storage: Arc<dyn Storage>,
        page: PageLocation,
        analytics: Analytics,
    ) -> Self {
        Self {
            form: RegistrationForm::new(),
            transport,
            storage,
            page,
            analytics,
        }
    }

    #[must_use]
    pub const fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub const fn form_mut(&mut self) -> &mut RegistrationForm {
        &mut self.form
    }

    /// Validates and, if everything passes, submits once.
    ///
    /// Exactly one of the success panel or the error banner is showing
    /// when this returns.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::InProgress` if a submission is already in
    /// flight, `SubmitError::Invalid` if any field fails validation (nothing
    /// is sent), or the transport's error if delivery failed.
    pub async fn submit(&mut self) -> Result<RegistrationPayload, SubmitError> {
        if self.form.is_loading() {
            return Err(SubmitError::InProgress);
        }

        if let Err(fields) = self.form.validate_all() {
            debug!(?fields, "registration blocked by validation");
            self.form.show_error(FORM_INVALID_MESSAGE);
            return Err(SubmitError::Invalid { fields });
        }

        let payload = RegistrationPayload::build(&self.form, self.storage.as_ref(), &self.page);
        track(&self.analytics, || Event::RegistrationSubmitted {
            timestamp: Utc::now(),
            university: payload.university.clone(),
            study_level: payload.study_level.clone(),
            team_status: payload.team_status.clone(),
            referral: payload.referral.clone(),
        });

        let result = {
            let _loading = LoadingGuard::engage(&mut self.form);
            self.transport.send(&payload).await
        };

        match result {
            Ok(()) => {
                info!(university = %payload.university, "registration accepted");
                self.form.show_success();
                metrics::record_registration("success");
                track(&self.analytics, || Event::RegistrationSucceeded {
                    timestamp: Utc::now(),
                });
                Ok(payload)
            }
            Err(e) => {
                warn!(error = %e, "registration submission failed");
                self.form.show_error(SUBMIT_FAILED_MESSAGE);
                metrics::record_registration("failure");
                track(&self.analytics, || Event::RegistrationFailed {
                    timestamp: Utc::now(),
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for RegistrationHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationHandler")
            .field("form", &self.form)
            .field("page", &self.page)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::Json;
    use axum::Router;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use serde_json::Value;

    use super::*;
    use crate::registration::FormMessage;
    use crate::storage::MemoryStorage;

    /// Transport that records payloads and answers with a fixed outcome.
    struct StubTransport {
        fail_with: Option<u16>,
        sent: Mutex<Vec<RegistrationPayload>>,
    }

    impl StubTransport {
        fn new(fail_with: Option<u16>) -> Arc<Self> {
            Arc::new(Self {
                fail_with,
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SubmissionTransport for StubTransport {
        async fn send(&self, payload: &RegistrationPayload) -> Result<(), SubmitError> {
            self.sent.lock().unwrap().push(payload.clone());
            match self.fail_with {
                Some(code) => Err(SubmitError::HttpStatus(code)),
                None => Ok(()),
            }
        }
    }

    fn fill(handler: &mut RegistrationHandler) {
        let form = handler.form_mut();
        form.input(FieldName::Name, "Ada Lovelace");
        form.input(FieldName::Email, "ada@example.edu.au");
        form.input(FieldName::University, "Monash University");
        form.input(FieldName::StudyLevel, "undergraduate");
        form.input(FieldName::TeamStatus, "have-team");
        form.input(FieldName::Discord, "ada");
    }

    fn handler(transport: Arc<dyn SubmissionTransport>, page: &str) -> RegistrationHandler {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.set(keys::REFERRAL, "abc123").unwrap();
        RegistrationHandler::new(transport, storage, PageLocation::parse(page), None)
    }

    #[tokio::test]
    async fn invalid_form_sends_nothing() {
        let transport = StubTransport::new(None);
        let mut handler = handler(transport.clone(), "https://ctf.acucys.org/");

        let err = handler.submit().await.unwrap_err();
        assert!(matches!(err, SubmitError::Invalid { ref fields } if fields.len() == 5));
        assert!(transport.sent.lock().unwrap().is_empty());
        assert_eq!(
            handler.form().message(),
            Some(&FormMessage::Error("Please fix the errors above".to_string()))
        );
    }

    #[tokio::test]
    async fn success_carries_attribution_and_restores_form() {
        let transport = StubTransport::new(None);
        let mut handler = handler(
            transport.clone(),
            "https://ctf.acucys.org/?utm_source=discord&utm_medium=social",
        );
        fill(&mut handler);

        let payload = handler.submit().await.unwrap();
        assert_eq!(payload.discord, "@ada");
        assert_eq!(payload.referral.as_deref(), Some("abc123"));
        assert_eq!(payload.utm_source.as_deref(), Some("discord"));
        assert_eq!(payload.utm_medium.as_deref(), Some("social"));
        assert_eq!(payload.utm_campaign, None);
        assert_eq!(payload.subject, SUBMISSION_SUBJECT);

        assert_eq!(transport.sent.lock().unwrap().len(), 1);
        assert_eq!(handler.form().message(), Some(&FormMessage::Success));
        assert!(!handler.form().is_loading());
        assert_eq!(handler.form().submit_label(), "Register free");
    }

    #[tokio::test]
    async fn failure_shows_single_error_and_restores_form() {
        let mut handler = handler(StubTransport::new(Some(500)), "https://ctf.acucys.org/");
        fill(&mut handler);
        handler.form_mut().show_error("stale");

        let err = handler.submit().await.unwrap_err();
        assert!(matches!(err, SubmitError::HttpStatus(500)));
        assert_eq!(
            handler.form().message(),
            Some(&FormMessage::Error(SUBMIT_FAILED_MESSAGE.to_string()))
        );
        assert!(!handler.form().is_loading());
        assert!(!handler.form().field(FieldName::Email).disabled);
    }

    #[tokio::test]
    async fn submission_in_flight_is_rejected() {
        let transport = StubTransport::new(None);
        let mut handler = handler(transport.clone(), "https://ctf.acucys.org/");
        fill(&mut handler);
        handler.form_mut().set_loading(true);

        assert!(matches!(
            handler.submit().await,
            Err(SubmitError::InProgress)
        ));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn payload_omits_absent_attribution() {
        let mut form = RegistrationForm::new();
        form.input(FieldName::Name, "Ada");
        let payload =
            RegistrationPayload::build(&form, &MemoryStorage::new(), &PageLocation::none());
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["_subject"], SUBMISSION_SUBJECT);
        assert_eq!(json["study_level"], "");
        assert!(json.get("referral").is_none());
        assert!(json.get("utm_source").is_none());
    }

    type Received = Arc<Mutex<Vec<Value>>>;

    async fn capture(
        State(received): State<Received>,
        Json(body): Json<Value>,
    ) -> StatusCode {
        received.lock().unwrap().push(body);
        StatusCode::OK
    }

    #[tokio::test]
    async fn http_transport_posts_json() {
        let received: Received = Arc::default();
        let app = Router::new()
            .route("/f/test", post(capture))
            .route("/f/broken", post(|| async { StatusCode::BAD_GATEWAY }))
            .with_state(received.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = crate::content::create_http_client();
        let transport = HttpTransport::new(client.clone(), format!("http://{addr}/f/test"));
        let mut handler = handler(Arc::new(transport), "https://ctf.acucys.org/?utm_campaign=xmas");
        fill(&mut handler);
        handler.submit().await.unwrap();

        let bodies = received.lock().unwrap().clone();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["name"], "Ada Lovelace");
        assert_eq!(bodies[0]["team_status"], "have-team");
        assert_eq!(bodies[0]["referral"], "abc123");
        assert_eq!(bodies[0]["utm_campaign"], "xmas");
        assert_eq!(bodies[0]["_subject"], SUBMISSION_SUBJECT);

        let broken = HttpTransport::new(client, format!("http://{addr}/f/broken"));
        let payload = RegistrationPayload::build(
            handler.form(),
            &MemoryStorage::new(),
            &PageLocation::none(),
        );
        assert!(matches!(
            broken.send(&payload).await,
            Err(SubmitError::HttpStatus(502))
        ));
    }
}
