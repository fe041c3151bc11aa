//! Registration form state and field validation.
//!
//! Fields are validated when they lose focus and their error is cleared
//! (not re-validated) on input. The form never talks to the network; see
//! [`super::submit`] for that.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const FORM_INVALID_MESSAGE: &str = "Please fix the errors above";
pub const SUBMIT_FAILED_MESSAGE: &str = "Registration failed. Please try again.";

pub const SUBMIT_LABEL: &str = "Register free";
pub const LOADING_LABEL: &str = "Registering...";

pub const SUCCESS_HEADING: &str = "Registration successful!";
pub const SUCCESS_DETAIL: &str = "Check your email for confirmation and next steps.";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Whether `value` looks like an email address.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

// ============================================================================
// Fields
// ============================================================================

/// The form's inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    Name,
    Email,
    University,
    StudyLevel,
    TeamStatus,
    Discord,
}

impl FieldName {
    /// Every field, in form order.
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Email,
        Self::University,
        Self::StudyLevel,
        Self::TeamStatus,
        Self::Discord,
    ];

    /// The input's `name` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::University => "university",
            Self::StudyLevel => "study-level",
            Self::TeamStatus => "team-status",
            Self::Discord => "discord",
        }
    }

    /// Every field but the Discord handle is required.
    #[must_use]
    pub const fn is_required(self) -> bool {
        !matches!(self, Self::Discord)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input's current state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    pub error: Option<&'static str>,
    pub disabled: bool,
}

/// Form-level message panel. At most one is shown at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMessage {
    Success,
    Error(String),
}

impl FormMessage {
    #[must_use]
    pub fn to_html(&self, discord_url: &str, guide_url: &str) -> String {
        match self {
            Self::Success => format!(
                concat!(
                    r#"<div class="form-success"><h3>{heading}</h3><p>{detail}</p>"#,
                    r#"<div class="success-actions">"#,
                    r#"<a href="{discord}" class="btn btn-primary">Join Discord</a>"#,
                    r#"<a href="{guide}" class="btn btn-outline">Read beginner guide</a>"#,
                    "</div></div>",
                ),
                heading = SUCCESS_HEADING,
                detail = SUCCESS_DETAIL,
                discord = crate::content::escape_html(discord_url),
                guide = crate::content::escape_html(guide_url),
            ),
            Self::Error(message) => format!(
                r#"<div class="form-error">{}</div>"#,
                crate::content::escape_html(message)
            ),
        }
    }
}

// ============================================================================
// Form
// ============================================================================

/// Headless model of the registration form.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    fields: [FieldState; FieldName::ALL.len()],
    message: Option<FormMessage>,
    loading: bool,
    hidden: bool,
}

impl RegistrationForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(&self, name: FieldName) -> &FieldState {
        &self.fields[name.index()]
    }

    #[must_use]
    pub fn value(&self, name: FieldName) -> &str {
        &self.field(name).value
    }

    #[must_use]
    pub fn error(&self, name: FieldName) -> Option<&'static str> {
        self.field(name).error
    }

    /// The user typed into `name`: store the value and clear its error.
    pub fn input(&mut self, name: FieldName, value: impl Into<String>) {
        let field = &mut self.fields[name.index()];
        field.value = value.into();
        field.error = None;
    }

    /// `name` lost focus: validate it. Returns whether it is valid.
    ///
    /// A non-empty Discord handle without a leading `@` gets one.
    pub fn blur(&mut self, name: FieldName) -> bool {
        let field = &mut self.fields[name.index()];
        let value = field.value.trim();

        let error = if name.is_required() && value.is_empty() {
            Some(REQUIRED_MESSAGE)
        } else if name == FieldName::Email && !value.is_empty() && !is_valid_email(value) {
            Some(INVALID_EMAIL_MESSAGE)
        } else {
            None
        };

        if name == FieldName::Discord && !value.is_empty() && !value.starts_with('@') {
            field.value = format!("@{value}");
        }

        field.error = error;
        error.is_none()
    }

    /// Validates every field. Returns the failing fields, in form order.
    ///
    /// # Errors
    ///
    /// Returns the names of the fields that carry an error.
    pub fn validate_all(&mut self) -> Result<(), Vec<FieldName>> {
        let invalid: Vec<FieldName> = FieldName::ALL
            .into_iter()
            .filter(|&name| !self.blur(name))
            .collect();
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(invalid)
        }
    }

    /// Enters or leaves the loading state: all inputs are disabled and the
    /// submit control is relabelled while loading.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        for field in &mut self.fields {
            field.disabled = loading;
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn submit_label(&self) -> &'static str {
        if self.loading { LOADING_LABEL } else { SUBMIT_LABEL }
    }

    /// Shows the success panel, replacing any earlier message, and hides
    /// the form.
    pub fn show_success(&mut self) {
        self.message = Some(FormMessage::Success);
        self.hidden = true;
    }

    /// Shows the error banner, replacing any earlier message.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.message = Some(FormMessage::Error(message.into()));
    }

    #[must_use]
    pub const fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    /// Whether the form itself has been hidden by a successful submission.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> RegistrationForm {
        let mut form = RegistrationForm::new();
        form.input(FieldName::Name, "Ada Lovelace");
        form.input(FieldName::Email, "ada@example.edu.au");
        form.input(FieldName::University, "Monash University");
        form.input(FieldName::StudyLevel, "undergraduate");
        form.input(FieldName::TeamStatus, "solo");
        form
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@uni.edu.au"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("a@@b.c"));
    }

    #[test]
    fn blur_reports_required_then_input_clears() {
        let mut form = RegistrationForm::new();
        assert!(!form.blur(FieldName::Name));
        assert_eq!(form.error(FieldName::Name), Some(REQUIRED_MESSAGE));

        form.input(FieldName::Name, "A");
        assert_eq!(form.error(FieldName::Name), None);
    }

    #[test]
    fn input_does_not_revalidate() {
        let mut form = RegistrationForm::new();
        form.input(FieldName::Email, "bad");
        assert!(!form.blur(FieldName::Email));
        assert_eq!(form.error(FieldName::Email), Some(INVALID_EMAIL_MESSAGE));

        form.input(FieldName::Email, "still bad");
        assert_eq!(form.error(FieldName::Email), None);
    }

    #[test]
    fn whitespace_only_is_empty() {
        let mut form = RegistrationForm::new();
        form.input(FieldName::University, "   ");
        assert!(!form.blur(FieldName::University));
    }

    #[test]
    fn discord_is_optional_and_normalized() {
        let mut form = RegistrationForm::new();
        assert!(form.blur(FieldName::Discord));
        assert_eq!(form.value(FieldName::Discord), "");

        form.input(FieldName::Discord, " ada ");
        assert!(form.blur(FieldName::Discord));
        assert_eq!(form.value(FieldName::Discord), "@ada");

        form.input(FieldName::Discord, "@grace");
        form.blur(FieldName::Discord);
        assert_eq!(form.value(FieldName::Discord), "@grace");
    }

    #[test]
    fn validate_all_lists_failures_in_order() {
        let mut form = RegistrationForm::new();
        form.input(FieldName::Email, "ada@example.com");
        let failed = form.validate_all().unwrap_err();
        assert_eq!(
            failed,
            vec![
                FieldName::Name,
                FieldName::University,
                FieldName::StudyLevel,
                FieldName::TeamStatus
            ]
        );
        assert!(filled().validate_all().is_ok());
    }

    #[test]
    fn loading_disables_everything_and_relabels() {
        let mut form = filled();
        form.set_loading(true);
        assert_eq!(form.submit_label(), "Registering...");
        assert!(FieldName::ALL.iter().all(|&f| form.field(f).disabled));

        form.set_loading(false);
        assert_eq!(form.submit_label(), "Register free");
        assert!(FieldName::ALL.iter().all(|&f| !form.field(f).disabled));
    }

    #[test]
    fn messages_replace_each_other() {
        let mut form = filled();
        form.show_error(FORM_INVALID_MESSAGE);
        form.show_error(SUBMIT_FAILED_MESSAGE);
        assert_eq!(
            form.message(),
            Some(&FormMessage::Error(SUBMIT_FAILED_MESSAGE.to_string()))
        );

        form.show_success();
        assert_eq!(form.message(), Some(&FormMessage::Success));
        assert!(form.is_hidden());
    }

    #[test]
    fn success_markup_links_out() {
        let html = FormMessage::Success.to_html("https://discord.gg/x", "/beginner-guide");
        assert!(html.contains("Registration successful!"));
        assert!(html.contains(r#"href="https://discord.gg/x""#));
    }
}
