//! `register` command
//!
//! Fills the registration form from flags, blurring each field as a user
//! tabbing through it would, then submits once.

use crate::cli::args::RegisterArgs;
use crate::config::Settings;
use crate::error::{FlagpoleError, SubmitError};
use crate::registration::form::{SUCCESS_DETAIL, SUCCESS_HEADING};
use crate::registration::{FieldName, FormMessage, RegistrationForm};

use super::open_site;

/// Validates and submits a registration.
///
/// # Errors
///
/// Returns `SubmitError::Invalid` (exit 64) when a field fails validation,
/// or the transport error when the endpoint cannot be reached or rejects
/// the submission.
pub async fn run(args: &RegisterArgs, settings: &Settings) -> Result<(), FlagpoleError> {
    let site = open_site(settings).await?;
    let mut handler = site.registration(&settings.form_endpoint);
    fill(handler.form_mut(), args);

    let result = handler.submit().await;
    let form = handler.form();

    match result {
        Ok(payload) => {
            tracing::debug!(email = %payload.email, "registration delivered");
            if let Some(FormMessage::Success) = form.message() {
                println!("{SUCCESS_HEADING}");
                println!("{SUCCESS_DETAIL}");
            }
            Ok(())
        }
        Err(e) => {
            if let SubmitError::Invalid { fields } = &e {
                for field in fields {
                    if let Some(message) = form.error(*field) {
                        eprintln!("  --{}: {message}", flag_name(*field));
                    }
                }
            }
            if let Some(FormMessage::Error(message)) = form.message() {
                eprintln!("{message}");
            }
            Err(e.into())
        }
    }
}

/// Enters every supplied value and blurs the field.
fn fill(form: &mut RegistrationForm, args: &RegisterArgs) {
    let values = [
        (FieldName::Name, &args.name),
        (FieldName::Email, &args.email),
        (FieldName::University, &args.university),
        (FieldName::StudyLevel, &args.study_level),
        (FieldName::TeamStatus, &args.team_status),
        (FieldName::Discord, &args.discord),
    ];
    for (field, value) in values {
        if let Some(value) = value {
            form.input(field, value.as_str());
            form.blur(field);
        }
    }
}

/// The command-line flag that supplies `field`.
const fn flag_name(field: FieldName) -> &'static str {
    match field {
        FieldName::Name => "name",
        FieldName::Email => "email",
        FieldName::University => "university",
        FieldName::StudyLevel => "study-level",
        FieldName::TeamStatus => "team-status",
        FieldName::Discord => "discord",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_normalizes_discord_and_skips_missing() {
        let mut form = RegistrationForm::new();
        let args = RegisterArgs {
            name: Some("  Ada  ".to_string()),
            discord: Some("ada".to_string()),
            ..RegisterArgs::default()
        };
        fill(&mut form, &args);
        assert_eq!(form.value(FieldName::Discord), "@ada");
        assert_eq!(form.value(FieldName::Email), "");
        assert_eq!(form.error(FieldName::Name), None);
    }

    #[test]
    fn fill_flags_bad_email_on_blur() {
        let mut form = RegistrationForm::new();
        let args = RegisterArgs {
            email: Some("not-an-email".to_string()),
            ..RegisterArgs::default()
        };
        fill(&mut form, &args);
        assert_eq!(
            form.error(FieldName::Email),
            Some(crate::registration::form::INVALID_EMAIL_MESSAGE)
        );
    }
}
