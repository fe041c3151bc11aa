//! Registration form handler.

pub mod form;
pub mod submit;

pub use form::{FieldName, FieldState, FormMessage, RegistrationForm, is_valid_email};
pub use submit::{
    DEFAULT_FORM_ENDPOINT, HttpTransport, RegistrationHandler, RegistrationPayload,
    SUBMISSION_SUBJECT, SubmissionTransport,
};
