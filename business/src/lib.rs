//! Login form business logic: validators, the form state machine, and the
//! credential-check capability with its backends.

mod controller;
mod credentials;
mod http_checker;
mod login_form;
pub mod validate;

pub use controller::{CheckCompletion, LoginController};
pub use credentials::{
    CredentialChecker, CredentialError, Credentials, FALLBACK_SUBMIT_MESSAGE, INVALID_CREDENTIALS,
    MockCredentialChecker,
};
pub use http_checker::{HttpCredentialChecker, LoginErrorResponse};
pub use login_form::{
    Field, FieldErrors, LoginForm, LoginFormView, SubmissionState, SubmitOutcome, SubmitStart,
};
