//! Login form session: field values, error state and submission flags.
//!
//! `LoginForm` is the whole state machine without any I/O. Submission is split
//! in two halves so the caller decides how the credential check runs:
//!
//! 1. [`LoginForm::begin_submit`] validates and, if both fields pass, locks the
//!    form and hands back the [`Credentials`] to check.
//! 2. [`LoginForm::finish_submit`] takes the check's result and unlocks the form.
//!
//! ## Validation timing
//!
//! - Editing a field re-validates it only if it already shows an error.
//! - Blurring a field re-validates it only after the first submit attempt.
//! - Submitting validates both fields and replaces every error.

use login_states::State;

use crate::credentials::{CredentialError, Credentials};
use crate::validate::{validate_email, validate_password};

/// One of the two editable inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Password,
}

impl Field {
    pub fn validate(self, value: &str) -> Option<&'static str> {
        match self {
            Self::Email => validate_email(value),
            Self::Password => validate_password(value),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Password => "Password",
        }
    }
}

/// Field-level errors plus the form-level `submit` error.
///
/// A `Some` entry means "has error"; the form never stores an empty message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub email: Option<String>,
    pub password: Option<String>,
    pub submit: Option<String>,
}

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Email => self.email.as_deref(),
            Field::Password => self.password.as_deref(),
        }
    }

    fn set(&mut self, field: Field, message: Option<&'static str>) {
        let slot = match field {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        };
        *slot = message.map(str::to_owned);
    }

    pub fn has(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none() && self.submit.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionState {
    /// Sticky: set by the first submit attempt, never cleared.
    pub has_attempted_submit: bool,
    /// True only while a credential check is in flight.
    pub is_submitting: bool,
}

/// What [`LoginForm::begin_submit`] decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStart {
    /// A check is already in flight; nothing changed.
    Busy,
    /// At least one field failed validation; errors were replaced.
    Rejected,
    /// Both fields passed; the form is locked until `finish_submit`.
    Dispatch(Credentials),
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Succeeded,
    /// Carries the message now stored in `errors.submit`.
    Failed(String),
}

/// Read-only snapshot handed to the view on every render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginFormView {
    pub email: String,
    pub password: String,
    pub errors: FieldErrors,
    pub is_loading: bool,
    pub is_submitted: bool,
}

impl LoginFormView {
    pub fn inputs_enabled(&self) -> bool {
        !self.is_loading
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::Password => &self.password,
        }
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    email: String,
    password: String,
    errors: FieldErrors,
    submission: SubmissionState,
}

impl State for LoginForm {}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::Password => &self.password,
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    pub fn is_loading(&self) -> bool {
        self.submission.is_submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.submission.has_attempted_submit
    }

    /// Stores a new value for `field`.
    ///
    /// Returns `false` and ignores the edit while a submission is in flight.
    pub fn on_change(&mut self, field: Field, value: impl Into<String>) -> bool {
        if self.submission.is_submitting {
            return false;
        }

        let value = value.into();
        if self.errors.has(field) {
            self.errors.set(field, field.validate(&value));
        }
        match field {
            Field::Email => self.email = value,
            Field::Password => self.password = value,
        }
        true
    }

    /// Re-validates `field` once the user has tried to submit.
    ///
    /// Only that field's entry changes; the other field and `submit` are kept.
    pub fn on_blur(&mut self, field: Field) {
        if !self.submission.has_attempted_submit || self.submission.is_submitting {
            return;
        }
        let message = field.validate(self.value(field));
        self.errors.set(field, message);
    }

    pub fn begin_submit(&mut self) -> SubmitStart {
        if self.submission.is_submitting {
            return SubmitStart::Busy;
        }

        self.submission.has_attempted_submit = true;

        let email_error = validate_email(&self.email);
        let password_error = validate_password(&self.password);
        if email_error.is_some() || password_error.is_some() {
            self.errors = FieldErrors {
                email: email_error.map(str::to_owned),
                password: password_error.map(str::to_owned),
                submit: None,
            };
            return SubmitStart::Rejected;
        }

        self.errors = FieldErrors::default();
        self.submission.is_submitting = true;
        SubmitStart::Dispatch(Credentials::new(self.email.clone(), self.password.clone()))
    }

    /// Applies the credential check's result.
    ///
    /// Returns `None` without touching anything if no submission is in flight.
    pub fn finish_submit(&mut self, result: Result<(), CredentialError>) -> Option<SubmitOutcome> {
        if !self.submission.is_submitting {
            return None;
        }
        self.submission.is_submitting = false;

        match result {
            Ok(()) => Some(SubmitOutcome::Succeeded),
            Err(err) => {
                let message = err.user_message();
                self.errors = FieldErrors {
                    submit: Some(message.clone()),
                    ..FieldErrors::default()
                };
                Some(SubmitOutcome::Failed(message))
            }
        }
    }

    pub fn view(&self) -> LoginFormView {
        LoginFormView {
            email: self.email.clone(),
            password: self.password.clone(),
            errors: self.errors.clone(),
            is_loading: self.submission.is_submitting,
            is_submitted: self.submission.has_attempted_submit,
        }
    }
}
