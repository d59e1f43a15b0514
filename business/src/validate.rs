//! Field validators for the login form.
//!
//! Both validators are pure: the same input always yields the same result.

use std::sync::LazyLock;

use regex::Regex;

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";

/// Minimum password length, counted in UTF-16 code units like a browser input.
pub const MIN_PASSWORD_LEN: usize = 8;

// One "@", at least one "." after it, no whitespace anywhere.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|err| panic!("email pattern: {err}"))
});

/// Returns the error message for `value`, or `None` if it is an acceptable email.
pub fn validate_email(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        return Some(EMAIL_REQUIRED);
    }
    if !EMAIL_PATTERN.is_match(value) {
        return Some(EMAIL_INVALID);
    }
    None
}

/// Returns the error message for `value`, or `None` if it is an acceptable password.
///
/// Whitespace is not trimmed: a password of eight spaces is accepted.
pub fn validate_password(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return Some(PASSWORD_REQUIRED);
    }
    if value.encode_utf16().count() < MIN_PASSWORD_LEN {
        return Some(PASSWORD_TOO_SHORT);
    }
    None
}
