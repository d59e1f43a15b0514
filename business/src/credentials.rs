//! The credential-check capability and its in-process mock.

use std::fmt::{Debug, Formatter};
use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

/// Shown when a failed check carries no usable message.
pub const FALLBACK_SUBMIT_MESSAGE: &str = "An error occurred. Please try again.";

/// Message used by backends that reject a login without saying why.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Email/password pair handed to a [`CredentialChecker`].
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// The authority refused the credentials.
    #[error("credentials rejected: {}", .0.as_deref().unwrap_or("no reason given"))]
    Rejected(Option<String>),
    /// The check could not be completed.
    #[error("credential check failed: {0}")]
    Transport(String),
    #[error("credential check was cancelled")]
    Cancelled,
}

impl CredentialError {
    /// The text to put in front of the user. Never blank.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(Some(message)) | Self::Transport(message)
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            _ => FALLBACK_SUBMIT_MESSAGE.to_owned(),
        }
    }
}

/// Asynchronously decides whether a pair of credentials is valid.
///
/// Every call resolves exactly once, to success or to a [`CredentialError`].
#[async_trait]
pub trait CredentialChecker: Send + Sync + Debug {
    async fn check_credentials(&self, credentials: &Credentials) -> Result<(), CredentialError>;
}

/// Accepts one fixed account after a simulated network delay.
#[derive(Debug, Clone)]
pub struct MockCredentialChecker {
    email: String,
    password: String,
    delay: Duration,
}

impl MockCredentialChecker {
    pub const DEMO_EMAIL: &'static str = "demo@example.com";
    pub const DEMO_PASSWORD: &'static str = "password123";
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            delay: Self::DEFAULT_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for MockCredentialChecker {
    fn default() -> Self {
        Self::new(Self::DEMO_EMAIL, Self::DEMO_PASSWORD)
    }
}

#[async_trait]
impl CredentialChecker for MockCredentialChecker {
    async fn check_credentials(&self, credentials: &Credentials) -> Result<(), CredentialError> {
        info!("MockCredentialChecker: checking '{}'", credentials.email);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if credentials.email == self.email && credentials.password == self.password {
            info!("MockCredentialChecker: '{}' accepted", credentials.email);
            Ok(())
        } else {
            warn!("MockCredentialChecker: '{}' rejected", credentials.email);
            Err(CredentialError::Rejected(Some(INVALID_CREDENTIALS.to_owned())))
        }
    }
}
