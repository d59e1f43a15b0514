use std::env::vars;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use log::info;
use login_business::{CredentialChecker, HttpCredentialChecker, MockCredentialChecker};
use serde::Deserialize;

/// Which credential checker backs the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum AuthBackend {
    /// In-process check against the demo account.
    #[default]
    #[serde(rename = "mock")]
    Mock,
    /// `POST {AUTH_API_URL}/auth/login`.
    #[serde(rename = "http")]
    Http,
}

impl Display for AuthBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mock => write!(f, "mock"),
            Self::Http => write!(f, "http"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    auth_backend: Option<AuthBackend>,
    auth_api_url: Option<String>,
    mock_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    backend: AuthBackend,
    api_url: Option<String>,
    mock_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: AuthBackend::Mock,
            api_url: None,
            mock_delay: MockCredentialChecker::DEFAULT_DELAY,
        }
    }
}

impl Config {
    /// Reads `AUTH_BACKEND`, `AUTH_API_URL` and `MOCK_DELAY_MS` from the environment.
    pub fn init() -> anyhow::Result<Self> {
        info!("Loading configuration from environment variables");

        let raw_config: RawConfig = serde_env::from_iter(vars())?;
        Self::from_raw(raw_config)
    }

    fn from_raw(raw_config: RawConfig) -> anyhow::Result<Self> {
        let RawConfig {
            auth_backend,
            auth_api_url,
            mock_delay_ms,
        } = raw_config;

        let backend = auth_backend.unwrap_or_default();

        let api_url = match (backend, auth_api_url) {
            (AuthBackend::Http, None) => {
                anyhow::bail!("AUTH_API_URL must be set when AUTH_BACKEND is {backend}")
            }
            (AuthBackend::Http, Some(url)) if url.trim().is_empty() => {
                anyhow::bail!("AUTH_API_URL must not be empty when AUTH_BACKEND is {backend}")
            }
            (_, url) => url,
        };

        let mock_delay = match mock_delay_ms {
            Some(ms) => Duration::from_millis(ms),
            None => MockCredentialChecker::DEFAULT_DELAY,
        };

        info!("Using {backend} credential backend");
        Ok(Self {
            backend,
            api_url,
            mock_delay,
        })
    }

    pub fn backend(&self) -> AuthBackend {
        self.backend
    }

    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    pub fn mock_delay(&self) -> Duration {
        self.mock_delay
    }

    pub fn credential_checker(&self) -> Arc<dyn CredentialChecker> {
        match (self.backend, self.api_url.as_deref()) {
            (AuthBackend::Http, Some(url)) => Arc::new(HttpCredentialChecker::new(url)),
            _ => Arc::new(MockCredentialChecker::default().with_delay(self.mock_delay)),
        }
    }
}
