//! Credential checks against an HTTP login endpoint.
//!
//! `POST {api_base}/auth/login` with `{"email": .., "password": ..}`.
//! Any 2xx status is a successful login. Error bodies may carry a `message`
//! field, which is shown to the user as-is.

use async_trait::async_trait;
use log::{error, info, warn};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::credentials::{CredentialChecker, CredentialError, Credentials, INVALID_CREDENTIALS};

/// Error body returned by the login endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginErrorResponse {
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpCredentialChecker {
    client: reqwest::Client,
    login_url: String,
}

impl HttpCredentialChecker {
    pub fn new(api_base: &str) -> Self {
        Self::with_client(reqwest::Client::new(), api_base)
    }

    pub fn with_client(client: reqwest::Client, api_base: &str) -> Self {
        Self {
            client,
            login_url: format!("{}/auth/login", api_base.trim_end_matches('/')),
        }
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }
}

/// Extracts the `message` field of an error body, if there is a non-blank one.
fn extract_error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<LoginErrorResponse>(body)
        .ok()
        .and_then(|r| r.message)
        .filter(|m| !m.trim().is_empty())
}

fn error_for_status(status: StatusCode, body: &[u8]) -> CredentialError {
    let message = extract_error_message(body);
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CredentialError::Rejected(Some(message.unwrap_or_else(|| INVALID_CREDENTIALS.to_owned())))
        }
        other => CredentialError::Transport(
            message.unwrap_or_else(|| format!("Server error (status {})", other.as_u16())),
        ),
    }
}

#[async_trait]
impl CredentialChecker for HttpCredentialChecker {
    async fn check_credentials(&self, credentials: &Credentials) -> Result<(), CredentialError> {
        info!("HttpCredentialChecker: POST {} for '{}'", self.login_url, credentials.email);

        let response = self
            .client
            .post(&self.login_url)
            .json(credentials)
            .send()
            .await
            .map_err(|err| {
                error!("HttpCredentialChecker: network error: {err}");
                CredentialError::Transport(format!("Network error: {err}"))
            })?;

        let status = response.status();
        if status.is_success() {
            info!("HttpCredentialChecker: '{}' accepted", credentials.email);
            return Ok(());
        }

        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(err) => {
                warn!("HttpCredentialChecker: failed to read error body: {err}");
                Vec::new()
            }
        };
        let err = error_for_status(status, &body);
        warn!("HttpCredentialChecker: login failed with status {status}: {err}");
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_url_joins_without_double_slash() {
        assert_eq!(
            HttpCredentialChecker::new("http://localhost:8080/api/").login_url(),
            "http://localhost:8080/api/auth/login"
        );
        assert_eq!(
            HttpCredentialChecker::new("http://localhost:8080/api").login_url(),
            "http://localhost:8080/api/auth/login"
        );
    }

    #[test]
    fn unauthorized_without_body_is_invalid_credentials() {
        let err = error_for_status(StatusCode::UNAUTHORIZED, b"");
        assert_eq!(err, CredentialError::Rejected(Some(INVALID_CREDENTIALS.to_owned())));
    }

    #[test]
    fn error_body_message_wins() {
        let err = error_for_status(StatusCode::FORBIDDEN, br#"{"message": "Account locked"}"#);
        assert_eq!(err.user_message(), "Account locked");
    }

    #[test]
    fn blank_body_message_is_ignored() {
        let err = error_for_status(StatusCode::UNAUTHORIZED, br#"{"message": "  "}"#);
        assert_eq!(err.user_message(), INVALID_CREDENTIALS);
    }

    #[test]
    fn server_error_mentions_status() {
        let err = error_for_status(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");
        assert_eq!(err.user_message(), "Server error (status 502)");
    }
}
