use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use thiserror::Error;

use plaza_types::{AuthSession, AuthUser, SignInRequest};

/// Path of the hosted password grant, relative to the auth base URL
const TOKEN_PATH: &str = "/auth/v1/token";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The auth service answered and refused the credentials
    #[error("Sign-in rejected: {0}")]
    Rejected(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Capability to establish a session from an email/password pair.
#[async_trait]
pub trait SessionAuth: Send + Sync {
    async fn sign_in_with_password(&self, credentials: &SignInRequest) -> Result<AuthSession, AuthError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    user: Option<AuthUser>,
}

/// The hosted service is not consistent about which key carries the reason
#[derive(Debug, Default, Deserialize)]
struct TokenErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl TokenErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description.or(self.msg).or(self.error)
    }
}

/// Password sign-in against the hosted auth service.
///
/// The established session lives in memory only and is shared by clones.
#[derive(Clone)]
pub struct PasswordAuthClient {
    client: Client,
    auth_url: String,
    api_key: Option<String>,
    session: Arc<RwLock<Option<AuthSession>>>,
}

impl PasswordAuthClient {
    pub fn new(auth_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_client(Client::new(), auth_url, api_key)
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(
        auth_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, auth_url, api_key))
    }

    fn with_client(client: Client, auth_url: impl Into<String>, api_key: Option<String>) -> Self {
        let auth_url: String = auth_url.into();
        Self {
            client,
            auth_url: auth_url.trim_end_matches('/').to_string(),
            api_key,
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// The session from the last successful sign-in
    pub fn current_session(&self) -> Option<AuthSession> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn sign_out(&self) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[async_trait]
impl SessionAuth for PasswordAuthClient {
    async fn sign_in_with_password(&self, credentials: &SignInRequest) -> Result<AuthSession, AuthError> {
        let url = format!("{}{}", self.auth_url, TOKEN_PATH);
        log::debug!(target: "api_calls", "POST {}?grant_type=password", url);

        let mut req = self
            .client
            .post(&url)
            .query(&[("grant_type", "password")])
            .json(credentials);
        if let Some(key) = &self.api_key {
            req = req.header("apikey", key).bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<TokenErrorBody>(&body)
                .ok()
                .and_then(TokenErrorBody::into_message)
                .unwrap_or_else(|| format!("auth service returned {}", status.as_u16()));
            log::warn!("Password sign-in rejected: {}", message);
            return Err(AuthError::Rejected(message));
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        let session = AuthSession {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: token
                .expires_in
                .map(|secs| Utc::now() + ChronoDuration::seconds(secs)),
            user: token.user,
        };

        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        log::info!("Password sign-in succeeded");

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_prefers_description() {
        let body: TokenErrorBody = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid login credentials"));

        let body: TokenErrorBody = serde_json::from_str(r#"{"code":400,"msg":"Email not confirmed"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Email not confirmed"));
    }

    #[test]
    fn test_new_client_has_no_session() {
        let client = PasswordAuthClient::new("http://localhost:54321/", None);
        assert!(client.current_session().is_none());
        assert_eq!(client.auth_url, "http://localhost:54321");
    }
}
