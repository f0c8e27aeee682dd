//! Auth provider port and its GoTrue (Supabase Auth) implementation.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::error::AuthApiError;
use super::session::{AuthUser, Session};
use crate::config::Config;

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Remote identity oracle.
///
/// `get_user` is the only operation whose result may be trusted for
/// identity: the provider verifies the token signature before answering.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Look up the user owning `access_token`, verifying the token.
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthApiError>;

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AuthApiError>;

    /// Swap a one-time PKCE authorization code for a session.
    async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<Session, AuthApiError>;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthApiError>;

    /// Returns the name of this provider for logging/debugging.
    fn name(&self) -> &'static str;
}

/// Error body shapes GoTrue has used across versions.
#[derive(Debug, Default, Deserialize)]
struct ProviderErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<Value>,
    error_code: Option<String>,
    code: Option<Value>,
}

impl ProviderErrorBody {
    fn into_error(self, status: u16, raw: &str) -> AuthApiError {
        let message = self
            .msg
            .or(self.message)
            .or(self.error_description)
            .or_else(|| self.error.as_ref().and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    format!("Auth request failed with status {}", status)
                } else {
                    raw.to_string()
                }
            });
        let code = self
            .error_code
            .or_else(|| self.code.as_ref().and_then(Value::as_str).map(str::to_string));
        AuthApiError::new(message, code, Some(status))
    }
}

/// GoTrue HTTP client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct GoTrueProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoTrueProvider {
    pub fn new(auth_url: &str, api_key: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/auth/v1", auth_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(&config.auth_url, &config.auth_key)
    }

    /// Pass successful responses through; decode the provider's error body
    /// otherwise.
    async fn check_response(response: Response) -> Result<Response, AuthApiError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let raw = response.text().await.unwrap_or_default();
        let body: ProviderErrorBody = serde_json::from_str(&raw).unwrap_or_default();
        Err(body.into_error(status, &raw))
    }

    async fn token_grant(&self, grant_type: &str, body: Value) -> Result<Session, AuthApiError> {
        let url = format!("{}/token?grant_type={}", self.base_url, grant_type);
        let issued = Utc::now();
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(AuthApiError::transport)?;

        let response = Self::check_response(response).await?;
        let session: Session = response
            .json()
            .await
            .map_err(AuthApiError::transport)?;
        Ok(session.with_expiry_from(issued))
    }
}

#[async_trait]
impl AuthProvider for GoTrueProvider {
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthApiError> {
        let url = format!("{}/user", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(AuthApiError::transport)?;

        let response = Self::check_response(response).await?;
        response.json().await.map_err(AuthApiError::transport)
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AuthApiError> {
        debug!("Refreshing session");
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<Session, AuthApiError> {
        self.token_grant(
            "pkce",
            json!({ "auth_code": auth_code, "code_verifier": code_verifier }),
        )
        .await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthApiError> {
        let url = format!("{}/logout?scope=global", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(AuthApiError::transport)?;

        // Already gone counts as signed out
        match response.status().as_u16() {
            401 | 403 | 404 => Ok(()),
            _ => Self::check_response(response).await.map(|_| ()),
        }
    }

    fn name(&self) -> &'static str {
        "gotrue"
    }
}
