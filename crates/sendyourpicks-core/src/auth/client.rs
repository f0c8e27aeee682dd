use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::cookies::{CookieJar, SessionCookies, SetCookie};
use super::error::AuthApiError;
use super::provider::AuthProvider;
use super::session::{AuthUser, Session};
use crate::logging::{AuthDetails, AuthEvent, Details, Logger};

const VERIFIER_MISSING_MESSAGE: &str =
    "PKCE code verifier not found in storage. The sign-in link must be opened in the browser that requested it.";

/// Request-scoped auth client.
///
/// Reads the session from the request cookies, refreshes it when it is close
/// to expiry and queues the resulting cookie writes for the response.
pub struct AuthClient {
    provider: Arc<dyn AuthProvider>,
    cookies: SessionCookies,
    jar: CookieJar,
    logger: Logger,
}

impl AuthClient {
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        storage_key: impl Into<String>,
        jar: CookieJar,
        logger: Logger,
    ) -> Self {
        Self {
            provider,
            cookies: SessionCookies::new(storage_key),
            jar,
            logger,
        }
    }

    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Cookie writes to send back with the response.
    pub fn take_set_cookies(&mut self) -> Vec<SetCookie> {
        self.jar.take_pending()
    }

    /// Session stored in cookies, refreshed first if it is about to expire.
    ///
    /// Not verified: the access token inside may be forged or revoked.
    /// Use [`AuthClient::get_user`] for anything that needs trust.
    pub async fn get_session(&mut self) -> Result<Option<Session>, AuthApiError> {
        let Some(session) = self.cookies.load(&self.jar) else {
            return Ok(None);
        };
        if !session.needs_refresh_at(Utc::now()) {
            return Ok(Some(session));
        }

        match self.provider.refresh_session(&session.refresh_token).await {
            Ok(refreshed) => {
                self.cookies.store(&mut self.jar, &refreshed);
                self.logger.auth(
                    AuthEvent::TokenRefresh,
                    AuthDetails {
                        email: refreshed.email().or(session.email()).map(str::to_string),
                        ..Default::default()
                    },
                );
                Ok(Some(refreshed))
            }
            Err(e) => {
                warn!(error = %e, "Session refresh failed, dropping session");
                self.cookies.clear(&mut self.jar);
                Err(e)
            }
        }
    }

    /// Verified identity of the current session holder.
    pub async fn get_user(&mut self) -> Result<AuthUser, AuthApiError> {
        let session = self.get_session().await?;
        let Some(session) = session else {
            return Err(AuthApiError::session_missing());
        };
        self.provider.get_user(&session.access_token).await
    }

    /// Complete an email-link sign in.
    pub async fn exchange_code_for_session(&mut self, code: &str) -> Result<Session, AuthApiError> {
        let result = match self.cookies.load_code_verifier(&self.jar) {
            Some(verifier) => self.provider.exchange_code_for_session(code, &verifier).await,
            None => Err(AuthApiError::new(
                VERIFIER_MISSING_MESSAGE,
                Some("pkce_code_verifier_not_found".to_string()),
                Some(400),
            )),
        };
        self.cookies.clear_code_verifier(&mut self.jar);

        match result {
            Ok(session) => {
                self.cookies.store(&mut self.jar, &session);
                self.logger.auth(
                    AuthEvent::LoginSuccess,
                    AuthDetails {
                        email: session.email().map(str::to_string),
                        details: Details::new().with("method", "pkce"),
                        ..Default::default()
                    },
                );
                Ok(session)
            }
            Err(e) => {
                self.logger.auth(
                    AuthEvent::LoginFailure,
                    AuthDetails {
                        error: Some(e.message.clone()),
                        details: Details::new()
                            .with("method", "pkce")
                            .with_opt("errorCode", e.code.clone())
                            .with_opt("errorStatus", e.status),
                        ..Default::default()
                    },
                );
                Err(e)
            }
        }
    }

    /// Revoke the session with the provider and clear its cookies.
    ///
    /// Cookies are cleared even when the provider call fails.
    pub async fn sign_out(&mut self) -> Result<(), AuthApiError> {
        let session = self.cookies.load(&self.jar);
        let revoked = match session {
            Some(ref s) => self.provider.sign_out(&s.access_token).await,
            None => {
                debug!("Sign out without a stored session");
                Ok(())
            }
        };

        self.cookies.clear(&mut self.jar);
        self.cookies.clear_code_verifier(&mut self.jar);
        self.logger.auth(
            AuthEvent::Logout,
            AuthDetails {
                email: session.as_ref().and_then(Session::email).map(str::to_string),
                error: revoked.as_ref().err().map(|e| e.message.clone()),
                ..Default::default()
            },
        );
        revoked
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory provider shared by the auth tests.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use serde_json::Value;

    use super::*;

    pub fn token(payload: Value) -> String {
        format!(
            "eyJhbGciOiJFUzI1NiJ9.{}.c2ln",
            URL_SAFE_NO_PAD.encode(payload.to_string())
        )
    }

    pub fn user(email: &str) -> AuthUser {
        AuthUser {
            id: "7c1a9f22-0d4e-4a57-9b1e-3f0c2d1e5a6b".to_string(),
            aud: Some("authenticated".to_string()),
            role: Some("authenticated".to_string()),
            email: Some(email.to_string()),
            phone: None,
            app_metadata: Value::Null,
            user_metadata: Value::Null,
            created_at: None,
            last_sign_in_at: None,
        }
    }

    pub fn session(access_token: &str, expires_at: i64) -> Session {
        Session {
            access_token: access_token.to_string(),
            refresh_token: "refresh-1".to_string(),
            expires_in: Some(3600),
            expires_at: Some(expires_at),
            token_type: "bearer".to_string(),
            user: Some(user("pat@example.com")),
        }
    }

    /// Provider answering from fixed results and counting calls.
    #[derive(Default)]
    pub struct FakeProvider {
        pub user: Mutex<Option<Result<AuthUser, AuthApiError>>>,
        pub refresh: Mutex<Option<Result<Session, AuthApiError>>>,
        pub exchange: Mutex<Option<Result<Session, AuthApiError>>>,
        pub get_user_calls: AtomicUsize,
        pub refresh_calls: AtomicUsize,
        pub sign_out_calls: AtomicUsize,
    }

    impl FakeProvider {
        pub fn with_user(result: Result<AuthUser, AuthApiError>) -> Self {
            let provider = Self::default();
            *provider.user.lock().unwrap() = Some(result);
            provider
        }
    }

    #[async_trait]
    impl AuthProvider for FakeProvider {
        async fn get_user(&self, _access_token: &str) -> Result<AuthUser, AuthApiError> {
            self.get_user_calls.fetch_add(1, Ordering::SeqCst);
            self.user
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Err(AuthApiError::new("no user configured", None, Some(500))))
        }

        async fn refresh_session(&self, _refresh_token: &str) -> Result<Session, AuthApiError> {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            self.refresh
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Err(AuthApiError::new("Invalid Refresh Token", None, Some(400))))
        }

        async fn exchange_code_for_session(
            &self,
            _auth_code: &str,
            _code_verifier: &str,
        ) -> Result<Session, AuthApiError> {
            self.exchange
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Err(AuthApiError::new("invalid flow state", None, Some(404))))
        }

        async fn sign_out(&self, _access_token: &str) -> Result<(), AuthApiError> {
            self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }
}
