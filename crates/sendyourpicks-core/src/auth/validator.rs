use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use super::client::AuthClient;
use super::role::Role;
use super::session::{AuthUser, Session};
use super::token::{jwt_debug_info, role_from_token};
use crate::logging::{AuthDetails, Details};

/// Outcome of validating the request's session. Both halves are present or
/// both are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedSession {
    pub session: Option<Session>,
    pub user: Option<AuthUser>,
}

impl ValidatedSession {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some() && self.user.is_some()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.access_token.as_str())
    }

    /// Role claim decoded from the access token.
    ///
    /// The claim is read without signature verification. Authenticity was
    /// established by the provider round-trip; the role itself is advisory
    /// and the backend re-checks it on every privileged call.
    pub fn role(&self) -> Option<Role> {
        role_from_token(self.access_token())
    }
}

/// Validate the session behind the current request.
///
/// The stored session is only used for diagnostics; identity comes from the
/// provider's verified user lookup. Failures never propagate: they collapse
/// into an anonymous result. A failure with no access token present is an
/// ordinary anonymous visit and is not logged; any other failure is
/// classified from its message and logged with a redacted token summary.
pub async fn validate_session(client: &mut AuthClient, path: &str) -> ValidatedSession {
    let raw_session = client.get_session().await.ok().flatten();

    let user = match client.get_user().await {
        Ok(user) => user,
        Err(error) => {
            if let Some(raw) = raw_session.as_ref().filter(|s| !s.access_token.is_empty()) {
                let now = Utc::now();
                let jwt = jwt_debug_info(Some(&raw.access_token), now)
                    .and_then(|info| serde_json::to_value(info).ok())
                    .unwrap_or(Value::Null);

                client.logger().auth(
                    error.classify().event(),
                    AuthDetails {
                        email: raw.email().map(str::to_string),
                        error: Some(error.message.clone()),
                        details: Details::new()
                            .with("path", path)
                            .with_opt("errorCode", error.code.clone())
                            .with_opt("errorStatus", error.status)
                            .with("jwt", jwt)
                            .with("serverTime", now.to_rfc3339_opts(SecondsFormat::Millis, true)),
                    },
                );
            }
            return ValidatedSession::anonymous();
        }
    };

    let session = client.get_session().await.ok().flatten();
    match session {
        Some(session) => ValidatedSession {
            session: Some(session),
            user: Some(user),
        },
        None => ValidatedSession::anonymous(),
    }
}
