use thiserror::Error;

use crate::logging::AuthEvent;

/// Message the auth client reports when there is no session to validate.
pub const SESSION_MISSING_MESSAGE: &str = "Auth session missing!";

/// Failure reported by the auth provider (or by the auth client before it
/// reached the provider).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AuthApiError {
    pub message: String,
    /// Provider error code, e.g. `bad_jwt` or `session_not_found`.
    pub code: Option<String>,
    pub status: Option<u16>,
}

impl AuthApiError {
    pub fn new(message: impl Into<String>, code: Option<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            code,
            status,
        }
    }

    pub fn session_missing() -> Self {
        Self::new(SESSION_MISSING_MESSAGE, None, Some(400))
    }

    /// Transport-level failure talking to the provider.
    pub fn transport(err: reqwest::Error) -> Self {
        Self::new(err.to_string(), None, err.status().map(|s| s.as_u16()))
    }

    pub fn classify(&self) -> AuthFailureKind {
        AuthFailureKind::from_message(&self.message)
    }
}

/// Best-effort classification of a failed validation from its free-text
/// message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureKind {
    JwtError,
    SessionExpired,
    SessionInvalid,
}

impl AuthFailureKind {
    /// Case-insensitive: `expired` wins over `invalid`, anything else is a
    /// generic JWT error.
    pub fn from_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("expired") {
            AuthFailureKind::SessionExpired
        } else if lower.contains("invalid") {
            AuthFailureKind::SessionInvalid
        } else {
            AuthFailureKind::JwtError
        }
    }

    pub fn event(self) -> AuthEvent {
        match self {
            AuthFailureKind::JwtError => AuthEvent::JwtError,
            AuthFailureKind::SessionExpired => AuthEvent::SessionExpired,
            AuthFailureKind::SessionInvalid => AuthEvent::SessionInvalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_expired() {
        assert_eq!(
            AuthFailureKind::from_message("invalid JWT: unable to parse or verify signature, token has invalid claims: token is expired"),
            AuthFailureKind::SessionExpired
        );
        assert_eq!(AuthFailureKind::from_message("Token EXPIRED"), AuthFailureKind::SessionExpired);
    }

    #[test]
    fn test_classify_invalid() {
        assert_eq!(
            AuthFailureKind::from_message("Invalid Refresh Token: Already Used"),
            AuthFailureKind::SessionInvalid
        );
        assert_eq!(AuthFailureKind::from_message("invalid claim: missing sub claim"), AuthFailureKind::SessionInvalid);
    }

    #[test]
    fn test_classify_fallback() {
        assert_eq!(
            AuthFailureKind::from_message("Session from session_id claim in JWT does not exist"),
            AuthFailureKind::JwtError
        );
        assert_eq!(AuthFailureKind::from_message(""), AuthFailureKind::JwtError);
    }

    #[test]
    fn test_kind_to_event() {
        assert_eq!(AuthFailureKind::SessionExpired.event(), AuthEvent::SessionExpired);
        assert_eq!(AuthFailureKind::SessionInvalid.event(), AuthEvent::SessionInvalid);
        assert_eq!(AuthFailureKind::JwtError.event(), AuthEvent::JwtError);
    }

    #[test]
    fn test_session_missing() {
        let err = AuthApiError::session_missing();
        assert_eq!(err.to_string(), "Auth session missing!");
        assert_eq!(err.status, Some(400));
        assert_eq!(err.classify(), AuthFailureKind::JwtError);
    }
}
