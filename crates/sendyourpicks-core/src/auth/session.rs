use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Refresh a session this many seconds before it actually expires.
const REFRESH_MARGIN_SECS: i64 = 90;

fn default_token_type() -> String {
    "bearer".to_string()
}

/// User object returned by the provider's verified user lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub aud: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub app_metadata: Value,
    #[serde(default)]
    pub user_metadata: Value,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_sign_in_at: Option<String>,
}

/// Provider-issued session: access/refresh token pair plus expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

impl Session {
    /// Fill in `expires_at` from `expires_in` when the provider only sent
    /// the relative value.
    pub fn with_expiry_from(mut self, issued: DateTime<Utc>) -> Self {
        if self.expires_at.is_none() {
            if let Some(expires_in) = self.expires_in {
                self.expires_at = Some(issued.timestamp() + expires_in);
            }
        }
        self
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map(|exp| now > exp).unwrap_or(false)
    }

    /// Check if the session will expire soon and should be refreshed
    pub fn needs_refresh_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at()
            .map(|exp| exp - now < Duration::seconds(REFRESH_MARGIN_SECS))
            .unwrap_or(false)
    }

    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at().map(|exp| exp - now)
    }

    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.email.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session(expires_at: Option<i64>) -> Session {
        Session {
            access_token: "a.b.c".to_string(),
            refresh_token: "r1".to_string(),
            expires_in: Some(3600),
            expires_at,
            token_type: "bearer".to_string(),
            user: None,
        }
    }

    #[test]
    fn test_needs_refresh_inside_margin() {
        let now = Utc.with_ymd_and_hms(2025, 9, 14, 12, 0, 0).unwrap();
        assert!(!session(Some(now.timestamp() + 3600)).needs_refresh_at(now));
        assert!(session(Some(now.timestamp() + 60)).needs_refresh_at(now));
        assert!(session(Some(now.timestamp() - 5)).needs_refresh_at(now));
        assert!(!session(None).needs_refresh_at(now));
    }

    #[test]
    fn test_is_expired_at() {
        let now = Utc.with_ymd_and_hms(2025, 9, 14, 12, 0, 0).unwrap();
        assert!(session(Some(now.timestamp() - 1)).is_expired_at(now));
        assert!(!session(Some(now.timestamp() + 60)).is_expired_at(now));
        assert_eq!(
            session(Some(now.timestamp() + 60)).time_until_expiry(now),
            Some(Duration::seconds(60))
        );
    }

    #[test]
    fn test_expiry_from_expires_in() {
        let issued = Utc.with_ymd_and_hms(2025, 9, 14, 12, 0, 0).unwrap();
        let s = session(None).with_expiry_from(issued);
        assert_eq!(s.expires_at, Some(issued.timestamp() + 3600));

        let kept = session(Some(42)).with_expiry_from(issued);
        assert_eq!(kept.expires_at, Some(42));
    }

    #[test]
    fn test_parse_provider_session() {
        let json = r#"{"access_token":"eyJ.x.y","token_type":"bearer","expires_in":3600,"expires_at":1757851200,"refresh_token":"kq3xv","user":{"id":"7c1a","aud":"authenticated","role":"authenticated","email":"pat@example.com","app_metadata":{"provider":"email"},"user_metadata":{},"created_at":"2025-08-01T00:00:00Z"}}"#;
        let s: Session = serde_json::from_str(json).unwrap();
        assert_eq!(s.email(), Some("pat@example.com"));
        assert_eq!(s.expires_at, Some(1757851200));
        assert_eq!(s.user.unwrap().app_metadata["provider"], "email");
    }
}
