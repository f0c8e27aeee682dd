//! Unverified access-token inspection.
//!
//! Nothing here checks signatures. Identity is only trusted after the auth
//! provider has validated the token; these helpers read the role claim for
//! route guards and build redacted summaries for diagnostics.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use super::role::Role;

/// Number of subject characters kept in debug summaries.
const SUBJECT_PREFIX_CHARS: usize = 8;

/// Accepts padded and unpadded input; standard-alphabet characters are
/// mapped onto the URL-safe alphabet before decoding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Claims read from a token payload without verification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenClaims {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub iat: Option<i64>,
    pub exp: Option<i64>,
    pub role: Option<String>,
    pub user_role: Option<String>,
}

impl TokenClaims {
    fn from_value(payload: &Value) -> Self {
        let text = |key: &str| {
            payload
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        // Zero counts as absent, like a missing claim
        let seconds = |key: &str| {
            payload
                .get(key)
                .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
                .filter(|s| *s != 0)
        };

        Self {
            sub: text("sub"),
            email: text("email"),
            iat: seconds("iat"),
            exp: seconds("exp"),
            role: text("role"),
            user_role: text("user_role"),
        }
    }

    /// `user_role` if set, otherwise `role`.
    pub fn role_claim(&self) -> Option<&str> {
        self.user_role.as_deref().or(self.role.as_deref())
    }

    pub fn role(&self) -> Option<Role> {
        self.role_claim().map(Role::from)
    }
}

/// Decode one base64 token segment.
pub fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let normalized: String = segment
        .trim()
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    PAYLOAD_ENGINE.decode(normalized.as_bytes()).ok()
}

fn decode_payload(token: &str) -> Result<Value, String> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| "Token has no payload segment".to_string())?;
    let bytes = decode_segment(payload).ok_or_else(|| "Invalid base64 payload".to_string())?;
    serde_json::from_slice(&bytes).map_err(|e| e.to_string())
}

/// Read the payload claims of a token. Returns `None` on any decoding
/// failure; never panics.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    decode_payload(token).ok().map(|v| TokenClaims::from_value(&v))
}

/// Role claim of an optional token, for route guards.
pub fn role_from_token(token: Option<&str>) -> Option<Role> {
    decode_claims(token?)?.role()
}

/// Redacted token summary attached to auth failure records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JwtDebugInfo {
    Claims(JwtClaimsSummary),
    Malformed { error: &'static str, parts: usize },
    Unparseable { error: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JwtClaimsSummary {
    pub issued_at: Option<String>,
    pub expires_at: Option<String>,
    pub current_time: String,
    pub seconds_until_expiry: Option<i64>,
    pub seconds_since_issued: Option<i64>,
    pub is_expired: Option<bool>,
    pub issued_in_future: Option<bool>,
    pub user_role: Option<String>,
    pub sub: Option<String>,
}

fn iso_seconds(secs: i64) -> Option<String> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// At most the first eight characters of the subject, always followed by
/// `...`.
pub fn truncate_subject(sub: &str) -> String {
    let prefix: String = sub.chars().take(SUBJECT_PREFIX_CHARS).collect();
    format!("{}...", prefix)
}

/// Summarize a token's timing and identity claims without exposing it.
pub fn jwt_debug_info(token: Option<&str>, now: DateTime<Utc>) -> Option<JwtDebugInfo> {
    let token = token.filter(|t| !t.is_empty())?;

    let parts = token.split('.').count();
    if parts != 3 {
        return Some(JwtDebugInfo::Malformed {
            error: "Invalid JWT format",
            parts,
        });
    }

    let payload = match decode_payload(token) {
        Ok(payload) => payload,
        Err(message) => {
            return Some(JwtDebugInfo::Unparseable {
                error: "Failed to parse JWT",
                message,
            })
        }
    };
    let claims = TokenClaims::from_value(&payload);
    let now_secs = now.timestamp();

    Some(JwtDebugInfo::Claims(JwtClaimsSummary {
        issued_at: claims.iat.and_then(iso_seconds),
        expires_at: claims.exp.and_then(iso_seconds),
        current_time: iso_seconds(now_secs).unwrap_or_default(),
        seconds_until_expiry: claims.exp.and_then(|exp| exp.checked_sub(now_secs)),
        seconds_since_issued: claims.iat.and_then(|iat| now_secs.checked_sub(iat)),
        is_expired: claims.exp.map(|exp| now_secs > exp),
        issued_in_future: claims.iat.map(|iat| iat > now_secs),
        user_role: claims.role_claim().map(str::to_string),
        sub: claims.sub.as_deref().map(truncate_subject),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
    use chrono::TimeZone;
    use serde_json::json;

    fn token_with(payload: Value) -> String {
        format!(
            "eyJhbGciOiJFUzI1NiJ9.{}.c2lnbmF0dXJl",
            URL_SAFE_NO_PAD.encode(payload.to_string())
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 12, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_user_role_preferred_over_role() {
        let token = token_with(json!({"role": "authenticated", "user_role": "commissioner"}));
        assert_eq!(role_from_token(Some(&token)), Some(Role::Commissioner));

        let token = token_with(json!({"role": "admin"}));
        assert_eq!(role_from_token(Some(&token)), Some(Role::Admin));

        let token = token_with(json!({"role": "", "user_role": ""}));
        assert_eq!(role_from_token(Some(&token)), None);
    }

    #[test]
    fn test_standard_and_url_safe_payloads_agree() {
        // '?' and '>' push the encoding into the alphabet-specific characters
        let payload = json!({"sub": "a>b?c>>??", "user_role": "admin"}).to_string();
        let url_safe = format!("h.{}.s", URL_SAFE_NO_PAD.encode(&payload));
        let standard = format!("h.{}.s", STANDARD.encode(&payload));
        assert_ne!(url_safe, standard);
        assert_eq!(decode_claims(&url_safe), decode_claims(&standard));
        assert_eq!(decode_claims(&standard).unwrap().sub.as_deref(), Some("a>b?c>>??"));
    }

    #[test]
    fn test_garbage_tokens_decode_to_none() {
        assert_eq!(role_from_token(None), None);
        assert_eq!(role_from_token(Some("")), None);
        assert_eq!(role_from_token(Some("no-dots")), None);
        assert_eq!(role_from_token(Some("a.!!!notbase64!!!.c")), None);
        let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode("not json"));
        assert_eq!(role_from_token(Some(&not_json)), None);
    }

    #[test]
    fn test_debug_info_expired_token() {
        let exp = now().timestamp() - 100;
        let token = token_with(json!({"exp": exp, "iat": exp - 3600, "sub": "d3b07384-d9a0-4c9b"}));
        let Some(JwtDebugInfo::Claims(info)) = jwt_debug_info(Some(&token), now()) else {
            panic!("expected claims summary");
        };
        assert_eq!(info.is_expired, Some(true));
        assert_eq!(info.seconds_until_expiry, Some(-100));
        assert_eq!(info.seconds_since_issued, Some(3700));
        assert_eq!(info.issued_in_future, Some(false));
        assert_eq!(info.current_time, "2025-10-12T18:00:00.000Z");
        assert_eq!(info.expires_at.as_deref(), Some("2025-10-12T17:58:20.000Z"));
    }

    #[test]
    fn test_debug_info_issued_in_future() {
        let token = token_with(json!({"iat": now().timestamp() + 50}));
        let Some(JwtDebugInfo::Claims(info)) = jwt_debug_info(Some(&token), now()) else {
            panic!("expected claims summary");
        };
        assert_eq!(info.issued_in_future, Some(true));
        assert_eq!(info.expires_at, None);
        assert_eq!(info.is_expired, None);
    }

    #[test]
    fn test_debug_info_truncates_subject() {
        let token = token_with(json!({"sub": "d3b07384-d9a0-4c9b-8f4e-2a2f3b1c9e7a"}));
        let Some(JwtDebugInfo::Claims(info)) = jwt_debug_info(Some(&token), now()) else {
            panic!("expected claims summary");
        };
        assert_eq!(info.sub.as_deref(), Some("d3b07384..."));

        assert_eq!(truncate_subject("abc"), "abc...");
        assert_eq!(truncate_subject(""), "...");
        assert!(truncate_subject("0123456789").trim_end_matches("...").chars().count() <= 8);
    }

    #[test]
    fn test_debug_info_malformed_shapes() {
        assert_eq!(jwt_debug_info(None, now()), None);
        assert_eq!(
            jwt_debug_info(Some("a.b"), now()),
            Some(JwtDebugInfo::Malformed {
                error: "Invalid JWT format",
                parts: 2
            })
        );
        let info = jwt_debug_info(Some("a.%%%.c"), now());
        assert!(matches!(
            info,
            Some(JwtDebugInfo::Unparseable {
                error: "Failed to parse JWT",
                ..
            })
        ));
    }

    #[test]
    fn test_debug_info_extreme_timestamps() {
        let token = token_with(json!({"iat": i64::MIN, "exp": i64::MIN}));
        let Some(JwtDebugInfo::Claims(summary)) = jwt_debug_info(Some(&token), now()) else {
            panic!("expected claims summary");
        };
        assert_eq!(summary.seconds_until_expiry, None);
        assert_eq!(summary.seconds_since_issued, None);
        assert_eq!(summary.issued_at, None);
        assert_eq!(summary.is_expired, Some(true));

        let token = token_with(json!({"iat": i64::MAX, "exp": 1e300}));
        let Some(JwtDebugInfo::Claims(summary)) = jwt_debug_info(Some(&token), now()) else {
            panic!("expected claims summary");
        };
        assert_eq!(summary.expires_at, None);
        assert_eq!(summary.issued_in_future, Some(true));
        assert!(summary.seconds_until_expiry.is_some_and(|s| s > 0));
        assert!(summary.seconds_since_issued.is_some_and(|s| s < 0));
    }

    #[test]
    fn test_debug_info_serializes_flat() {
        let value = serde_json::to_value(jwt_debug_info(Some("x"), now())).unwrap();
        assert_eq!(value, json!({"error": "Invalid JWT format", "parts": 1}));
    }
}
