use thiserror::Error;

/// Message used when a failed response carries no `{error}` body.
pub const REQUEST_FAILED: &str = "Request failed";

#[derive(Error, Debug)]
pub enum ApiError {
    /// Backend answered with a non-2xx status.
    #[error("{message}")]
    Response { message: String, status: u16 },

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Response { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidResponse(_) => None,
        }
    }

    /// Build a response error from a failed body, falling back to
    /// [`REQUEST_FAILED`] when the body has no usable `error` field.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| match v.get("error") {
                Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
                _ => None,
            })
            .unwrap_or_else(|| REQUEST_FAILED.to_string());
        ApiError::Response { message, status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body_uses_error_field() {
        let err = ApiError::from_body(404, r#"{"error":"Week not found"}"#);
        assert_eq!(err.to_string(), "Week not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_from_body_fallback() {
        for body in ["<html>bad gateway</html>", "", "{}", r#"{"error":""}"#, r#"{"error":42}"#] {
            let err = ApiError::from_body(502, body);
            assert_eq!(err.to_string(), "Request failed");
            assert_eq!(err.status(), Some(502));
        }
    }

    #[test]
    fn test_invalid_response_has_no_status() {
        let err = ApiError::InvalidResponse("expected value at line 1".to_string());
        assert_eq!(err.status(), None);
        assert!(err.to_string().starts_with("Invalid response"));
    }
}
