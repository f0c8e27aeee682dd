use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Event-name fragments that route a record to the error stream.
const ERROR_MARKERS: [&str; 4] = ["ERROR", "FAILURE", "INVALID", "EXPIRED"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Level implied by an event name.
    ///
    /// `Warn` is never derived from a name; callers that want it must ask
    /// for it explicitly through [`crate::logging::Logger::log`].
    pub fn for_event(event: &str) -> Self {
        if ERROR_MARKERS.iter().any(|marker| event.contains(marker)) {
            LogLevel::Error
        } else {
            LogLevel::Info
        }
    }
}

/// Log domain, rendered as the leading `[CATEGORY]` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Auth,
    Api,
    Picks,
    Week,
    User,
    Data,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Auth => "AUTH",
            Category::Api => "API",
            Category::Picks => "PICKS",
            Category::Week => "WEEK",
            Category::User => "USER",
            Category::Data => "DATA",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered key/value detail mapping attached to a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Details(Map<String, Value>);

impl Details {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds the pair only when `value` is present.
    pub fn with_opt<V: Into<Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// `key="text" key={json} key=42` with strings quoted, objects, arrays
    /// and null as JSON, numbers and booleans bare.
    fn render_inline(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| match value {
                Value::String(text) => format!("{}=\"{}\"", key, text),
                Value::Number(n) => format!("{}={}", key, n),
                Value::Bool(b) => format!("{}={}", key, b),
                other => format!("{}={}", key, other),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn render_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

impl From<Map<String, Value>> for Details {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A single diagnostic record. Built, emitted once, then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub category: Category,
    pub event: String,
    pub level: LogLevel,
    pub email: Option<String>,
    pub error: Option<String>,
    pub details: Details,
}

impl LogRecord {
    pub fn new(category: Category, event: &str, level: LogLevel, details: Details) -> Self {
        Self {
            timestamp: Utc::now(),
            category,
            event: event.to_string(),
            level,
            email: None,
            error: None,
            details,
        }
    }

    /// Render the record as one log line.
    ///
    /// Auth records keep their own layout: `email=`, `error="..."` and a
    /// single `details=<json>` segment. Every other category inlines its
    /// details as key/value pairs.
    pub fn render(&self) -> String {
        let mut parts = vec![
            format!("[{}]", self.category),
            format!("[{}]", self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
            format!("[{}]", self.event),
        ];

        if self.category == Category::Auth {
            if let Some(ref email) = self.email {
                parts.push(format!("email={}", email));
            }
            if let Some(ref error) = self.error {
                parts.push(format!("error=\"{}\"", error));
            }
            if !self.details.is_empty() {
                parts.push(format!("details={}", self.details.render_json()));
            }
        } else if !self.details.is_empty() {
            parts.push(self.details.render_inline());
        }

        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed(category: Category, event: &str, details: Details) -> LogRecord {
        let mut record = LogRecord::new(category, event, LogLevel::for_event(event), details);
        record.timestamp = Utc.with_ymd_and_hms(2025, 9, 7, 17, 30, 5).unwrap();
        record
    }

    #[test]
    fn test_level_for_event() {
        assert_eq!(LogLevel::for_event("RESPONSE_ERROR"), LogLevel::Error);
        assert_eq!(LogLevel::for_event("SUBMIT_FAILURE"), LogLevel::Error);
        assert_eq!(LogLevel::for_event("SESSION_INVALID"), LogLevel::Error);
        assert_eq!(LogLevel::for_event("SESSION_EXPIRED"), LogLevel::Error);
        assert_eq!(LogLevel::for_event("RESPONSE_SUCCESS"), LogLevel::Info);
        assert_eq!(LogLevel::for_event("PAGE_LOAD"), LogLevel::Info);
        // Markers are case-sensitive, matching the upper-case event names
        assert_eq!(LogLevel::for_event("error"), LogLevel::Info);
    }

    #[test]
    fn test_render_inline_details() {
        let details = Details::new()
            .with("method", "GET")
            .with("endpoint", "/weeks/1")
            .with("status", 200)
            .with("cached", false)
            .with("extra", json!({"a": 1}))
            .with("missing", Value::Null);
        let line = fixed(Category::Api, "RESPONSE_SUCCESS", details).render();
        assert_eq!(
            line,
            "[API] [2025-09-07T17:30:05.000Z] [RESPONSE_SUCCESS] method=\"GET\" endpoint=\"/weeks/1\" status=200 cached=false extra={\"a\":1} missing=null"
        );
    }

    #[test]
    fn test_render_without_details() {
        let line = fixed(Category::Picks, "PAGE_LOAD", Details::new()).render();
        assert_eq!(line, "[PICKS] [2025-09-07T17:30:05.000Z] [PAGE_LOAD]");
    }

    #[test]
    fn test_render_auth_layout() {
        let mut record = fixed(
            Category::Auth,
            "SESSION_EXPIRED",
            Details::new().with("path", "/dashboard"),
        );
        record.email = Some("pat@example.com".to_string());
        record.error = Some("token is expired".to_string());
        assert_eq!(
            record.render(),
            "[AUTH] [2025-09-07T17:30:05.000Z] [SESSION_EXPIRED] email=pat@example.com error=\"token is expired\" details={\"path\":\"/dashboard\"}"
        );
    }

    #[test]
    fn test_render_auth_empty_details_has_no_details_segment() {
        let mut record = fixed(Category::Auth, "LOGOUT", Details::new());
        record.email = Some("pat@example.com".to_string());
        let line = record.render();
        assert!(!line.contains("details="));
        assert!(line.ends_with("email=pat@example.com"));
    }

    #[test]
    fn test_details_with_opt_skips_none() {
        let details = Details::new()
            .with_opt("status", None::<u16>)
            .with_opt("error", Some("boom"));
        assert_eq!(details.len(), 1);
        assert_eq!(details.get("error"), Some(&json!("boom")));
    }
}
