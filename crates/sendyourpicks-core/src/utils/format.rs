//! Display formatting for dates, teams and avatars.
//!
//! Timestamps come from the backend as RFC 3339 strings and are rendered in
//! UTC. Input that does not parse is returned unchanged.

use chrono::{DateTime, Utc};

pub const DEFAULT_AVATAR: &str = "/images/avatars/default-avatar.jpg";

fn parse(date: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn format_with(date: &str, pattern: &str) -> String {
    match parse(date) {
        Some(dt) => dt.format(pattern).to_string(),
        None => date.to_string(),
    }
}

/// "Jan 5, 2025"
pub fn format_short_date(date: &str) -> String {
    format_with(date, "%b %-d, %Y")
}

/// "Sun, Jan 5"
pub fn format_weekday_date(date: &str) -> String {
    format_with(date, "%a, %b %-d")
}

/// "Sun, Jan 5, 3:00 PM"
pub fn format_weekday_date_time(date: &str) -> String {
    format_with(date, "%a, %b %-d, %-I:%M %p")
}

/// "Jan 5, 2025, 3:00 PM"
pub fn format_date_time(date: &str) -> String {
    format_with(date, "%b %-d, %Y, %-I:%M %p")
}

/// "3:00 PM"
pub fn format_time(date: &str) -> String {
    format_with(date, "%-I:%M %p")
}

/// "1/5/2025, 3:00:00 PM", or "Never" for users who have not signed in.
pub fn format_last_sign_in(timestamp: Option<&str>) -> String {
    match timestamp {
        Some(ts) if !ts.is_empty() => format_with(ts, "%-m/%-d/%Y, %-I:%M:%S %p"),
        _ => "Never".to_string(),
    }
}

/// "Kansas City Chiefs"
pub fn full_team_name(city: &str, name: &str) -> String {
    format!("{} {}", city, name)
}

/// Uppercased first character of the username, or "?".
pub fn avatar_initial(username: Option<&str>) -> String {
    username
        .and_then(|name| name.chars().next())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}
