//! Utility functions for display formatting.

pub mod format;

pub use format::{
    avatar_initial, format_date_time, format_last_sign_in, format_short_date, format_time,
    format_weekday_date, format_weekday_date_time, full_team_name, DEFAULT_AVATAR,
};
