use serde::{Deserialize, Serialize};

/// League-wide settings shared by every season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Settings {
    pub id: String,
    /// Minutes before kickoff at which picks close.
    pub pick_cutoff_minutes: i32,
    pub allow_pick_edits: bool,
    pub points_per_correct_pick: i32,
    /// IANA zone name, e.g. `America/New_York`.
    pub competition_timezone: String,
    pub allow_commissioner_overrides: bool,
    #[serde(default)]
    pub allow_picks_after_kickoff: bool,
    #[serde(default)]
    pub debug_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}
