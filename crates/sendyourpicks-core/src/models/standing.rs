use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Standing {
    pub user_id: String,
    pub username: String,
    pub points: i32,
    pub rank: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_users: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_id: Option<String>,
}

/// The signed-in user's standing. `rank` is absent before any week is scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MyStanding {
    pub user_id: String,
    pub username: String,
    pub points: i32,
    pub rank: Option<i32>,
    pub total_users: i32,
    pub season_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WeekResult {
    pub id: String,
    pub user_id: String,
    pub points: i32,
    pub rank: i32,
    pub username: String,
}

/// A user's week-by-week line in `GET /seasons/:id/points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WeekPoints {
    pub week_number: i32,
    pub week_points: i32,
    pub week_rank: i32,
    pub total_points: i32,
    pub league_rank: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WeekWinner {
    pub user_id: String,
    pub username: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WeekWinnersData {
    pub week_id: String,
    pub week_number: i32,
    pub points: i32,
    pub winners: Vec<WeekWinner>,
    pub is_tie: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserWinCount {
    pub user_id: String,
    pub username: String,
    pub avatar_url: String,
    /// Outright wins.
    pub wins: i32,
    /// Weeks shared at the top.
    pub ties: i32,
}

impl UserWinCount {
    pub fn total(&self) -> i32 {
        self.wins + self.ties
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StandingsHistoryEntry {
    pub user_id: String,
    pub username: String,
    pub week_id: String,
    pub points: i32,
    pub rank: i32,
    pub computed_at: String,
}

/// One line of the standings chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<i32>,
    pub border_color: String,
    pub background_color: String,
    pub tension: f64,
    pub fill: bool,
    pub border_width: u32,
    pub point_radius: u32,
    pub point_hover_radius: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum BadgeType {
    PreviousWeekWinner,
    PreviousSeasonWinner,
    PreviousSeasonLoser,
}

impl fmt::Display for BadgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadgeType::PreviousWeekWinner => write!(f, "previous_week_winner"),
            BadgeType::PreviousSeasonWinner => write!(f, "previous_season_winner"),
            BadgeType::PreviousSeasonLoser => write!(f, "previous_season_loser"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Badge {
    #[serde(rename = "type")]
    pub badge_type: BadgeType,
    pub label: String,
}
