use std::fmt;

use serde::{Deserialize, Serialize};

use super::game::Game;
use super::null_as_empty;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Season {
    pub id: String,
    pub year: i32,
    pub is_active: bool,
    #[serde(default)]
    pub is_postseason: bool,
    pub number_of_weeks: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weeks: Option<Vec<Week>>,
}

impl Season {
    /// "2025" or "2025 Postseason"
    pub fn display_name(&self) -> String {
        if self.is_postseason {
            format!("{} Postseason", self.year)
        } else {
            self.year.to_string()
        }
    }
}

/// Lifecycle of a week, in the order the commissioner advances it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum WeekStatus {
    Draft,
    GamesImported,
    SpreadsSet,
    Active,
    Played,
    PicksResultsCalculated,
    Scored,
    Final,
}

impl WeekStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WeekStatus::Draft => "draft",
            WeekStatus::GamesImported => "games_imported",
            WeekStatus::SpreadsSet => "spreads_set",
            WeekStatus::Active => "active",
            WeekStatus::Played => "played",
            WeekStatus::PicksResultsCalculated => "picks_results_calculated",
            WeekStatus::Scored => "scored",
            WeekStatus::Final => "final",
        }
    }

    /// Status the week moves to when the season is advanced, if any.
    pub fn next(self) -> Option<WeekStatus> {
        match self {
            WeekStatus::Draft => Some(WeekStatus::GamesImported),
            WeekStatus::GamesImported => Some(WeekStatus::SpreadsSet),
            WeekStatus::SpreadsSet => Some(WeekStatus::Active),
            WeekStatus::Active => Some(WeekStatus::Played),
            WeekStatus::Played => Some(WeekStatus::PicksResultsCalculated),
            WeekStatus::PicksResultsCalculated => Some(WeekStatus::Scored),
            WeekStatus::Scored => Some(WeekStatus::Final),
            WeekStatus::Final => None,
        }
    }

    pub fn accepts_picks(self) -> bool {
        self == WeekStatus::Active
    }

    /// Results exist once picks have been graded.
    pub fn has_results(self) -> bool {
        self >= WeekStatus::PicksResultsCalculated
    }
}

impl fmt::Display for WeekStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Week {
    pub id: String,
    pub season_id: String,
    pub number: i32,
    pub status: WeekStatus,
    #[serde(default)]
    pub activated_at: Option<String>,
    #[serde(default)]
    pub closed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_postseason: Option<bool>,
    // `null` when the week has no games
    #[serde(default, deserialize_with = "null_as_empty")]
    pub games: Vec<Game>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ActiveSeason {
    pub id: String,
    pub year: i32,
    #[serde(default)]
    pub is_postseason: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ActiveWeek {
    pub id: String,
    pub number: i32,
}

/// A user enrolled in a season, with the avatar already resolved to a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Participant {
    pub user_id: String,
    pub username: Option<String>,
    pub avatar_url: String,
    pub joined_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_status_wire_names() {
        let status: WeekStatus = serde_json::from_str("\"picks_results_calculated\"").unwrap();
        assert_eq!(status, WeekStatus::PicksResultsCalculated);
        assert_eq!(serde_json::to_string(&WeekStatus::GamesImported).unwrap(), "\"games_imported\"");
        assert_eq!(WeekStatus::SpreadsSet.to_string(), "spreads_set");
    }

    #[test]
    fn test_week_status_progression() {
        let mut status = WeekStatus::Draft;
        let mut steps = 0;
        while let Some(next) = status.next() {
            assert!(next > status);
            status = next;
            steps += 1;
        }
        assert_eq!(status, WeekStatus::Final);
        assert_eq!(steps, 7);
        assert!(WeekStatus::Active.accepts_picks());
        assert!(!WeekStatus::Played.accepts_picks());
        assert!(WeekStatus::Scored.has_results());
        assert!(!WeekStatus::Played.has_results());
    }

    #[test]
    fn test_week_with_null_games() {
        let json = r#"{
            "id": "01JD0W", "season_id": "01JD0S", "number": 3, "status": "active",
            "activated_at": "2025-09-18T12:00:00Z", "closed_at": null,
            "created_at": "2025-09-01T00:00:00Z", "updated_at": "2025-09-18T12:00:00Z",
            "created_by": "7c1a", "games": null
        }"#;
        let week: Week = serde_json::from_str(json).unwrap();
        assert_eq!(week.status, WeekStatus::Active);
        assert!(week.games.is_empty());
        assert_eq!(week.year, None);
    }

    #[test]
    fn test_season_display_name() {
        let mut season = Season {
            id: "01JD0S".to_string(),
            year: 2025,
            is_active: true,
            is_postseason: false,
            number_of_weeks: 18,
            weeks: None,
        };
        assert_eq!(season.display_name(), "2025");
        season.is_postseason = true;
        assert_eq!(season.display_name(), "2025 Postseason");
    }
}
