use serde::{Deserialize, Serialize};

use crate::utils::format::full_team_name;

/// Which side of a game a pick or spread refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Game {
    pub id: String,
    #[serde(default)]
    pub external_game_id: String,
    pub season_id: String,
    pub week_id: String,
    pub home_team_id: String,
    pub away_team_id: String,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub home_spread: Option<f64>,
    pub kickoff_time: String,
    pub status: String,
    #[serde(default)]
    pub neutral_site: bool,
    pub created_at: String,
    pub updated_at: String,
    pub created_by: String,
    // Team fields are joined in by some queries only
    #[serde(default)]
    pub home_team_name: String,
    #[serde(default)]
    pub home_team_city: String,
    #[serde(default)]
    pub home_team_abbr: String,
    #[serde(default)]
    pub home_team_logo_url: String,
    #[serde(default)]
    pub away_team_name: String,
    #[serde(default)]
    pub away_team_city: String,
    #[serde(default)]
    pub away_team_abbr: String,
    #[serde(default)]
    pub away_team_logo_url: String,
}

impl Game {
    pub fn home_team_full_name(&self) -> String {
        full_team_name(&self.home_team_city, &self.home_team_name)
    }

    pub fn away_team_full_name(&self) -> String {
        full_team_name(&self.away_team_city, &self.away_team_name)
    }

    pub fn team_side(&self, team_id: &str) -> Option<Side> {
        if team_id == self.home_team_id {
            Some(Side::Home)
        } else if team_id == self.away_team_id {
            Some(Side::Away)
        } else {
            None
        }
    }

    /// Spread from the away team's point of view.
    pub fn away_spread(&self) -> Option<f64> {
        self.home_spread.map(|s| -s)
    }

    /// Winner against the spread, once both scores are in. `None` for a push
    /// or an unplayed game.
    pub fn cover_winner(&self) -> Option<Side> {
        let (home, away) = (self.home_score?, self.away_score?);
        let margin = f64::from(home) + self.home_spread.unwrap_or(0.0) - f64::from(away);
        if margin > 0.0 {
            Some(Side::Home)
        } else if margin < 0.0 {
            Some(Side::Away)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Team {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub city: String,
    pub is_active: bool,
    pub logo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Team {
    pub fn full_name(&self) -> String {
        full_team_name(&self.city, &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Pick {
    pub id: String,
    pub user_id: String,
    pub week_id: String,
    pub game_id: String,
    pub selected_team_id: Option<String>,
    pub is_correct: Option<bool>,
    pub calculated_at: Option<String>,
    pub user_locked_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Pick {
    pub fn is_locked(&self) -> bool {
        self.user_locked_at.is_some()
    }
}

/// One entry of a `PUT /weeks/:id/picks` body. A `None` team clears the pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PickSubmission {
    pub game_id: String,
    pub selected_team_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PickSummary {
    pub week_id: String,
    pub total_games: i32,
    pub picks_completed: i32,
    pub all_picks_completed: bool,
    pub all_picks_locked: bool,
}

/// Per-user pick progress, as shown to commissioners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserPickSummary {
    pub user_id: String,
    pub username: String,
    pub picks_submitted: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PickDetail {
    pub game_id: String,
    pub selected_team_id: String,
    pub is_correct: Option<bool>,
}

/// A user's locked picks for a week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserWithPicks {
    pub user_id: String,
    pub username: String,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub picks: Vec<PickDetail>,
}

impl UserWithPicks {
    pub fn correct_count(&self) -> usize {
        self.picks.iter().filter(|p| p.is_correct == Some(true)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(home_score: Option<i32>, away_score: Option<i32>, spread: Option<f64>) -> Game {
        Game {
            id: "g1".to_string(),
            external_game_id: "401772".to_string(),
            season_id: "s1".to_string(),
            week_id: "w1".to_string(),
            home_team_id: "kc".to_string(),
            away_team_id: "buf".to_string(),
            home_score,
            away_score,
            home_spread: spread,
            kickoff_time: "2025-09-18T00:15:00Z".to_string(),
            status: "scheduled".to_string(),
            neutral_site: false,
            created_at: String::new(),
            updated_at: String::new(),
            created_by: String::new(),
            home_team_name: "Chiefs".to_string(),
            home_team_city: "Kansas City".to_string(),
            home_team_abbr: "KC".to_string(),
            home_team_logo_url: String::new(),
            away_team_name: "Bills".to_string(),
            away_team_city: "Buffalo".to_string(),
            away_team_abbr: "BUF".to_string(),
            away_team_logo_url: String::new(),
        }
    }

    #[test]
    fn test_team_names_and_sides() {
        let g = game(None, None, Some(-3.5));
        assert_eq!(g.home_team_full_name(), "Kansas City Chiefs");
        assert_eq!(g.away_team_full_name(), "Buffalo Bills");
        assert_eq!(g.team_side("buf"), Some(Side::Away));
        assert_eq!(g.team_side("nyj"), None);
        assert_eq!(g.away_spread(), Some(3.5));
    }

    #[test]
    fn test_cover_winner() {
        assert_eq!(game(None, None, Some(-3.5)).cover_winner(), None);
        // Home favored by 3.5, wins by 3: away covers
        assert_eq!(game(Some(24), Some(21), Some(-3.5)).cover_winner(), Some(Side::Away));
        assert_eq!(game(Some(28), Some(21), Some(-3.5)).cover_winner(), Some(Side::Home));
        assert_eq!(game(Some(24), Some(21), Some(-3.0)).cover_winner(), None);
    }

    #[test]
    fn test_game_without_joined_team_fields() {
        let json = r#"{
            "id": "g1", "season_id": "s1", "week_id": "w1",
            "home_team_id": "kc", "away_team_id": "buf",
            "home_score": null, "away_score": null, "home_spread": -3.5,
            "kickoff_time": "2025-09-18T00:15:00Z", "status": "scheduled",
            "created_at": "2025-09-01T00:00:00Z", "updated_at": "2025-09-01T00:00:00Z",
            "created_by": "7c1a", "home_team_abbr": "KC", "away_team_abbr": "BUF"
        }"#;
        let g: Game = serde_json::from_str(json).unwrap();
        assert_eq!(g.home_spread, Some(-3.5));
        assert!(g.home_team_name.is_empty());
        assert!(!g.neutral_site);
    }

    #[test]
    fn test_correct_count() {
        let user = UserWithPicks {
            user_id: "u1".to_string(),
            username: "pat".to_string(),
            avatar_url: None,
            picks: vec![
                PickDetail { game_id: "g1".to_string(), selected_team_id: "kc".to_string(), is_correct: Some(true) },
                PickDetail { game_id: "g2".to_string(), selected_team_id: "buf".to_string(), is_correct: Some(false) },
                PickDetail { game_id: "g3".to_string(), selected_team_id: "nyj".to_string(), is_correct: None },
            ],
        };
        assert_eq!(user.correct_count(), 1);
    }
}
