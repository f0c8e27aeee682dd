//! Typed wrappers for the backend's `/api` routes.
//!
//! The backend wraps most payloads in a single-key object
//! (`{"season": {...}}`, `{"users": [...]}`); these helpers unwrap them.
//! Commissioner and admin mutations return the backend's acknowledgement
//! as raw JSON.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use super::{ApiClient, ApiError};
use crate::models::{
    AccountUpdate, ActiveSeason, ActiveWeek, Badge, MyStanding, Participant, Pick, PickSubmission, PickSummary,
    PublicProfile, Season, Settings, Standing, StandingsHistoryEntry, Team, User, UserPickSummary,
    UserWinCount, UserWithPicks, Week, WeekPoints, WeekResult, WeekWinnersData, WhoAmI,
};

/// Body of `POST /commissioner/seasons`.
#[derive(Debug, Clone, Serialize)]
pub struct NewSeason {
    pub year: i32,
    pub number_of_weeks: i32,
    pub is_postseason: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub participant_ids: Vec<String>,
}

/// One game's spread in `PUT /commissioner/weeks/:id/spreads`.
#[derive(Debug, Clone, Serialize)]
pub struct SpreadUpdate {
    pub game_id: String,
    pub home_spread: Option<f64>,
}

/// `GET /commissioner/weeks/:id/picks`: how many picks each user has made.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct WeekPickProgress {
    pub week_id: String,
    pub total_games: i32,
    pub users: Vec<UserPickSummary>,
}

impl ApiClient {
    /// GET `endpoint` and return the value under `key`.
    async fn get_field<T: DeserializeOwned>(&self, endpoint: &str, token: &str, key: &str) -> Result<T, ApiError> {
        let body: Value = self.get(endpoint, Some(token)).await?;
        take_field(body, endpoint, key)
    }

    /// Like `get_field`, but a `null` list decodes as empty.
    async fn get_list<T: DeserializeOwned>(&self, endpoint: &str, token: &str, key: &str) -> Result<Vec<T>, ApiError> {
        let body: Value = self.get(endpoint, Some(token)).await?;
        match body.get(key) {
            Some(Value::Null) => Ok(Vec::new()),
            _ => take_field(body, endpoint, key),
        }
    }

    // ===== Account =====

    pub async fn settings(&self, token: &str) -> Result<Settings, ApiError> {
        self.get_field("/settings", token, "settings").await
    }

    pub async fn whoami(&self, token: &str) -> Result<WhoAmI, ApiError> {
        self.get("/whoami", Some(token)).await
    }

    pub async fn account(&self, token: &str) -> Result<User, ApiError> {
        self.get("/account", Some(token)).await
    }

    pub async fn update_account(&self, update: &AccountUpdate, token: &str) -> Result<User, ApiError> {
        self.put("/account", update, Some(token)).await
    }

    pub async fn users(&self, token: &str) -> Result<Vec<PublicProfile>, ApiError> {
        self.get_list("/users", token, "users").await
    }

    pub async fn user(&self, user_id: &str, token: &str) -> Result<PublicProfile, ApiError> {
        self.get_field(&format!("/users/{}", user_id), token, "user").await
    }

    /// Badges keyed by user ID, for the active season.
    pub async fn badges(&self, token: &str) -> Result<HashMap<String, Vec<Badge>>, ApiError> {
        self.get_field("/badges", token, "badges").await
    }

    pub async fn teams(&self, token: &str) -> Result<Vec<Team>, ApiError> {
        self.get_list("/teams", token, "teams").await
    }

    // ===== Seasons and weeks =====

    pub async fn seasons(&self, token: &str) -> Result<Vec<Season>, ApiError> {
        self.get_list("/seasons", token, "seasons").await
    }

    pub async fn active_season(&self, token: &str) -> Result<ActiveSeason, ApiError> {
        self.get("/seasons/active", Some(token)).await
    }

    pub async fn season(&self, season_id: &str, token: &str) -> Result<Season, ApiError> {
        self.get_field(&format!("/seasons/{}", season_id), token, "season").await
    }

    pub async fn active_week(&self, season_id: &str, token: &str) -> Result<ActiveWeek, ApiError> {
        self.get(&format!("/seasons/{}/weeks/active", season_id), Some(token)).await
    }

    pub async fn participants(&self, season_id: &str, token: &str) -> Result<Vec<Participant>, ApiError> {
        self.get_list(&format!("/seasons/{}/participants", season_id), token, "participants")
            .await
    }

    pub async fn week(&self, week_id: &str, token: &str) -> Result<Week, ApiError> {
        self.get_field(&format!("/weeks/{}", week_id), token, "week").await
    }

    // ===== Picks =====

    /// Returns the number of picks accepted.
    pub async fn submit_picks(&self, week_id: &str, picks: &[PickSubmission], token: &str) -> Result<u32, ApiError> {
        let endpoint = format!("/weeks/{}/picks", week_id);
        let body: Value = self.put(&endpoint, &json!({ "picks": picks }), Some(token)).await?;
        take_field(body, &endpoint, "picks_count")
    }

    pub async fn my_picks(&self, week_id: &str, token: &str) -> Result<Vec<Pick>, ApiError> {
        self.get_list(&format!("/weeks/{}/picks", week_id), token, "picks").await
    }

    pub async fn my_pick_summary(&self, week_id: &str, token: &str) -> Result<PickSummary, ApiError> {
        self.get_field(&format!("/weeks/{}/picks/summary", week_id), token, "summary")
            .await
    }

    /// Returns the number of picks now locked.
    pub async fn lock_picks(&self, week_id: &str, token: &str) -> Result<u32, ApiError> {
        let endpoint = format!("/weeks/{}/picks/lock", week_id);
        let body: Value = self.post(&endpoint, &json!({}), Some(token)).await?;
        take_field(body, &endpoint, "locked_picks")
    }

    pub async fn locked_picks(&self, week_id: &str, token: &str) -> Result<Vec<UserWithPicks>, ApiError> {
        self.get_list(&format!("/weeks/{}/picks/locked", week_id), token, "users")
            .await
    }

    // ===== Results and standings =====

    pub async fn week_results(&self, week_id: &str, token: &str) -> Result<Vec<WeekResult>, ApiError> {
        self.get_list(&format!("/weeks/{}/results", week_id), token, "week_results")
            .await
    }

    /// Season standings as of the given week.
    pub async fn standings_after_week(&self, week_id: &str, token: &str) -> Result<Vec<Standing>, ApiError> {
        self.get_list(&format!("/weeks/{}/standings", week_id), token, "standings")
            .await
    }

    pub async fn season_standings(&self, season_id: &str, token: &str) -> Result<Vec<Standing>, ApiError> {
        self.get_list(&format!("/seasons/{}/standings", season_id), token, "standings")
            .await
    }

    pub async fn my_standing(&self, season_id: &str, token: &str) -> Result<MyStanding, ApiError> {
        self.get_field(&format!("/seasons/{}/standings/me", season_id), token, "my_standings")
            .await
    }

    pub async fn my_season_points(&self, season_id: &str, token: &str) -> Result<Vec<WeekPoints>, ApiError> {
        self.get_list(&format!("/seasons/{}/points", season_id), token, "weeks_with_points")
            .await
    }

    pub async fn week_winners(&self, season_id: &str, token: &str) -> Result<Vec<WeekWinnersData>, ApiError> {
        self.get_list(&format!("/seasons/{}/week-winners", season_id), token, "weeks")
            .await
    }

    pub async fn win_counts(&self, season_id: &str, token: &str) -> Result<Vec<UserWinCount>, ApiError> {
        self.get_list(&format!("/seasons/{}/win-counts", season_id), token, "users")
            .await
    }

    pub async fn standings_history(&self, season_id: &str, token: &str) -> Result<Vec<StandingsHistoryEntry>, ApiError> {
        self.get_list(&format!("/seasons/{}/standings/history", season_id), token, "history")
            .await
    }

    // ===== Commissioner =====

    pub async fn create_season(&self, season: &NewSeason, token: &str) -> Result<Value, ApiError> {
        self.post("/commissioner/seasons", season, Some(token)).await
    }

    /// Step the season's state machine once.
    pub async fn advance_season(&self, season_id: &str, token: &str) -> Result<Value, ApiError> {
        self.post(&format!("/commissioner/seasons/{}/advance", season_id), &json!({}), Some(token))
            .await
    }

    pub async fn activate_season(&self, season_id: &str, token: &str) -> Result<Value, ApiError> {
        self.patch(&format!("/commissioner/seasons/{}/activate", season_id), &json!({}), Some(token))
            .await
    }

    pub async fn deactivate_season(&self, season_id: &str, token: &str) -> Result<Value, ApiError> {
        self.patch(&format!("/commissioner/seasons/{}/deactivate", season_id), &json!({}), Some(token))
            .await
    }

    pub async fn update_weeks_count(&self, season_id: &str, number_of_weeks: i32, token: &str) -> Result<Value, ApiError> {
        self.patch(
            &format!("/commissioner/seasons/{}/weeks-count", season_id),
            &json!({ "number_of_weeks": number_of_weeks }),
            Some(token),
        )
        .await
    }

    pub async fn add_participants(&self, season_id: &str, user_ids: &[String], token: &str) -> Result<Value, ApiError> {
        self.post(
            &format!("/commissioner/seasons/{}/participants", season_id),
            &json!({ "user_ids": user_ids }),
            Some(token),
        )
        .await
    }

    pub async fn remove_participant(&self, season_id: &str, user_id: &str, token: &str) -> Result<Value, ApiError> {
        self.delete(&format!("/commissioner/seasons/{}/participants/{}", season_id, user_id), Some(token))
            .await
    }

    pub async fn update_spreads(&self, week_id: &str, games: &[SpreadUpdate], token: &str) -> Result<Week, ApiError> {
        let endpoint = format!("/commissioner/weeks/{}/spreads", week_id);
        let body: Value = self.put(&endpoint, &json!({ "games": games }), Some(token)).await?;
        take_field(body, &endpoint, "week")
    }

    pub async fn auto_import_spreads(&self, week_id: &str, token: &str) -> Result<Value, ApiError> {
        self.post(&format!("/commissioner/weeks/{}/spreads/auto-import", week_id), &json!({}), Some(token))
            .await
    }

    pub async fn activate_week(&self, week_id: &str, token: &str) -> Result<Value, ApiError> {
        self.post(&format!("/commissioner/weeks/{}/activate", week_id), &json!({}), Some(token))
            .await
    }

    pub async fn week_pick_progress(&self, week_id: &str, token: &str) -> Result<WeekPickProgress, ApiError> {
        self.get(&format!("/commissioner/weeks/{}/picks", week_id), Some(token)).await
    }

    // ===== Admin =====

    pub async fn accounts(&self, token: &str) -> Result<Vec<User>, ApiError> {
        self.get_list("/admin/users", token, "users").await
    }

    pub async fn update_settings(&self, settings: &Settings, token: &str) -> Result<Settings, ApiError> {
        let body: Value = self.put("/admin/settings", settings, Some(token)).await?;
        take_field(body, "/admin/settings", "settings")
    }
}

fn take_field<T: DeserializeOwned>(mut body: Value, endpoint: &str, key: &str) -> Result<T, ApiError> {
    let field = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| ApiError::InvalidResponse(format!("{} response has no `{}`", endpoint, key)))?;
    serde_json::from_value(field).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::Path;
    use axum::routing::{get, put};
    use axum::{Json, Router};

    use super::*;
    use crate::logging::{Logger, MemorySink};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn client(router: Router) -> ApiClient {
        let base = serve(router).await;
        ApiClient::new(&base, Logger::new(Arc::new(MemorySink::new()))).unwrap()
    }

    #[tokio::test]
    async fn test_unwraps_envelopes() {
        let router = Router::new()
            .route(
                "/seasons/{id}",
                get(|Path(id): Path<String>| async move {
                    Json(json!({"season": {
                        "id": id, "year": 2025, "is_active": true,
                        "is_postseason": false, "number_of_weeks": 18, "weeks": []
                    }}))
                }),
            )
            .route("/seasons/{id}/standings", get(|| async { Json(json!({"standings": null, "season_id": "s1"})) }));
        let api = client(router).await;

        let season = api.season("01JD0S", "t").await.unwrap();
        assert_eq!(season.id, "01JD0S");
        assert_eq!(season.weeks, Some(vec![]));
        assert!(api.season_standings("s1", "t").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_picks_sends_body() {
        let router = Router::new().route(
            "/weeks/{id}/picks",
            put(|Json(body): Json<Value>| async move {
                let count = body["picks"].as_array().map(|p| p.len()).unwrap_or(0);
                assert_eq!(body["picks"][1]["selected_team_id"], Value::Null);
                Json(json!({ "picks_count": count }))
            }),
        );
        let api = client(router).await;
        let picks = vec![
            PickSubmission { game_id: "g1".to_string(), selected_team_id: Some("kc".to_string()) },
            PickSubmission { game_id: "g2".to_string(), selected_team_id: None },
        ];
        assert_eq!(api.submit_picks("w1", &picks, "t").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_envelope_key_is_invalid_response() {
        let router = Router::new().route("/settings", get(|| async { Json(json!({"unexpected": true})) }));
        let api = client(router).await;
        let err = api.settings("t").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(ref m) if m.contains("settings")));
    }

    #[test]
    fn test_new_season_body() {
        let body = serde_json::to_value(NewSeason {
            year: 2025,
            number_of_weeks: 18,
            is_postseason: false,
            participant_ids: vec![],
        })
        .unwrap();
        assert_eq!(body, json!({"year": 2025, "number_of_weeks": 18, "is_postseason": false}));
    }
}
