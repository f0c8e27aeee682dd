//! Data models for Send Your Picks entities.
//!
//! These mirror the backend's JSON (snake_case field names):
//!
//! - `Season`, `Week`, `WeekStatus`, `Participant`: the season calendar
//! - `Game`, `Team`, `Pick`: the slate and what users chose
//! - `Standing`, `WeekResult`, `WeekWinnersData`, `Badge`: scoring
//! - `User`, `PublicProfile`, `WhoAmI`: accounts
//! - `Settings`: league configuration

pub mod game;
pub mod season;
pub mod settings;
pub mod standing;
pub mod user;

use serde::{Deserialize, Deserializer};

pub use game::{
    Game, Pick, PickDetail, PickSubmission, PickSummary, Side, Team, UserPickSummary,
    UserWithPicks,
};
pub use season::{ActiveSeason, ActiveWeek, Participant, Season, Week, WeekStatus};
pub use settings::Settings;
pub use standing::{
    Badge, BadgeType, ChartDataset, MyStanding, Standing, StandingsHistoryEntry, UserWinCount, WeekPoints,
    WeekResult, WeekWinner, WeekWinnersData,
};
pub use user::{AccountUpdate, PublicProfile, User, WhoAmI};

// Backend encodes empty lists as `null`
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
