//! Closed event vocabularies for each log domain, plus their detail schemas.

use std::fmt;

use super::record::{Category, Details, LogLevel};

/// An event name belonging to one log category.
pub trait LogEvent: Copy {
    const CATEGORY: Category;

    fn name(self) -> &'static str;

    fn level(self) -> LogLevel {
        LogLevel::for_event(self.name())
    }
}

macro_rules! log_events {
    (
        $(#[$meta:meta])*
        $name:ident in $category:ident {
            $($variant:ident => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl LogEvent for $name {
            const CATEGORY: Category = Category::$category;

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

log_events! {
    /// Authentication lifecycle events.
    AuthEvent in Auth {
        LoginAttempt => "LOGIN_ATTEMPT",
        LoginSuccess => "LOGIN_SUCCESS",
        LoginFailure => "LOGIN_FAILURE",
        SignupAttempt => "SIGNUP_ATTEMPT",
        SignupSuccess => "SIGNUP_SUCCESS",
        SignupFailure => "SIGNUP_FAILURE",
        SessionValid => "SESSION_VALID",
        SessionInvalid => "SESSION_INVALID",
        SessionExpired => "SESSION_EXPIRED",
        JwtError => "JWT_ERROR",
        TokenRefresh => "TOKEN_REFRESH",
        Logout => "LOGOUT",
    }
}

log_events! {
    /// Backend API call events.
    ApiEvent in Api {
        Request => "REQUEST",
        ResponseSuccess => "RESPONSE_SUCCESS",
        ResponseError => "RESPONSE_ERROR",
        NetworkError => "NETWORK_ERROR",
    }
}

log_events! {
    /// Pick selection and submission events.
    PicksEvent in Picks {
        PageLoad => "PAGE_LOAD",
        PickSelected => "PICK_SELECTED",
        PickDeselected => "PICK_DESELECTED",
        SubmitAttempt => "SUBMIT_ATTEMPT",
        SubmitSuccess => "SUBMIT_SUCCESS",
        SubmitFailure => "SUBMIT_FAILURE",
        GameLocked => "GAME_LOCKED",
        ValidationError => "VALIDATION_ERROR",
    }
}

log_events! {
    /// Commissioner week management events.
    WeekEvent in Week {
        PageLoad => "PAGE_LOAD",
        ActivationAttempt => "ACTIVATION_ATTEMPT",
        ActivationSuccess => "ACTIVATION_SUCCESS",
        ActivationFailure => "ACTIVATION_FAILURE",
        SpreadsImportAttempt => "SPREADS_IMPORT_ATTEMPT",
        SpreadsImportSuccess => "SPREADS_IMPORT_SUCCESS",
        SpreadsImportFailure => "SPREADS_IMPORT_FAILURE",
        SpreadsSaveAttempt => "SPREADS_SAVE_ATTEMPT",
        SpreadsSaveSuccess => "SPREADS_SAVE_SUCCESS",
        SpreadsSaveFailure => "SPREADS_SAVE_FAILURE",
        SpreadsValidationError => "SPREADS_VALIDATION_ERROR",
        StateTransition => "STATE_TRANSITION",
    }
}

log_events! {
    /// User info and profile fetch events.
    UserEvent in User {
        InfoFetchSuccess => "INFO_FETCH_SUCCESS",
        InfoFetchFailure => "INFO_FETCH_FAILURE",
        ProfileFetchSuccess => "PROFILE_FETCH_SUCCESS",
        ProfileFetchFailure => "PROFILE_FETCH_FAILURE",
    }
}

log_events! {
    /// Standings and chart data events.
    DataEvent in Data {
        StandingsLoadSuccess => "STANDINGS_LOAD_SUCCESS",
        StandingsLoadFailure => "STANDINGS_LOAD_FAILURE",
        StandingsUnavailable => "STANDINGS_UNAVAILABLE",
        ChartRenderSuccess => "CHART_RENDER_SUCCESS",
        ChartRenderFailure => "CHART_RENDER_FAILURE",
    }
}

// ============================================================================
// Detail schemas
// ============================================================================

/// Auth records carry an email and error outside the detail mapping.
#[derive(Debug, Clone, Default)]
pub struct AuthDetails {
    pub email: Option<String>,
    pub error: Option<String>,
    pub details: Details,
}

#[derive(Debug, Clone, Default)]
pub struct ApiDetails {
    pub method: Option<String>,
    pub endpoint: Option<String>,
    pub status: Option<u16>,
    pub error: Option<String>,
    pub duration_ms: Option<u64>,
}

impl From<ApiDetails> for Details {
    fn from(d: ApiDetails) -> Self {
        Details::new()
            .with_opt("method", d.method)
            .with_opt("endpoint", d.endpoint)
            .with_opt("status", d.status)
            .with_opt("error", d.error)
            .with_opt("durationMs", d.duration_ms)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PicksDetails {
    pub week_id: Option<String>,
    pub season_id: Option<String>,
    pub game_id: Option<String>,
    pub team: Option<String>,
    pub pick_count: Option<u32>,
    pub locked_count: Option<u32>,
    pub error: Option<String>,
}

impl From<PicksDetails> for Details {
    fn from(d: PicksDetails) -> Self {
        Details::new()
            .with_opt("weekId", d.week_id)
            .with_opt("seasonId", d.season_id)
            .with_opt("gameId", d.game_id)
            .with_opt("team", d.team)
            .with_opt("pickCount", d.pick_count)
            .with_opt("lockedCount", d.locked_count)
            .with_opt("error", d.error)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WeekDetails {
    pub week_id: Option<String>,
    pub season_id: Option<String>,
    pub status: Option<String>,
    pub new_status: Option<String>,
    pub game_count: Option<u32>,
    pub spread_count: Option<u32>,
    pub error: Option<String>,
    pub source: Option<String>,
}

impl From<WeekDetails> for Details {
    fn from(d: WeekDetails) -> Self {
        Details::new()
            .with_opt("weekId", d.week_id)
            .with_opt("seasonId", d.season_id)
            .with_opt("status", d.status)
            .with_opt("newStatus", d.new_status)
            .with_opt("gameCount", d.game_count)
            .with_opt("spreadCount", d.spread_count)
            .with_opt("error", d.error)
            .with_opt("source", d.source)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserDetails {
    pub error: Option<String>,
    pub has_session: Option<bool>,
}

impl From<UserDetails> for Details {
    fn from(d: UserDetails) -> Self {
        Details::new()
            .with_opt("error", d.error)
            .with_opt("hasSession", d.has_session)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DataDetails {
    pub season_id: Option<String>,
    pub week_id: Option<String>,
    pub reason: Option<String>,
    pub error: Option<String>,
}

impl From<DataDetails> for Details {
    fn from(d: DataDetails) -> Self {
        Details::new()
            .with_opt("seasonId", d.season_id)
            .with_opt("weekId", d.week_id)
            .with_opt("reason", d.reason)
            .with_opt("error", d.error)
    }
}
