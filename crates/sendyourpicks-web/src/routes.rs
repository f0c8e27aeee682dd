//! Page routes. Each handler returns its page's load data as JSON.

use axum::extract::{Query, State};
use axum::middleware;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tower_http::trace::TraceLayer;
use tracing::debug;

use sendyourpicks_core::auth::guard::{
    code_exchange_target, landing_target, login_page_guard, require_role, AUTH_ERROR_PATH,
    DASHBOARD_PATH, LOGIN_PATH,
};
use sendyourpicks_core::auth::{RouteAccess, ValidatedSession};
use sendyourpicks_core::logging::{UserDetails, UserEvent};

use crate::rejection::PageRejection;
use crate::session::{session_layer, SessionHandle};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/login", get(login))
        .route("/logout", post(logout))
        .route("/auth/callback", get(auth_callback))
        .route("/auth/error", get(auth_error))
        .route("/dashboard", get(dashboard))
        .route("/admin", get(admin))
        .route("/admin/{*rest}", get(admin))
        .route("/commissioner", get(commissioner))
        .route("/commissioner/{*rest}", get(commissioner))
        .layer(middleware::from_fn_with_state(state.clone(), session_layer))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct CodeQuery {
    code: Option<String>,
    next: Option<String>,
}

/// Root layout data shared by every page: the verified user and when the
/// session runs out. Tokens stay server-side.
fn layout_data(auth: &ValidatedSession) -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("user".to_string(), json!(auth.user));
    data.insert(
        "expiresAt".to_string(),
        json!(auth.session.as_ref().and_then(|s| s.expires_at)),
    );
    data
}

async fn landing(
    Extension(auth): Extension<ValidatedSession>,
    Extension(handle): Extension<SessionHandle>,
    Query(query): Query<CodeQuery>,
) -> Redirect {
    if let Some(code) = query.code {
        let exchanged = handle.lock().await.exchange_code_for_session(&code).await;
        return Redirect::to(code_exchange_target(exchanged.is_ok()));
    }
    Redirect::to(landing_target(&auth))
}

async fn login(Extension(auth): Extension<ValidatedSession>) -> Result<Json<Value>, PageRejection> {
    login_page_guard(&auth)?;
    Ok(Json(json!({})))
}

async fn auth_callback(
    Extension(handle): Extension<SessionHandle>,
    Query(query): Query<CodeQuery>,
) -> Redirect {
    let Some(code) = query.code else {
        return Redirect::to(AUTH_ERROR_PATH);
    };
    match handle.lock().await.exchange_code_for_session(&code).await {
        Ok(_) => Redirect::to(local_path(query.next.as_deref())),
        Err(_) => Redirect::to(AUTH_ERROR_PATH),
    }
}

/// Only same-site paths are followed after sign in.
fn local_path(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\") => path,
        _ => DASHBOARD_PATH,
    }
}

async fn auth_error() -> Json<Value> {
    Json(json!({ "message": "The sign-in link is invalid or has expired." }))
}

async fn logout(Extension(handle): Extension<SessionHandle>) -> Redirect {
    // Cookies are cleared and LOGOUT recorded either way.
    if let Err(e) = handle.lock().await.sign_out().await {
        debug!("Provider sign out failed: {}", e);
    }
    Redirect::to(LOGIN_PATH)
}

async fn dashboard(State(state): State<AppState>, Extension(auth): Extension<ValidatedSession>) -> Json<Value> {
    let mut data = layout_data(&auth);

    let profile = match auth.access_token() {
        Some(token) => match state.api.whoami(token).await {
            Ok(me) => {
                state.logger.user(
                    UserEvent::InfoFetchSuccess,
                    UserDetails {
                        has_session: Some(true),
                        ..Default::default()
                    },
                );
                json!(me)
            }
            Err(e) => {
                state.logger.user(
                    UserEvent::InfoFetchFailure,
                    UserDetails {
                        error: Some(e.to_string()),
                        has_session: Some(true),
                    },
                );
                Value::Null
            }
        },
        None => Value::Null,
    };
    data.insert("profile".to_string(), profile);
    Json(Value::Object(data))
}

async fn admin(Extension(auth): Extension<ValidatedSession>) -> Result<Json<Value>, PageRejection> {
    section(&auth, RouteAccess::Admin)
}

async fn commissioner(Extension(auth): Extension<ValidatedSession>) -> Result<Json<Value>, PageRejection> {
    section(&auth, RouteAccess::Commissioner)
}

fn section(auth: &ValidatedSession, access: RouteAccess) -> Result<Json<Value>, PageRejection> {
    let role = require_role(auth, access)?;
    let mut data = layout_data(auth);
    data.insert("userRole".to_string(), json!(role.as_str()));
    Ok(Json(Value::Object(data)))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
