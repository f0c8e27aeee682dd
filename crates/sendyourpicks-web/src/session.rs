//! Per-request session validation.
//!
//! Every page request passes through [`session_layer`]: the session is
//! validated once, the root layout guard runs, and handlers read the result
//! from request extensions. Cookie writes made anywhere during the request
//! are appended to the response on the way out.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::{Mutex, MutexGuard};
use tracing::warn;

use sendyourpicks_core::auth::guard::root_layout_guard;
use sendyourpicks_core::auth::{validate_session, AuthClient, CookieJar};

use crate::rejection::PageRejection;
use crate::state::AppState;

/// The request's auth client, shared with handlers that sign in or out.
#[derive(Clone)]
pub struct SessionHandle(Arc<Mutex<AuthClient>>);

impl SessionHandle {
    fn new(client: AuthClient) -> Self {
        Self(Arc::new(Mutex::new(client)))
    }

    pub async fn lock(&self) -> MutexGuard<'_, AuthClient> {
        self.0.lock().await
    }
}

pub async fn session_layer(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let jar = cookie_jar(request.headers());
    let path = request.uri().path().to_string();

    let mut client = state.auth_client(jar);
    let auth = validate_session(&mut client, &path).await;
    let handle = SessionHandle::new(client);

    let mut response = match root_layout_guard(&auth, &path) {
        Ok(()) => {
            request.extensions_mut().insert(auth);
            request.extensions_mut().insert(handle.clone());
            next.run(request).await
        }
        Err(rejection) => PageRejection(rejection).into_response(),
    };

    append_set_cookies(&handle, response.headers_mut()).await;
    response
}

/// Browsers may split cookies over several `Cookie` headers.
fn cookie_jar(headers: &HeaderMap) -> CookieJar {
    let joined = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");
    CookieJar::from_header(&joined)
}

async fn append_set_cookies(handle: &SessionHandle, headers: &mut HeaderMap) {
    for cookie in handle.lock().await.take_set_cookies() {
        match HeaderValue::from_str(&cookie.header_value()) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(e) => warn!("Dropping unencodable cookie {}: {}", cookie.name, e),
        }
    }
}
