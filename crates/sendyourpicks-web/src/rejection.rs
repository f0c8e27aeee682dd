use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde_json::json;

use sendyourpicks_core::auth::GuardRejection;

/// HTTP rendering of a guard decision.
#[derive(Debug)]
pub struct PageRejection(pub GuardRejection);

impl From<GuardRejection> for PageRejection {
    fn from(rejection: GuardRejection) -> Self {
        Self(rejection)
    }
}

impl IntoResponse for PageRejection {
    fn into_response(self) -> Response {
        match self.0 {
            GuardRejection::Redirect { location } => Redirect::to(location).into_response(),
            GuardRejection::Forbidden(message) => {
                (StatusCode::FORBIDDEN, Json(json!({ "message": message }))).into_response()
            }
        }
    }
}
