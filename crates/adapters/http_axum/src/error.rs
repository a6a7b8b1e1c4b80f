//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use plantwatch_domain::error::ControlError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// A refused toggle, answered with `409 Conflict`.
///
/// Toggles never wait on the store, so a control rule is the only way an
/// API handler can fail.
pub struct ApiError(ControlError);

impl From<ControlError> for ApiError {
    fn from(err: ControlError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (StatusCode::CONFLICT, Json(body)).into_response()
    }
}
