//! JSON handlers for the power, mode and pump toggles.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use plantwatch_app::ports::RemoteStore;
use plantwatch_app::services::control_service::ControlService;
use plantwatch_domain::control::Write;
use plantwatch_domain::error::ControlError;

use crate::error::ApiError;
use crate::state::AppState;

/// The three dashboard toggles, as they appear in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    Power,
    Mode,
    Pump,
}

impl Control {
    /// Plan and submit this toggle.
    pub fn apply<S>(self, controls: &ControlService<S>) -> Result<Vec<Write>, ControlError>
    where
        S: RemoteStore + 'static,
    {
        match self {
            Self::Power => Ok(controls.toggle_power()),
            Self::Mode => controls.toggle_mode(),
            Self::Pump => controls.toggle_pump(),
        }
    }
}

/// Body of a `202 Accepted` answer.
#[derive(Debug, Serialize)]
pub struct Accepted {
    pub control: Control,
    pub writes: Vec<Write>,
}

/// Possible responses from the toggle endpoint.
pub enum ToggleResponse {
    Accepted(Json<Accepted>),
}

impl IntoResponse for ToggleResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted(json) => (StatusCode::ACCEPTED, json).into_response(),
        }
    }
}

/// `POST /api/controls/{control}`: submit the toggle's writes without
/// waiting for the store.
pub async fn toggle<S>(
    State(state): State<AppState<S>>,
    Path(control): Path<Control>,
) -> Result<ToggleResponse, ApiError>
where
    S: RemoteStore + 'static,
{
    let writes = control.apply(&state.controls)?;
    Ok(ToggleResponse::Accepted(Json(Accepted { control, writes })))
}
