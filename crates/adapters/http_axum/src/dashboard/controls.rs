//! Form handlers behind the dashboard buttons (PRG).

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};

use plantwatch_app::ports::RemoteStore;

use crate::api::controls::Control;
use crate::state::AppState;

/// Response from the toggle form handler (PRG pattern).
pub enum ToggleResponse {
    /// Redirect back to the dashboard.
    Redirect(Redirect),
}

impl IntoResponse for ToggleResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(redirect) => redirect.into_response(),
        }
    }
}

/// `POST /controls/{control}`: submit the toggle and go back to `/`.
///
/// A rejected toggle is not an error for the page: the button was stale, and
/// the reloaded dashboard shows the real state.
pub async fn toggle<S>(
    State(state): State<AppState<S>>,
    Path(control): Path<Control>,
) -> ToggleResponse
where
    S: RemoteStore + 'static,
{
    if let Err(err) = control.apply(&state.controls) {
        tracing::info!(?control, error = %err, "toggle rejected");
    }
    ToggleResponse::Redirect(Redirect::to("/"))
}
