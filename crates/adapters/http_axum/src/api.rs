//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod controls;
pub mod sse;
pub mod state;

use axum::Router;
use axum::routing::{get, post};

use plantwatch_app::ports::RemoteStore;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S>() -> Router<AppState<S>>
where
    S: RemoteStore + 'static,
{
    Router::new()
        .route("/state", get(state::get::<S>))
        .route("/stream", get(sse::stream::<S>))
        .route("/controls/{control}", post(controls::toggle::<S>))
}
