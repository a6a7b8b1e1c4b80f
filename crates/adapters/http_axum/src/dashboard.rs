//! Server-side rendered HTML dashboard (no JavaScript).

mod chart;
pub mod controls;
pub mod home;

use axum::Router;
use axum::routing::{get, post};

use plantwatch_app::ports::RemoteStore;

use crate::state::AppState;

/// Build the dashboard sub-router for SSR HTML pages.
pub fn routes<S>() -> Router<AppState<S>>
where
    S: RemoteStore + 'static,
{
    Router::new()
        .route("/", get(home::index::<S>))
        .route("/controls/{control}", post(controls::toggle::<S>))
}
