//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use plantwatch_app::ports::RemoteStore;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Merges API routes under `/api` and dashboard routes at `/`.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<S>(state: AppState<S>) -> Router
where
    S: RemoteStore + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .merge(crate::dashboard::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
