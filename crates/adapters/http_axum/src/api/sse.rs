//! Server-Sent Events (SSE) stream of plant state.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;

use plantwatch_app::ports::RemoteStore;

use crate::api::state::StateResponse;
use crate::state::AppState;

/// `GET /api/stream`: SSE stream of `state` events.
///
/// Sends the current state immediately, then a fresh one after every change
/// to any subscribed node. Bursts of changes may be coalesced. The stream
/// continues until the client disconnects.
pub async fn stream<S>(
    State(state): State<AppState<S>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>
where
    S: RemoteStore + 'static,
{
    let dashboard = Arc::clone(&state.dashboard);
    let ticks = tokio_stream::once(()).chain(state.dashboard.changes());
    let events = ticks.filter_map(move |()| {
        match Event::default()
            .event("state")
            .json_data(StateResponse::capture(&dashboard))
        {
            Ok(event) => Some(Ok(event)),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize state for SSE stream");
                None
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use plantwatch_adapter_memory::MemoryStore;
    use plantwatch_domain::path::StorePath;
    use serde_json::json;
    use tower::ServiceExt;

    async fn next_frame(body: &mut Body) -> String {
        let frame = tokio::time::timeout(Duration::from_secs(1), body.frame())
            .await
            .expect("frame should arrive")
            .unwrap()
            .unwrap();
        String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap()
    }

    #[tokio::test]
    async fn should_send_current_state_then_changes() {
        let store = MemoryStore::with_tree(json!({"sensors": {"moisture": 40}}));
        let app = crate::router::build(AppState::new(Arc::new(store.clone())));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/stream")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/event-stream");

        let mut body = response.into_body();
        let first = next_frame(&mut body).await;
        assert!(first.starts_with("event: state\n"));
        assert!(first.contains("\"moisture\":40.0"));

        store
            .set(&StorePath::sensors(), json!({"moisture": 22}))
            .await
            .unwrap();

        let second = next_frame(&mut body).await;
        assert!(second.contains("\"moisture\":22.0"));
    }
}
