//! `GET /api/state`: the decoded nodes plus the derived dashboard view.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use plantwatch_app::ports::RemoteStore;
use plantwatch_app::services::dashboard_service::DashboardService;
use plantwatch_domain::dashboard::{DashboardView, PlantSnapshot};

use crate::state::AppState;

/// Body of `GET /api/state` and of every `state` event on the stream.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    #[serde(flatten)]
    pub snapshot: PlantSnapshot,
    pub view: DashboardView,
}

impl StateResponse {
    /// Capture the service's current state.
    #[must_use]
    pub fn capture(dashboard: &DashboardService) -> Self {
        let snapshot = dashboard.snapshot();
        let view = snapshot.view();
        Self { snapshot, view }
    }
}

/// `GET /api/state`
pub async fn get<S>(State(state): State<AppState<S>>) -> Json<StateResponse>
where
    S: RemoteStore + 'static,
{
    Json(StateResponse::capture(&state.dashboard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use plantwatch_adapter_memory::MemoryStore;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    #[tokio::test]
    async fn should_return_nodes_and_view() {
        let store = MemoryStore::with_tree(json!({
            "sensors": {"moisture": 42, "temperature": 21.5, "humidity": 60, "light": 1},
            "system": {"enabled": true, "mode": "AUTO"},
            "actuators": {"waterPump": false},
            "history": {"moisture": {"-a": {"time": "10:00:00", "value": 42}}},
        }));
        let app = crate::router::build(AppState::new(Arc::new(store)));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/state")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["sensors"]["moisture"], json!(42.0));
        assert_eq!(json["sensors"]["light"], json!(1));
        assert_eq!(json["system"]["mode"], json!("AUTO"));
        assert_eq!(json["history"][0]["time"], json!("10:00:00"));
        assert_eq!(json["view"]["connection"], json!("live"));
        assert_eq!(json["view"]["mode_label"], json!("AUTO MODE"));
        assert_eq!(json["view"]["pump"]["button"], json!("START PUMP"));
    }

    #[tokio::test]
    async fn should_return_nulls_when_store_empty() {
        let app = crate::router::build(AppState::new(Arc::new(MemoryStore::new())));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/state")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["sensors"], Value::Null);
        assert_eq!(json["history"], json!([]));
        assert_eq!(json["view"]["connection"], json!("waiting"));
    }
}
