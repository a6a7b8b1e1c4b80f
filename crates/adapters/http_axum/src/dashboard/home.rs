//! Dashboard home page: the whole plant at a glance.

use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};

use plantwatch_app::ports::RemoteStore;
use plantwatch_domain::dashboard::{CardKind, ConnectionStatus, DashboardView, StatCard};

use super::chart::Chart;
use crate::state::AppState;

/// Reading card as the template lays it out.
struct Card {
    class: &'static str,
    title: &'static str,
    value: String,
    unit: &'static str,
}

impl From<StatCard> for Card {
    fn from(card: StatCard) -> Self {
        let class = match card.kind {
            CardKind::Moisture => "moisture",
            CardKind::Temperature => "temperature",
            CardKind::Humidity => "humidity",
            CardKind::Light => "light",
        };
        Self {
            class,
            title: card.title,
            value: card.value,
            unit: card.unit,
        }
    }
}

/// Home page template.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    refresh_seconds: u32,
    connection_class: &'static str,
    connection_label: &'static str,
    cards: Vec<Card>,
    chart: Option<Chart>,
    view: DashboardView,
}

impl HomePage {
    fn new(refresh_seconds: u32, view: DashboardView) -> Self {
        let connection_class = match view.connection {
            ConnectionStatus::Live => "live",
            ConnectionStatus::Waiting => "waiting",
        };
        let chart = Chart::plot(&view.chart);
        let cards = view.cards.clone().into_iter().map(Card::from).collect();
        Self {
            refresh_seconds,
            connection_class,
            connection_label: view.connection.label(),
            cards,
            chart,
            view,
        }
    }
}

impl IntoResponse for HomePage {
    fn into_response(self) -> Response {
        Html(self.to_string()).into_response()
    }
}

/// `GET /`: sensor cards, trend chart and controls.
pub async fn index<S>(State(state): State<AppState<S>>) -> HomePage
where
    S: RemoteStore + 'static,
{
    HomePage::new(state.refresh_seconds, state.dashboard.view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use plantwatch_adapter_memory::MemoryStore;
    use serde_json::json;
    use tower::ServiceExt;

    async fn render(store: MemoryStore) -> String {
        let app = crate::router::build(AppState::new(Arc::new(store)));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn should_render_waiting_dashboard_on_empty_store() {
        let html = render(MemoryStore::new()).await;
        assert!(html.contains("Smart Plant Monitor"));
        assert!(html.contains("Waiting for Data..."));
        assert!(html.contains("UNKNOWN MODE"));
        assert!(html.contains("http-equiv=\"refresh\" content=\"5\""));
        assert!(html.contains("No history yet"));
    }

    #[tokio::test]
    async fn should_render_live_readings() {
        let html = render(MemoryStore::with_tree(json!({
            "sensors": {"moisture": 28, "temperature": 22.46, "humidity": 51, "light": 0},
            "system": {"enabled": true, "mode": "AUTO"},
            "actuators": {"waterPump": true},
            "history": {"moisture": {
                "-a": {"time": "10:00:00", "value": 30},
                "-b": {"time": "10:00:05", "value": 28},
            }},
        })))
        .await;

        assert!(html.contains("Live Connection"));
        assert!(html.contains("AUTO MODE"));
        assert!(html.contains("22.5"));
        assert!(html.contains("Dark"));
        assert!(html.contains("IRRIGATION ACTIVE"));
        assert!(html.contains("STOP PUMP"));
        assert!(html.contains("<polyline"));
        assert!(html.contains("10:00:05"));
    }

    #[tokio::test]
    async fn should_render_disabled_screen_when_powered_off() {
        let html = render(MemoryStore::with_tree(json!({
            "system": {"enabled": false, "mode": "AUTO"},
        })))
        .await;

        assert!(html.contains("SYSTEM DISABLED"));
        assert!(html.contains("Master switch is OFF."));
        assert!(html.contains("POWER ON SYSTEM"));
        assert!(!html.contains("Soil Moisture"));
    }

    #[tokio::test]
    async fn should_escape_store_text_in_chart_labels() {
        let html = render(MemoryStore::with_tree(json!({
            "system": {"enabled": true, "mode": "AUTO"},
            "history": {"moisture": {
                "-a": {"time": "<b>noon</b>", "value": 40},
            }},
        })))
        .await;

        assert!(html.contains("&lt;b&gt;noon"));
        assert!(!html.contains("<b>noon"));
    }
}
