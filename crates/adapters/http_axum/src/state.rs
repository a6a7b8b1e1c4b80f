//! Shared application state for axum handlers.

use std::sync::Arc;

use plantwatch_app::dispatcher::CommandDispatcher;
use plantwatch_app::ports::RemoteStore;
use plantwatch_app::services::control_service::ControlService;
use plantwatch_app::services::dashboard_service::DashboardService;

/// Seconds between dashboard self-reloads.
pub const DEFAULT_REFRESH_SECONDS: u32 = 5;

/// Application state shared across all axum handlers.
///
/// Generic over the store type to avoid dynamic dispatch. `Clone` is
/// implemented manually so the store itself does not need to be `Clone`;
/// only the `Arc` wrappers are cloned.
pub struct AppState<S> {
    /// Current plant snapshot and change feed.
    pub dashboard: Arc<DashboardService>,
    /// Power / mode / pump toggles.
    pub controls: Arc<ControlService<S>>,
    /// Value of the dashboard's `<meta http-equiv="refresh">`.
    pub refresh_seconds: u32,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            dashboard: Arc::clone(&self.dashboard),
            controls: Arc::clone(&self.controls),
            refresh_seconds: self.refresh_seconds,
        }
    }
}

impl<S: RemoteStore + 'static> AppState<S> {
    /// Build both services on top of `store`.
    pub fn new(store: Arc<S>) -> Self {
        let dashboard = DashboardService::new(store.as_ref());
        let controls = ControlService::new(store.as_ref(), CommandDispatcher::new(Arc::clone(&store)));
        Self::from_arcs(Arc::new(dashboard), Arc::new(controls))
    }

    /// Create a new application state from pre-wrapped `Arc` services.
    pub fn from_arcs(dashboard: Arc<DashboardService>, controls: Arc<ControlService<S>>) -> Self {
        Self {
            dashboard,
            controls,
            refresh_seconds: DEFAULT_REFRESH_SECONDS,
        }
    }

    /// Override the dashboard reload interval.
    #[must_use]
    pub fn with_refresh_seconds(mut self, seconds: u32) -> Self {
        self.refresh_seconds = seconds;
        self
    }
}
