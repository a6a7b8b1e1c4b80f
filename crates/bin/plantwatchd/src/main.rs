//! # plantwatchd: plantwatch daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise logging
//! - Construct the selected remote store (memory or Firebase)
//! - Start the automation controller and, in demo mode, the simulated device
//! - Build the axum router and serve it
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use plantwatch_adapter_firebase::FirebaseStore;
use plantwatch_adapter_http_axum::state::AppState;
use plantwatch_adapter_memory::{MemoryStore, SimulatedDevice, seed};
use plantwatch_app::automation_controller::AutomationController;
use plantwatch_app::dispatcher::CommandDispatcher;
use plantwatch_app::ports::RemoteStore;

use crate::config::{Config, StoreBackend};

/// How long open connections (dashboard streams) may linger after a
/// shutdown request.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).context("parsing log filter")?,
        )
        .init();

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("shutdown requested");
        stop_tx.send_replace(true);
    });

    match config.store.backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory store");
            let store = Arc::new(MemoryStore::with_tree(seed()));
            if config.simulator.enabled {
                let device = SimulatedDevice::new(Arc::clone(&store));
                tokio::spawn(device.run(config.simulator.interval(), stopped(stop_rx.clone())));
            }
            serve(&config, store, stop_rx).await
        }
        StoreBackend::Firebase => {
            tracing::info!(
                database_url = %config.firebase.database_url,
                root = %config.firebase.root,
                "using firebase store"
            );
            let store = FirebaseStore::new(&config.firebase).context("building firebase store")?;
            serve(&config, Arc::new(store), stop_rx).await
        }
    }
}

/// Run the automation controller and the HTTP server until `stop` flips.
async fn serve<S>(config: &Config, store: Arc<S>, stop: watch::Receiver<bool>) -> anyhow::Result<()>
where
    S: RemoteStore + 'static,
{
    let controller = AutomationController::new(&*store, CommandDispatcher::new(Arc::clone(&store)));
    let controller = tokio::spawn(controller.run(stopped(stop.clone())));

    let state = AppState::new(store).with_refresh_seconds(config.server.refresh_seconds);
    let app = plantwatch_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "plantwatchd listening");

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(stopped(stop.clone()))
        .into_future();
    let deadline = async {
        stopped(stop).await;
        tokio::time::sleep(SHUTDOWN_GRACE).await;
    };
    tokio::select! {
        result = server => result.context("serving http")?,
        () = deadline => tracing::warn!("closing lingering connections"),
    }

    controller.await.context("automation controller panicked")?;
    tracing::info!("plantwatchd stopped");
    Ok(())
}

/// Resolves once the stop flag is raised.
async fn stopped(mut stop: watch::Receiver<bool>) {
    // A dropped sender also means stop.
    let _ = stop.wait_for(|raised| *raised).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
