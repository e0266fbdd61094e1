//! Pinpost Server: real-time presence, chat delivery, and notification push.
//!
//! Main entry point that wires the crates together and starts the server.

mod error;
mod identity;
mod state;
mod ws;

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing_subscriber::{EnvFilter, fmt};

use pinpost_core::config::AppConfig;
use pinpost_core::error::{AppError, ErrorKind};
use pinpost_database::{MemoryStore, Stores};
use pinpost_realtime::RealtimeEngine;

use crate::identity::PathIdentityResolver;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("PINPOST_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Pinpost v{}", env!("CARGO_PKG_VERSION"));

    // The document store lives outside this service; run against the
    // in-memory store until one is plugged in.
    let store = Arc::new(MemoryStore::new());
    let engine = RealtimeEngine::new(config.realtime.clone(), Stores::from_memory(store));

    let state = AppState {
        engine: engine.clone(),
        identity: Arc::new(PathIdentityResolver),
    };

    let app = Router::new()
        .route("/ws/notifications/{user_id}", get(ws::ws_handler))
        .route("/health", get(ws::health))
        .with_state(state);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
    })?;
    tracing::info!("Listening on {}", addr);

    let stop = Arc::new(Notify::new());
    let stop_server = stop.clone();
    let mut server = std::pin::pin!(
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { stop_server.notified().await })
            .into_future()
    );

    let served = tokio::select! {
        result = &mut server => result,
        () = shutdown_signal() => {
            // Live sessions only end once their channels are closed.
            engine.shutdown().await?;
            stop.notify_one();
            let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!("Grace period elapsed with connections still open");
                    Ok(())
                }
            }
        }
    };
    served.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, "Server terminated unexpectedly", e)
    })?;

    tracing::info!("Pinpost stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
