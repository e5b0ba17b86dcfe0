//! HTTP server module
//!
//! Provides the Axum-based HTTP server for serving metrics.

pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::collector::MetricsFetcher;
use crate::config::{Config, ConfigError};
use crate::discovery::TargetSet;
use crate::error::AppResult;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// JMX fetcher
    pub fetcher: Arc<MetricsFetcher>,
    /// Targets resolved at startup
    pub targets: Arc<TargetSet>,
}

impl AppState {
    pub fn new(config: Config, fetcher: MetricsFetcher, targets: TargetSet) -> Self {
        Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
            targets: Arc::new(targets),
        }
    }
}

/// Build the router for `state`
pub fn router(state: AppState) -> Router {
    let metrics_path = state.config.server.path.clone();

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/targets", get(handlers::targets))
        .route(&metrics_path, get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server
///
/// # Errors
/// Returns an error if the bind address is invalid or the listener fails
pub async fn run(state: AppState) -> AppResult<()> {
    let bind_address = state.config.server.bind_address.clone();
    let port = state.config.server.port;
    let metrics_path = state.config.server.path.clone();

    // Handle "localhost" specially, otherwise parse as IP address
    let bind_addr: std::net::IpAddr = if bind_address == "localhost" {
        std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST)
    } else {
        bind_address.parse().map_err(|e| {
            ConfigError::ValidationError(format!(
                "Invalid bind_address '{}': {}. Use an IP address (e.g., '0.0.0.0', '127.0.0.1') or 'localhost'.",
                bind_address, e
            ))
        })?
    };
    let addr = SocketAddr::from((bind_addr, port));
    info!(address = %addr, metrics_path = %metrics_path, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
