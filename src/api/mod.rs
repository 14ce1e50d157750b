//! HTTP surface of the order intake service.
//!
//! Two routes on one path:
//!
//! - `POST /orders` prices and stores an order, answers `{"status": "success"}`
//! - `GET /orders` returns every stored order as a 9-field row, oldest first
//!
//! The storage handle is opened by the caller, shared with handlers through
//! [`AppState`] and closed once the server has drained.
use std::{future::Future, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
pub mod orders;

pub use orders::Ack;

use crate::application::OrderService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OrderService>,
}

impl AppState {
    pub fn new(service: Arc<OrderService>) -> Self {
        Self { service }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(orders::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `address` and serve until Ctrl+C or SIGTERM.
pub async fn serve(address: &str, service: Arc<OrderService>) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {}", listener.local_addr()?);

    serve_with_shutdown(listener, service, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves, then close
/// the storage handle.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    service: Arc<OrderService>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = app(AppState::new(service.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    service.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
