//! HTTP endpoint serving namespace usage to Prometheus scrapers

use crate::config::ServeConfig;
use crate::metrics::{NamespaceCollector, PrometheusSink};
use crate::{Result, UsageError};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state
pub struct AppState {
    pub collector: NamespaceCollector,
}

/// Prometheus metrics endpoint, recomputed on every request
async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    let mut sink = PrometheusSink::new();
    state.collector.collect(&mut sink).await;

    match sink.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, sink.content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Liveness probe; does not touch the cluster
async fn healthz() -> &'static str {
    "ok"
}

/// Create the HTTP router
pub fn create_router(collector: NamespaceCollector) -> Router {
    let state = Arc::new(AppState { collector });

    Router::new()
        .route("/metrics", get(metrics))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Bind the listener and serve until Ctrl+C
pub async fn serve(config: &ServeConfig, collector: NamespaceCollector) -> Result<()> {
    let app = create_router(collector);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .map_err(|source| UsageError::BindFailed {
            addr: config.listen,
            source,
        })?;
    info!(
        "Serving namespace usage on http://{}/metrics (scrape timeout {:?})",
        listener.local_addr()?,
        config.scrape_timeout
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
