// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc, time::Instant};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use super::{embeddings_handler, probabilities_handler, ApiError};
use crate::inference::{InferenceBackend, ModelInfo};
use crate::version;

/// Shared router state: the loaded model handle, injected at bootstrap
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn InferenceBackend>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self {
            backend,
            started_at: Instant::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub version: serde_json::Value,
    pub uptime_secs: u64,
    pub model: ModelInfo,
}

/// Builds the router with both inference endpoints and the health check.
///
/// Paths are registered with and without the trailing slash. Request
/// bodies are not size-capped: over-length text is truncated by the
/// tokenizer instead of being rejected.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/embeddings", post(embeddings_handler))
        .route("/embeddings/", post(embeddings_handler))
        .route("/probabilities", post(probabilities_handler))
        .route("/probabilities/", post(probabilities_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl-C or SIGTERM.
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

/// Runs CPU-bound inference on the blocking pool.
///
/// Both a failed closure and a panicked task surface as `ApiError::Internal`.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(f).await?;
    result.map_err(ApiError::from)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: version::get_version_info(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        model: state.backend.info(),
    })
}

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
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
