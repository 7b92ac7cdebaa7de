// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::{future::Future, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::config::ServerConfig;
use super::search::search_handler;
use crate::scan::Scanner;
use crate::version;

#[derive(Clone)]
pub struct AppState {
    /// One scanner, and so one HTTP client, shared by every request
    pub scanner: Arc<Scanner>,
    /// Targets used when a request names none
    pub default_targets: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(scanner: Scanner, default_targets: Vec<String>) -> Self {
        Self {
            scanner: Arc::new(scanner),
            default_targets: Arc::new(default_targets),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        // Health check
        .route("/health", get(health_handler))
        // Term search endpoint
        .route("/v1/search", post(search_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve the router until `shutdown` resolves
pub async fn start_server(
    config: &ServerConfig,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    tracing::info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn root_handler() -> &'static str {
    "Hello, this is termscan. POST /v1/search to scan targets for a term.\n"
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut body = version::get_version_info();
    body["status"] = json!("ok");
    body["defaultTargets"] = json!(state.default_targets.len());
    Json(body)
}
