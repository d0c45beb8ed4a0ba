// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use rollcall_core::{PluginAdapter, RollcallError};
use rollcall_flow::Conversation;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Stage handlers every webhook is dispatched to.
    pub conversation: Conversation,
    /// Adapters checked by GET /health, in registration order.
    pub adapters: Vec<Arc<dyn PluginAdapter>>,
    pub health: HealthState,
}

impl GatewayState {
    pub fn new(conversation: Conversation) -> Self {
        Self {
            conversation,
            adapters: Vec::new(),
            health: HealthState {
                start_time: Instant::now(),
            },
        }
    }

    /// Register an adapter whose health check is reported by GET /health.
    pub fn with_adapter(mut self, adapter: Arc<dyn PluginAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }
}

/// Gateway server configuration (mirrors `ServerConfig` from rollcall-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the webhook router:
/// - GET /health
/// - POST /donation-webhook
/// - GET /{stage} for every conversation stage
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/donation-webhook", post(handlers::post_donation))
        .route("/{stage}", get(handlers::get_stage))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), RollcallError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RollcallError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| RollcallError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
