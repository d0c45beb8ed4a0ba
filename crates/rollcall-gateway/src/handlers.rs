// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the webhook gateway.
//!
//! Handles GET /{stage}, POST /donation-webhook, GET /health.

use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use rollcall_core::{HealthStatus, PluginAdapter, RollcallError};
use rollcall_flow::{DonationEvent, InboundSms, Stage, StageContext};
use serde::Serialize;
use tracing::{error, warn};

use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when every adapter is healthy, otherwise `unhealthy`.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the gateway state was built.
    pub uptime_secs: u64,
    pub adapters: Vec<AdapterHealth>,
}

/// One adapter's entry in [`HealthResponse`].
#[derive(Debug, Serialize)]
pub struct AdapterHealth {
    pub name: String,
    pub kind: String,
    pub version: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// GET /{stage}
///
/// The provider's reply callback. Unknown stages are 404; everything else is
/// 204 whether or not the handler succeeded.
pub async fn get_stage(
    State(state): State<GatewayState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> StatusCode {
    let Some(stage) = Stage::from_path(&path) else {
        return StatusCode::NOT_FOUND;
    };
    let query = query.unwrap_or_default();

    let sms = match InboundSms::from_query(&query) {
        Ok(sms) => sms,
        Err(e) => {
            warn!(%stage, error = %e, "unreadable inbound SMS, ignoring");
            return StatusCode::NO_CONTENT;
        }
    };
    let context = StageContext::from_query(&query).unwrap_or_else(|e| {
        warn!(%stage, error = %e, "unreadable stage context, continuing without it");
        StageContext::default()
    });

    if let Err(e) = state.conversation.handle(stage, &sms, &context).await {
        report(stage.path(), &e);
    }
    StatusCode::NO_CONTENT
}

/// POST /donation-webhook
pub async fn post_donation(
    State(state): State<GatewayState>,
    Json(event): Json<DonationEvent>,
) -> StatusCode {
    if let Err(e) = state.conversation.notify_donation(&event).await {
        report("donation-webhook", &e);
    }
    StatusCode::NO_CONTENT
}

/// GET /health
///
/// Checks every registered adapter. Any unhealthy adapter turns the answer
/// into 503.
pub async fn get_health(State(state): State<GatewayState>) -> (StatusCode, Json<HealthResponse>) {
    let mut adapters = Vec::with_capacity(state.adapters.len());
    for adapter in &state.adapters {
        adapters.push(adapter_health(adapter.as_ref()).await);
    }

    let healthy = adapters.iter().all(|a| a.healthy);
    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = HealthResponse {
        status: if healthy { "ok" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        adapters,
    };
    (code, Json(body))
}

async fn adapter_health(adapter: &dyn PluginAdapter) -> AdapterHealth {
    let (healthy, detail) = match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => (true, None),
        Ok(HealthStatus::Unhealthy(reason)) => (false, Some(reason)),
        Err(e) => (false, Some(e.to_string())),
    };
    if let Some(reason) = &detail {
        warn!(adapter = adapter.name(), reason = %reason, "adapter unhealthy");
    }
    AdapterHealth {
        name: adapter.name().to_string(),
        kind: adapter.adapter_type().to_string(),
        version: adapter.version().to_string(),
        healthy,
        detail,
    }
}

/// Bad input from the caller is a warning; anything else is an error.
fn report(route: &str, err: &RollcallError) {
    match err {
        RollcallError::InvalidInput(_) => warn!(route, error = %err, "rejected webhook input"),
        _ => error!(route, error = %err, "webhook handler failed"),
    }
}
