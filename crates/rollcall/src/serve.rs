// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rollcall serve` implementation.
//!
//! Wires the TransmitSMS provider, the delayed decision queue, the
//! conversation handlers and the webhook gateway, then runs until a
//! shutdown signal arrives.

use std::sync::Arc;

use rollcall_config::RollcallConfig;
use rollcall_core::RollcallError;
use rollcall_cron::{DelayedQueue, run_dispatcher};
use rollcall_flow::{Conversation, ConversationSettings};
use rollcall_gateway::{GatewayState, ServerConfig, start_server};
use rollcall_transmit::TransmitProvider;
use tracing::{error, info};

use crate::shutdown;

/// Runs the webhook server until SIGINT or SIGTERM.
pub async fn run_serve(config: RollcallConfig) -> Result<(), RollcallError> {
    init_tracing(&config.logging.level);

    if let Err(errors) = rollcall_config::validate_credentials(&config) {
        rollcall_config::render_errors(&errors);
        return Err(RollcallError::Config(
            "TransmitSMS credentials are required to serve".to_string(),
        ));
    }

    let provider = Arc::new(TransmitProvider::from_config(&config.transmit)?);
    let cancel = shutdown::install_signal_handler();
    let (queue, fired) = DelayedQueue::new(cancel.clone());
    let queue = Arc::new(queue);

    let conversation = Conversation::new(
        provider.clone(),
        queue.clone(),
        ConversationSettings::from_config(&config)?,
    );

    let dispatcher = {
        let conversation = conversation.clone();
        tokio::spawn(run_dispatcher(fired, cancel.clone(), move |job| {
            let conversation = conversation.clone();
            async move {
                if let Err(e) = conversation.prompt_decision(&job).await {
                    error!(message_id = %job.message_id, error = %e, "decision prompt failed");
                }
            }
        }))
    };

    info!(
        public_url = %config.server.public_url,
        lookup = %config.event.response_lookup,
        "rollcall starting"
    );

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let state = GatewayState::new(conversation)
        .with_adapter(provider)
        .with_adapter(queue);
    let result = start_server(&server_config, state, cancel.clone()).await;

    // A bind failure returns before any signal; stop the timers either way.
    cancel.cancel();
    if let Err(e) = dispatcher.await {
        error!(error = %e, "decision dispatcher panicked");
    }

    info!("rollcall stopped");
    result
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rollcall={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
