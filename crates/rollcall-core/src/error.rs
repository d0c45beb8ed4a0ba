// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Rollcall.

use thiserror::Error;

/// The primary error type used across Rollcall adapters and conversation handlers.
#[derive(Debug, Error)]
pub enum RollcallError {
    /// Configuration errors (invalid TOML, missing credentials, bad URLs).
    #[error("configuration error: {0}")]
    Config(String),

    /// Messaging provider errors (network failure, auth, 4xx/5xx, malformed payloads).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The delayed trigger runner refused or lost a job.
    #[error("scheduler error: {message}")]
    Scheduler { message: String },

    /// Inbound webhook parameters could not be interpreted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RollcallError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }
}
