// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scheduler trait for the deferred decision prompt.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::RollcallError;
use crate::traits::adapter::PluginAdapter;
use crate::types::DecisionJob;

/// Registers a [`DecisionJob`] to be delivered no earlier than `at`.
///
/// Delivery is at-least-once and may be late, never early. There is no
/// cancellation: once scheduled, a job always fires.
#[async_trait]
pub trait DecisionScheduler: PluginAdapter {
    async fn schedule(&self, at: DateTime<Utc>, job: DecisionJob) -> Result<(), RollcallError>;
}
