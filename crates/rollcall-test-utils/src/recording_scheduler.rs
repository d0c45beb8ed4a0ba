// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decision scheduler that records instead of firing.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use rollcall_core::traits::adapter::PluginAdapter;
use rollcall_core::traits::scheduler::DecisionScheduler;
use rollcall_core::types::{AdapterType, DecisionJob, HealthStatus};
use rollcall_core::RollcallError;

/// A trigger captured by [`RecordingScheduler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledJob {
    pub at: DateTime<Utc>,
    pub job: DecisionJob,
}

/// Captures every `schedule` call; tests fire jobs by hand.
#[derive(Clone, Default)]
pub struct RecordingScheduler {
    scheduled: Arc<Mutex<Vec<ScheduledJob>>>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded triggers, in scheduling order.
    pub async fn scheduled(&self) -> Vec<ScheduledJob> {
        self.scheduled.lock().await.clone()
    }

    /// Remove and return all recorded triggers.
    pub async fn take(&self) -> Vec<ScheduledJob> {
        std::mem::take(&mut *self.scheduled.lock().await)
    }
}

#[async_trait]
impl PluginAdapter for RecordingScheduler {
    fn name(&self) -> &str {
        "recording-scheduler"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Scheduler
    }

    async fn health_check(&self) -> Result<HealthStatus, RollcallError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl DecisionScheduler for RecordingScheduler {
    async fn schedule(&self, at: DateTime<Utc>, job: DecisionJob) -> Result<(), RollcallError> {
        self.scheduled.lock().await.push(ScheduledJob { at, job });
        Ok(())
    }
}
