// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timer-backed [`DecisionScheduler`].
//!
//! Each scheduled job gets its own task that sleeps until the target
//! instant and then hands the job to a channel. Jobs live only in memory:
//! cancelling the shutdown token drops whatever has not fired yet.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rollcall_core::error::RollcallError;
use rollcall_core::traits::{DecisionScheduler, PluginAdapter};
use rollcall_core::types::{AdapterType, DecisionJob, HealthStatus};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Capacity of the channel between timer tasks and the dispatcher.
const CHANNEL_CAPACITY: usize = 64;

/// In-process delayed queue for decision triggers.
#[derive(Clone)]
pub struct DelayedQueue {
    tx: mpsc::Sender<DecisionJob>,
    cancel: CancellationToken,
}

impl DelayedQueue {
    /// Creates the queue and the receiving end fired jobs arrive on.
    pub fn new(cancel: CancellationToken) -> (Self, mpsc::Receiver<DecisionJob>) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        (Self { tx, cancel }, rx)
    }
}

/// Time left until `at`; zero when `at` has passed.
pub fn delay_until(at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (at - now).to_std().unwrap_or(Duration::ZERO)
}

#[async_trait]
impl PluginAdapter for DelayedQueue {
    fn name(&self) -> &str {
        "delayed-queue"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Scheduler
    }

    async fn health_check(&self) -> Result<HealthStatus, RollcallError> {
        if self.cancel.is_cancelled() {
            Ok(HealthStatus::Unhealthy("shutting down".to_string()))
        } else if self.tx.is_closed() {
            Ok(HealthStatus::Unhealthy("dispatcher stopped".to_string()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }
}

#[async_trait]
impl DecisionScheduler for DelayedQueue {
    async fn schedule(&self, at: DateTime<Utc>, job: DecisionJob) -> Result<(), RollcallError> {
        if self.cancel.is_cancelled() {
            return Err(RollcallError::Scheduler {
                message: "queue is shutting down".to_string(),
            });
        }
        if self.tx.is_closed() {
            return Err(RollcallError::Scheduler {
                message: "dispatcher is not running".to_string(),
            });
        }

        let delay = delay_until(at, Utc::now());
        info!(
            message_id = %job.message_id,
            at = %at,
            delay_secs = delay.as_secs(),
            "decision trigger scheduled"
        );

        let tx = self.tx.clone();
        let cancel = self.cancel.clone();
        let due = tokio::time::sleep(delay);

        tokio::spawn(async move {
            tokio::select! {
                _ = due => {
                    debug!(message_id = %job.message_id, "decision trigger due");
                    let message_id = job.message_id.clone();
                    if tx.send(job).await.is_err() {
                        warn!(%message_id, "dispatcher gone, decision trigger lost");
                    }
                }
                _ = cancel.cancelled() => {
                    warn!(message_id = %job.message_id, "shutdown before decision trigger fired");
                }
            }
        });

        Ok(())
    }
}

/// Feeds fired jobs to `handle` one at a time until `cancel` fires or
/// every sender is gone.
pub async fn run_dispatcher<F, Fut>(
    mut rx: mpsc::Receiver<DecisionJob>,
    cancel: CancellationToken,
    mut handle: F,
) where
    F: FnMut(DecisionJob) -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        tokio::select! {
            job = rx.recv() => match job {
                Some(job) => handle(job).await,
                None => break,
            },
            _ = cancel.cancelled() => break,
        }
    }
    info!("decision dispatcher stopped");
}
