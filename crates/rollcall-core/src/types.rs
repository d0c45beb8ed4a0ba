// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the provider client, the conversation engine,
//! and the delayed trigger runner.
//!
//! None of these values are persisted locally. They are reconstructed from
//! the messaging provider on every request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Provider-assigned identifier of an outbound message.
///
/// This is the only correlation key later stages use to look up
/// recipients and responses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A named distribution list held by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionList {
    pub id: String,
    pub name: String,
}

/// Acknowledgement returned by the provider after a send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub message_id: MessageId,
    pub sent_at: DateTime<Utc>,
}

/// A previously sent message as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: MessageId,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    /// Set when the message was broadcast to a distribution list.
    pub recipient_list_id: Option<String>,
}

/// An inbound reply threaded to an outbound message by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub from_number: String,
    pub body: String,
    pub received_at: DateTime<Utc>,
}

/// A number an outbound message was delivered to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub number: String,
}

/// How responses are requested from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseQuery {
    /// Responses threaded to one message.
    ForMessage(MessageId),
    /// All account responses received in `(start, end]`, open-ended when `end` is `None`.
    Window {
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    },
}

/// Which [`ResponseQuery`] flavour tallies and audiences are built from.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResponseLookup {
    /// Query by the broadcast's message id.
    #[default]
    MessageId,
    /// Query the window starting at the broadcast's send time.
    SinceSent,
}

/// Payload of the scheduled decision trigger.
///
/// Carries only identifiers; counts are recomputed when the trigger fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionJob {
    pub message_id: MessageId,
    pub selected_list_id: String,
    /// The event creator's number.
    pub send_to: String,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Scheduler,
}
