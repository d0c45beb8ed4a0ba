// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory messaging provider for deterministic testing.
//!
//! `MockProvider` implements `MessagingProvider` over seeded lists, messages,
//! responses and recipients, and captures every outbound send for assertion.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::Mutex;

use rollcall_core::traits::adapter::PluginAdapter;
use rollcall_core::traits::provider::MessagingProvider;
use rollcall_core::types::{
    AdapterType, DistributionList, HealthStatus, MessageId, MessageRecord, Recipient, Response,
    ResponseQuery, SentMessage,
};
use rollcall_core::RollcallError;

/// Where a captured message was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendTarget {
    /// One number, or a comma-joined list of numbers.
    Numbers(String),
    /// A whole distribution list.
    List(String),
}

/// A message captured by [`MockProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub message_id: MessageId,
    pub target: SendTarget,
    pub body: String,
    pub reply_callback: Option<String>,
}

impl SentSms {
    /// Numbers this send went to, empty for list sends.
    pub fn numbers(&self) -> Vec<&str> {
        match &self.target {
            SendTarget::Numbers(to) => to.split(',').collect(),
            SendTarget::List(_) => Vec::new(),
        }
    }
}

#[derive(Default)]
struct State {
    lists: Vec<DistributionList>,
    members: HashMap<String, Vec<String>>,
    messages: HashMap<MessageId, MessageRecord>,
    responses: HashMap<MessageId, Vec<Response>>,
    recipients: HashMap<MessageId, Vec<String>>,
    sent: Vec<SentSms>,
    next_id: u64,
    failure: Option<String>,
}

/// A mock SMS provider for testing.
///
/// Sends are captured and also stored as messages, so a later
/// `get_message` / `list_recipients` sees what an earlier handler sent.
/// List sends inherit the list's seeded members as recipients.
#[derive(Clone)]
pub struct MockProvider {
    state: Arc<Mutex<State>>,
    now: DateTime<Utc>,
}

impl MockProvider {
    /// Create an empty provider whose sends are stamped at a fixed instant.
    pub fn new() -> Self {
        Self::with_send_time(
            Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
                .single()
                .unwrap_or_default(),
        )
    }

    /// Create an empty provider whose sends are stamped at `now`.
    pub fn with_send_time(now: DateTime<Utc>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                next_id: 1000,
                ..State::default()
            })),
            now,
        }
    }

    /// The instant every send is stamped with.
    pub fn send_time(&self) -> DateTime<Utc> {
        self.now
    }

    /// Seed a distribution list and its members.
    pub async fn add_list(&self, id: &str, name: &str, members: &[&str]) {
        let mut state = self.state.lock().await;
        state.lists.push(DistributionList {
            id: id.to_string(),
            name: name.to_string(),
        });
        state.members.insert(
            id.to_string(),
            members.iter().map(|m| (*m).to_string()).collect(),
        );
    }

    /// Seed a previously sent message with its recipients.
    pub async fn add_message(&self, record: MessageRecord, recipients: &[&str]) {
        let mut state = self.state.lock().await;
        state.recipients.insert(
            record.id.clone(),
            recipients.iter().map(|r| (*r).to_string()).collect(),
        );
        state.messages.insert(record.id.clone(), record);
    }

    /// Record an inbound reply to `message_id`, received `minutes` after the send time.
    pub async fn add_response(&self, message_id: &str, from: &str, body: &str, minutes: i64) {
        let response = Response {
            from_number: from.to_string(),
            body: body.to_string(),
            received_at: self.now + Duration::minutes(minutes),
        };
        self.state
            .lock()
            .await
            .responses
            .entry(MessageId::from(message_id))
            .or_default()
            .push(response);
    }

    /// Make every subsequent call fail with a provider error.
    pub async fn fail_with(&self, message: &str) {
        self.state.lock().await.failure = Some(message.to_string());
    }

    /// Get all messages that were sent.
    pub async fn sent_messages(&self) -> Vec<SentSms> {
        self.state.lock().await.sent.clone()
    }

    /// Get the count of sent messages.
    pub async fn sent_count(&self) -> usize {
        self.state.lock().await.sent.len()
    }

    /// The most recent send, if any.
    pub async fn last_sent(&self) -> Option<SentSms> {
        self.state.lock().await.sent.last().cloned()
    }

    /// Clear all sent messages.
    pub async fn clear_sent(&self) {
        self.state.lock().await.sent.clear();
    }

    async fn record_send(
        &self,
        target: SendTarget,
        body: &str,
        reply_callback: Option<&str>,
    ) -> Result<SentMessage, RollcallError> {
        let mut state = self.state.lock().await;
        check_failure(&state)?;

        let message_id = MessageId(state.next_id.to_string());
        state.next_id += 1;

        let (recipients, list_id) = match &target {
            SendTarget::Numbers(to) => (to.split(',').map(str::to_string).collect(), None),
            SendTarget::List(list_id) => (
                state.members.get(list_id).cloned().unwrap_or_default(),
                Some(list_id.clone()),
            ),
        };
        state.recipients.insert(message_id.clone(), recipients);
        state.messages.insert(
            message_id.clone(),
            MessageRecord {
                id: message_id.clone(),
                body: body.to_string(),
                sent_at: self.now,
                recipient_list_id: list_id,
            },
        );
        state.sent.push(SentSms {
            message_id: message_id.clone(),
            target,
            body: body.to_string(),
            reply_callback: reply_callback.map(str::to_string),
        });

        Ok(SentMessage {
            message_id,
            sent_at: self.now,
        })
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn check_failure(state: &State) -> Result<(), RollcallError> {
    match &state.failure {
        Some(message) => Err(RollcallError::provider(message.clone())),
        None => Ok(()),
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, RollcallError> {
        match &self.state.lock().await.failure {
            Some(message) => Ok(HealthStatus::Unhealthy(message.clone())),
            None => Ok(HealthStatus::Healthy),
        }
    }
}

#[async_trait]
impl MessagingProvider for MockProvider {
    async fn list_distribution_lists(&self) -> Result<Vec<DistributionList>, RollcallError> {
        let state = self.state.lock().await;
        check_failure(&state)?;
        Ok(state.lists.clone())
    }

    async fn send_message(
        &self,
        body: &str,
        to: &str,
        reply_callback: Option<&str>,
    ) -> Result<SentMessage, RollcallError> {
        self.record_send(SendTarget::Numbers(to.to_string()), body, reply_callback)
            .await
    }

    async fn send_message_to_list(
        &self,
        list_id: &str,
        body: &str,
        reply_callback: Option<&str>,
    ) -> Result<SentMessage, RollcallError> {
        self.record_send(SendTarget::List(list_id.to_string()), body, reply_callback)
            .await
    }

    async fn get_message(&self, message_id: &MessageId) -> Result<MessageRecord, RollcallError> {
        let state = self.state.lock().await;
        check_failure(&state)?;
        state
            .messages
            .get(message_id)
            .cloned()
            .ok_or_else(|| RollcallError::provider(format!("message {message_id} not found")))
    }

    async fn list_responses(&self, query: &ResponseQuery) -> Result<Vec<Response>, RollcallError> {
        let state = self.state.lock().await;
        check_failure(&state)?;
        let responses = match query {
            ResponseQuery::ForMessage(id) => state.responses.get(id).cloned().unwrap_or_default(),
            ResponseQuery::Window { start, end } => {
                let mut all: Vec<Response> = state
                    .responses
                    .values()
                    .flatten()
                    .filter(|r| r.received_at > *start && end.is_none_or(|end| r.received_at <= end))
                    .cloned()
                    .collect();
                all.sort_by_key(|r| r.received_at);
                all
            }
        };
        Ok(responses)
    }

    async fn list_recipients(
        &self,
        message_id: &MessageId,
    ) -> Result<Vec<Recipient>, RollcallError> {
        let state = self.state.lock().await;
        check_failure(&state)?;
        Ok(state
            .recipients
            .get(message_id)
            .map(|numbers| {
                numbers
                    .iter()
                    .map(|number| Recipient {
                        number: number.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}
