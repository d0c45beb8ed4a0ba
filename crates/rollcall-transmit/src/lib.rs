// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TransmitSMS messaging provider adapter for Rollcall.
//!
//! This crate implements [`MessagingProvider`] on top of the TransmitSMS
//! (BurstSMS) REST API. Nothing is cached: every call goes to the API.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use rollcall_config::model::TransmitConfig;
use rollcall_core::error::RollcallError;
use rollcall_core::traits::{MessagingProvider, PluginAdapter};
use rollcall_core::types::{
    AdapterType, DistributionList, HealthStatus, MessageId, MessageRecord, Recipient, Response,
    ResponseQuery, SentMessage,
};
use tracing::{debug, info};

use crate::client::{ClientSettings, Destination, TransmitClient};
use crate::types::{SendSmsResponse, parse_timestamp};

/// TransmitSMS provider implementing [`MessagingProvider`].
pub struct TransmitProvider {
    client: TransmitClient,
    from_number: String,
}

impl TransmitProvider {
    /// Creates a provider from the `[transmit]` config section.
    ///
    /// Fails with a configuration error when the API key or secret is unset.
    pub fn from_config(config: &TransmitConfig) -> Result<Self, RollcallError> {
        let api_key = required(&config.api_key, "transmit.api_key")?;
        let api_secret = required(&config.api_secret, "transmit.api_secret")?;

        let client = TransmitClient::new(ClientSettings {
            base_url: config.api_url.clone(),
            api_key,
            api_secret,
            page_size: config.page_size,
            timeout: Duration::from_secs(config.timeout_secs),
        })?;

        info!(api_url = %config.api_url, from = %config.from_number, "TransmitSMS provider initialized");

        Ok(Self::with_client(client, config.from_number.clone()))
    }

    /// Creates a provider with an existing client.
    pub fn with_client(client: TransmitClient, from_number: String) -> Self {
        Self {
            client,
            from_number,
        }
    }

    fn to_sent(&self, response: SendSmsResponse) -> Result<SentMessage, RollcallError> {
        Ok(SentMessage {
            sent_at: timestamp("send_at", &response.send_at)?,
            message_id: MessageId(response.message_id),
        })
    }
}

fn required(value: &Option<String>, key: &str) -> Result<String, RollcallError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| RollcallError::Config(format!("{key} is required")))
}

fn timestamp(field: &str, value: &str) -> Result<chrono::DateTime<chrono::Utc>, RollcallError> {
    parse_timestamp(value).ok_or_else(|| {
        RollcallError::provider(format!("unparseable {field} timestamp from TransmitSMS: {value:?}"))
    })
}

#[async_trait]
impl PluginAdapter for TransmitProvider {
    fn name(&self) -> &str {
        "transmit"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, RollcallError> {
        match self.client.ping().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl MessagingProvider for TransmitProvider {
    async fn list_distribution_lists(&self) -> Result<Vec<DistributionList>, RollcallError> {
        let lists = self.client.get_lists().await?;
        debug!(count = lists.len(), "fetched distribution lists");
        Ok(lists
            .into_iter()
            .map(|list| DistributionList {
                id: list.id,
                name: list.name,
            })
            .collect())
    }

    async fn send_message(
        &self,
        body: &str,
        to: &str,
        reply_callback: Option<&str>,
    ) -> Result<SentMessage, RollcallError> {
        let response = self
            .client
            .send_sms(&self.from_number, Destination::Numbers(to), body, reply_callback)
            .await?;
        self.to_sent(response)
    }

    async fn send_message_to_list(
        &self,
        list_id: &str,
        body: &str,
        reply_callback: Option<&str>,
    ) -> Result<SentMessage, RollcallError> {
        let response = self
            .client
            .send_sms(&self.from_number, Destination::List(list_id), body, reply_callback)
            .await?;
        self.to_sent(response)
    }

    async fn get_message(&self, message_id: &MessageId) -> Result<MessageRecord, RollcallError> {
        let sms = self.client.get_sms(message_id.as_str()).await?;
        Ok(MessageRecord {
            sent_at: timestamp("send_at", &sms.send_at)?,
            id: MessageId(sms.message_id),
            body: sms.message,
            recipient_list_id: sms.list_id,
        })
    }

    async fn list_responses(&self, query: &ResponseQuery) -> Result<Vec<Response>, RollcallError> {
        let raw = match query {
            ResponseQuery::ForMessage(id) => self.client.get_sms_responses(id.as_str()).await?,
            ResponseQuery::Window { start, end } => {
                self.client.get_user_sms_responses(*start, *end).await?
            }
        };
        raw.into_iter()
            .map(|r| {
                Ok(Response {
                    received_at: timestamp("received_at", &r.received_at)?,
                    from_number: r.msisdn,
                    body: r.response,
                })
            })
            .collect()
    }

    async fn list_recipients(
        &self,
        message_id: &MessageId,
    ) -> Result<Vec<Recipient>, RollcallError> {
        let sent = self.client.get_sms_sent(message_id.as_str()).await?;
        Ok(sent
            .into_iter()
            .map(|r| Recipient { number: r.msisdn })
            .collect())
    }
}
