// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging provider trait: the only state store the conversation has.

use async_trait::async_trait;

use crate::error::RollcallError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    DistributionList, MessageId, MessageRecord, Recipient, Response, ResponseQuery, SentMessage,
};

/// Synchronous request/response contract with the SMS provider.
///
/// Implementations must not cache reads across calls: responses keep
/// arriving until an event's deadline and every tally is recomputed from
/// the provider's current view.
#[async_trait]
pub trait MessagingProvider: PluginAdapter {
    /// Lists the distribution lists on the account.
    async fn list_distribution_lists(&self) -> Result<Vec<DistributionList>, RollcallError>;

    /// Sends `body` to `to`, which may be a single number or a comma-joined list.
    async fn send_message(
        &self,
        body: &str,
        to: &str,
        reply_callback: Option<&str>,
    ) -> Result<SentMessage, RollcallError>;

    /// Broadcasts `body` to every member of a distribution list.
    async fn send_message_to_list(
        &self,
        list_id: &str,
        body: &str,
        reply_callback: Option<&str>,
    ) -> Result<SentMessage, RollcallError>;

    /// Fetches a previously sent message.
    async fn get_message(&self, message_id: &MessageId) -> Result<MessageRecord, RollcallError>;

    /// Lists inbound responses, by message id or by time window.
    async fn list_responses(&self, query: &ResponseQuery) -> Result<Vec<Response>, RollcallError>;

    /// Lists the numbers a message was delivered to, in provider order.
    async fn list_recipients(&self, message_id: &MessageId)
        -> Result<Vec<Recipient>, RollcallError>;
}
