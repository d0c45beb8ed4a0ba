// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation stages and the state carried between them.
//!
//! A stage is identified by the callback URL path the provider calls when a
//! reply arrives. Everything the next stage needs travels in that URL's query
//! string as a [`StageContext`]; nothing is kept server-side.

use rollcall_core::{MessageId, RollcallError};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A step of the event dialogue reachable through a callback URL.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum Stage {
    /// Creator texted the event-creation keyword.
    #[strum(serialize = "create_event")]
    Start,
    /// Creator replied with a list name.
    #[strum(serialize = "create_event_replies")]
    ListSelection,
    /// Creator replied with `SUBJECT;WHEN;WHERE;DEADLINE`.
    #[strum(serialize = "create_event_details_replies")]
    DetailsCollection,
    /// Someone texted `STATUS <id>`.
    #[strum(serialize = "create_event_status")]
    Status,
    /// Someone texted `NUDGE <id>`.
    #[strum(serialize = "nudge")]
    Nudge,
    /// Creator replied to the decision prompt.
    #[strum(serialize = "event_decision_reply")]
    Decision,
    /// Any other reply to a broadcast or relayed message.
    #[strum(serialize = "catch_all")]
    CatchAll,
}

impl Stage {
    /// URL path segment, without the leading slash.
    pub fn path(self) -> &'static str {
        self.into()
    }

    pub fn from_path(path: &str) -> Option<Self> {
        path.parse().ok()
    }
}

/// Parameters baked into a callback URL for exactly one round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_list_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_message_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_creator: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_catch_all_reply: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_response_to: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl StageContext {
    /// Context for the details prompt: which list, who is creating.
    pub fn for_details(selected_list_id: &str, event_creator: &str) -> Self {
        Self {
            selected_list_id: Some(selected_list_id.to_string()),
            event_creator: Some(event_creator.to_string()),
            ..Self::default()
        }
    }

    /// Context for replies to a broadcast: forward stray text to the creator.
    pub fn for_broadcast(event_creator: &str) -> Self {
        Self {
            event_creator: Some(event_creator.to_string()),
            ..Self::default()
        }
    }

    /// Context for the decision prompt sent when the trigger fires.
    pub fn for_decision(
        selected_list_id: &str,
        message_id: &MessageId,
        in_count: u32,
        event_creator: &str,
    ) -> Self {
        Self {
            selected_list_id: Some(selected_list_id.to_string()),
            event_message_id: Some(message_id.to_string()),
            in_count: Some(in_count),
            event_creator: Some(event_creator.to_string()),
            ..Self::default()
        }
    }

    /// Relay-marked context: a reply goes straight back to `send_response_to`.
    pub fn for_relay(send_response_to: &str) -> Self {
        Self {
            is_catch_all_reply: true,
            send_response_to: Some(send_response_to.to_string()),
            ..Self::default()
        }
    }

    /// Parse from a raw query string. Unrelated keys are ignored.
    pub fn from_query(query: &str) -> Result<Self, RollcallError> {
        serde_urlencoded::from_str(query)
            .map_err(|e| RollcallError::InvalidInput(format!("bad stage context: {e}")))
    }

    pub fn to_query(&self) -> Result<String, RollcallError> {
        serde_urlencoded::to_string(self)
            .map_err(|e| RollcallError::Internal(format!("failed to encode stage context: {e}")))
    }
}

/// An inbound SMS as the provider reports it on a callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InboundSms {
    /// Sender's number.
    #[serde(default)]
    pub mobile: String,

    /// Message body.
    #[serde(default)]
    pub response: String,
}

impl InboundSms {
    pub fn new(mobile: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            mobile: mobile.into(),
            response: response.into(),
        }
    }

    pub fn from_query(query: &str) -> Result<Self, RollcallError> {
        serde_urlencoded::from_str(query)
            .map_err(|e| RollcallError::InvalidInput(format!("bad inbound SMS: {e}")))
    }
}

/// Builds callback URLs under the externally reachable base URL.
#[derive(Debug, Clone)]
pub struct CallbackUrls {
    base: String,
}

impl CallbackUrls {
    pub fn new(public_url: &str) -> Self {
        Self {
            base: public_url.trim_end_matches('/').to_string(),
        }
    }

    /// `<base>/<stage path>[?<context>]`.
    pub fn url(&self, stage: Stage, context: &StageContext) -> Result<String, RollcallError> {
        let query = context.to_query()?;
        let mut url = format!("{}/{}", self.base, stage.path());
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        Ok(url)
    }
}
