// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Rollcall event dialogue.
//!
//! This crate provides:
//! - [`classify`]: anchored matching of RSVP, keyword and decision replies
//! - [`tally`]: IN/OUT head counts and follow-up audiences
//! - [`deadline`]: free-text deadline resolution with a fallback
//! - [`Conversation`]: the stage handlers that drive the dialogue
//!
//! No state survives a request. The next stage's parameters ride in the
//! reply callback URL, and counts are recomputed from the provider.

pub mod classify;
pub mod conversation;
pub mod deadline;
pub mod donation;
pub mod messages;
pub mod stage;
pub mod tally;

pub use classify::{
    Decision, Rsvp, classify_rsvp, is_acceptable_decision_reply, is_keyword_reply, is_rsvp_reply,
    parse_quantity,
};
pub use conversation::{Clock, Conversation, ConversationSettings};
pub use deadline::DeadlineResolver;
pub use donation::DonationEvent;
pub use stage::{CallbackUrls, InboundSms, Stage, StageContext};
pub use tally::{Audience, Tally, collect_counts};

use rollcall_config::RollcallConfig;
use rollcall_core::RollcallError;

impl ConversationSettings {
    /// Derive conversation settings from the loaded configuration.
    pub fn from_config(config: &RollcallConfig) -> Result<Self, RollcallError> {
        Ok(Self {
            public_url: config.server.public_url.clone(),
            deadlines: DeadlineResolver::from_minutes(
                config.event.utc_offset_minutes,
                config.event.deadline_fallback_minutes,
            )?,
            response_lookup: config.event.response_lookup,
            admin_mobile: config.admin.mobile.clone(),
        })
    }
}
