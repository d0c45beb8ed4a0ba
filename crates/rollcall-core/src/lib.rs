// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Rollcall, the stateless SMS RSVP coordinator.
//!
//! This crate provides the error type, the provider-facing value types, and
//! the adapter traits at the seams between the conversation engine and its
//! collaborators (messaging provider, delayed trigger runner).

pub mod error;
pub mod traits;
pub mod types;

pub use error::RollcallError;
pub use types::{
    AdapterType, DecisionJob, DistributionList, HealthStatus, MessageId, MessageRecord, Recipient,
    Response, ResponseLookup, ResponseQuery, SentMessage,
};

pub use traits::{DecisionScheduler, MessagingProvider, PluginAdapter};
