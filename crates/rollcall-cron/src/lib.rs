// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delayed trigger runner for Rollcall.
//!
//! [`DelayedQueue`] implements `DecisionScheduler` with tokio timers, and
//! [`run_dispatcher`] drains fired jobs into the conversation's decision
//! prompt.

pub mod queue;

pub use queue::{DelayedQueue, delay_until, run_dispatcher};
