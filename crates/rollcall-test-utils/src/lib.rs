// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Rollcall integration tests.
//!
//! Provides in-memory adapters for fast, deterministic tests without a real
//! SMS provider or timers.
//!
//! # Components
//!
//! - [`MockProvider`] - In-memory messaging provider that records every send
//! - [`RecordingScheduler`] - Decision scheduler that records triggers instead of firing them

pub mod mock_provider;
pub mod recording_scheduler;

pub use mock_provider::{MockProvider, SendTarget, SentSms};
pub use recording_scheduler::{RecordingScheduler, ScheduledJob};
