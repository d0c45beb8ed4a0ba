// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP webhook gateway for Rollcall.
//!
//! The SMS provider calls back `GET /{stage}` with the sender, the body and
//! whatever stage context was baked into the reply callback. The gateway
//! decodes those, hands them to the [`Conversation`](rollcall_flow::Conversation)
//! and always answers `204 No Content`; failures are logged, never retried.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, HealthState, ServerConfig, build_router, start_server};
