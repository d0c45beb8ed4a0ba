// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use rollcall_core::ResponseLookup;
use serde::{Deserialize, Serialize};

/// Top-level Rollcall configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RollcallConfig {
    /// Webhook server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// TransmitSMS / BurstSMS API settings.
    #[serde(default)]
    pub transmit: TransmitConfig,

    /// Event flow tuning (deadline fallback, timezone, response lookup).
    #[serde(default)]
    pub event: EventConfig,

    /// Administrator contact settings.
    #[serde(default)]
    pub admin: AdminConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Webhook server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally reachable base URL that reply callbacks point at.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: default_public_url(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

/// TransmitSMS REST API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TransmitConfig {
    /// API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API key (basic auth username). Required by `serve`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API secret (basic auth password). Required by `serve`.
    #[serde(default)]
    pub api_secret: Option<String>,

    /// Sender number outbound SMS are sent from.
    #[serde(default = "default_from_number")]
    pub from_number: String,

    /// Rows requested per page when listing responses or recipients.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TransmitConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            api_secret: None,
            from_number: default_from_number(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.transmitsms.com".to_string()
}

fn default_from_number() -> String {
    "18448026390".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

/// Event flow configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EventConfig {
    /// Minutes after the reference instant used when a deadline cannot be parsed.
    #[serde(default = "default_deadline_fallback_minutes")]
    pub deadline_fallback_minutes: u32,

    /// Fixed UTC offset, in minutes, for wall-clock deadline phrases like "5pm".
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Whether responses are looked up by message id or by send-time window.
    #[serde(default)]
    pub response_lookup: ResponseLookup,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            deadline_fallback_minutes: default_deadline_fallback_minutes(),
            utc_offset_minutes: 0,
            response_lookup: ResponseLookup::default(),
        }
    }
}

fn default_deadline_fallback_minutes() -> u32 {
    120
}

/// Administrator contact configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    /// Number that receives donation notifications. `None` disables them.
    #[serde(default)]
    pub mobile: Option<String>,
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
