// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rollcall check-config` output.

use rollcall_config::RollcallConfig;

/// Effective configuration, one `key = value` per line. Secrets are masked.
pub fn summary(config: &RollcallConfig) -> String {
    let lines = [
        ("server.listen", format!("{}:{}", config.server.host, config.server.port)),
        ("server.public_url", config.server.public_url.clone()),
        ("transmit.api_url", config.transmit.api_url.clone()),
        ("transmit.api_key", mask(config.transmit.api_key.as_deref())),
        ("transmit.api_secret", mask(config.transmit.api_secret.as_deref())),
        ("transmit.from_number", config.transmit.from_number.clone()),
        ("transmit.page_size", config.transmit.page_size.to_string()),
        ("transmit.timeout_secs", config.transmit.timeout_secs.to_string()),
        (
            "event.deadline_fallback_minutes",
            config.event.deadline_fallback_minutes.to_string(),
        ),
        (
            "event.utc_offset_minutes",
            config.event.utc_offset_minutes.to_string(),
        ),
        ("event.response_lookup", config.event.response_lookup.to_string()),
        (
            "admin.mobile",
            config.admin.mobile.clone().unwrap_or_else(|| "(none)".to_string()),
        ),
        ("logging.level", config.logging.level.clone()),
    ];
    lines
        .iter()
        .map(|(key, value)| format!("{key} = {value}\n"))
        .collect()
}

fn mask(secret: Option<&str>) -> String {
    match secret.map(str::trim) {
        Some(s) if !s.is_empty() => "(set)".to_string(),
        _ => "(missing)".to_string(),
    }
}
