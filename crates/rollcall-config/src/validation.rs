// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde attributes cannot express: well-formed callback
//! base URL, sane paging, an offset that is a real timezone.

use crate::diagnostic::ConfigError;
use crate::model::RollcallConfig;

/// Largest page the TransmitSMS API accepts.
const MAX_PAGE_SIZE: u32 = 1000;

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &RollcallConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        ));
    }

    if !is_http_url(&config.server.public_url) {
        fail(format!(
            "server.public_url `{}` must start with http:// or https://",
            config.server.public_url
        ));
    }

    if !is_http_url(&config.transmit.api_url) {
        fail(format!(
            "transmit.api_url `{}` must start with http:// or https://",
            config.transmit.api_url
        ));
    }

    if config.transmit.from_number.trim().is_empty() {
        fail("transmit.from_number must not be empty".to_string());
    }

    if config.transmit.page_size == 0 || config.transmit.page_size > MAX_PAGE_SIZE {
        fail(format!(
            "transmit.page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
            config.transmit.page_size
        ));
    }

    if config.transmit.timeout_secs == 0 {
        fail("transmit.timeout_secs must be at least 1".to_string());
    }

    if config.event.deadline_fallback_minutes == 0 {
        fail("event.deadline_fallback_minutes must be at least 1".to_string());
    }

    // UTC-12:00 through UTC+14:00.
    if !(-720..=840).contains(&config.event.utc_offset_minutes) {
        fail(format!(
            "event.utc_offset_minutes must be between -720 and 840, got {}",
            config.event.utc_offset_minutes
        ));
    }

    if let Some(mobile) = &config.admin.mobile {
        if mobile.trim().is_empty() {
            fail("admin.mobile must not be empty when set".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Credentials `serve` cannot run without. Checked separately so `check-config`
/// can still report on a config that only lacks secrets.
pub fn validate_credentials(config: &RollcallConfig) -> Result<(), Vec<ConfigError>> {
    let missing: Vec<ConfigError> = [
        ("transmit.api_key", &config.transmit.api_key),
        ("transmit.api_secret", &config.transmit.api_secret),
    ]
    .into_iter()
    .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
    .map(|(key, _)| ConfigError::MissingKey {
        key: key.to_string(),
    })
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    ["http://", "https://"]
        .iter()
        .any(|scheme| url.len() > scheme.len() && url.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&RollcallConfig::default()).is_ok());
    }

    #[test]
    fn public_url_without_scheme_fails() {
        let mut config = RollcallConfig::default();
        config.server.public_url = "rollcall.example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "server.public_url"));
    }

    #[test]
    fn zero_page_size_fails() {
        let mut config = RollcallConfig::default();
        config.transmit.page_size = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "page_size"));
    }

    #[test]
    fn out_of_range_offset_fails() {
        let mut config = RollcallConfig::default();
        config.event.utc_offset_minutes = 900;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "utc_offset_minutes"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = RollcallConfig::default();
        config.server.host = String::new();
        config.event.deadline_fallback_minutes = 0;
        config.transmit.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn missing_credentials_reported_per_key() {
        let config = RollcallConfig::default();
        let errors = validate_credentials(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::MissingKey { key } if key == "transmit.api_secret")));
    }

    #[test]
    fn present_credentials_pass() {
        let mut config = RollcallConfig::default();
        config.transmit.api_key = Some("key".to_string());
        config.transmit.api_secret = Some("secret".to_string());
        assert!(validate_credentials(&config).is_ok());
    }
}
