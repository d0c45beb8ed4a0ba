// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment-processor webhook payloads announcing donations.

use serde::Deserialize;

/// Event type that marks a finished checkout.
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// The subset of a checkout webhook event the admin notification needs.
#[derive(Debug, Clone, Deserialize)]
pub struct DonationEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: DonationData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonationData {
    #[serde(default)]
    pub object: CheckoutSession,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutSession {
    /// Total charged, in cents.
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub name: Option<String>,
}

impl DonationEvent {
    pub fn is_completed(&self) -> bool {
        self.event_type == CHECKOUT_COMPLETED
    }

    /// "<name> donated <amount>", or `None` for any other event type.
    pub fn notification(&self) -> Option<String> {
        if !self.is_completed() {
            return None;
        }
        let session = &self.data.object;
        let name = session
            .customer_details
            .as_ref()
            .and_then(|details| details.name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("Someone");
        let amount = format_amount(session.amount_total.unwrap_or(0));
        Some(format!("{name} donated {amount}"))
    }
}

/// Cents as dollars with thousands separators and trailing fraction zeros
/// stripped: `600` is "$6", `650` is "$6.5", `123456` is "$1,234.56".
pub fn format_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let dollars = group_thousands(cents / 100);
    match cents % 100 {
        0 => format!("{sign}${dollars}"),
        rest if rest % 10 == 0 => format!("{sign}${dollars}.{}", rest / 10),
        rest => format!("{sign}${dollars}.{rest:02}"),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(json: serde_json::Value) -> DonationEvent {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn formats_amounts_without_insignificant_zeros() {
        assert_eq!(format_amount(600), "$6");
        assert_eq!(format_amount(650), "$6.5");
        assert_eq!(format_amount(605), "$6.05");
        assert_eq!(format_amount(-1_250), "-$12.5");
        assert_eq!(format_amount(123_490), "$1,234.9");
        assert_eq!(format_amount(0), "$0");
        assert_eq!(format_amount(123_456), "$1,234.56");
        assert_eq!(format_amount(100_000_000), "$1,000,000");
    }

    #[test]
    fn completed_checkout_names_donor() {
        let event = event(serde_json::json!({
            "type": "checkout.session.completed",
            "data": {"object": {"amount_total": 2500, "customer_details": {"name": "Jo Citizen"}}}
        }));
        assert_eq!(event.notification().as_deref(), Some("Jo Citizen donated $25"));
    }

    #[test]
    fn anonymous_donor_is_someone() {
        let event = event(serde_json::json!({
            "type": "checkout.session.completed",
            "data": {"object": {"amount_total": 1050, "customer_details": {"name": null}}}
        }));
        assert_eq!(event.notification().as_deref(), Some("Someone donated $10.50"));
    }

    #[test]
    fn other_event_types_are_ignored() {
        let event = event(serde_json::json!({
            "type": "payment_intent.created",
            "data": {"object": {"amount_total": 1000}}
        }));
        assert_eq!(event.notification(), None);
    }
}
