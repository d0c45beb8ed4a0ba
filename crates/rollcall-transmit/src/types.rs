// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TransmitSMS REST API response types.
//!
//! The API reports numeric ids and phone numbers as JSON numbers; they are
//! read into strings so the rest of the system never does arithmetic on them.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Timestamp format used in every request and response.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Code the API uses in its `error` object when a call succeeded.
pub const SUCCESS_CODE: &str = "SUCCESS";

// --- Envelope ---

/// The `error` object every response carries, success included.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiStatus {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// Just the status part of a response body.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusEnvelope {
    #[serde(default)]
    pub error: Option<ApiStatus>,
}

/// Pagination block: `count` pages in total, this is page `number`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Page {
    pub count: u32,
    pub number: u32,
}

impl Page {
    pub fn is_last(&self) -> bool {
        self.number >= self.count
    }
}

/// A response body holding one page of items.
pub trait Paged {
    type Item;

    fn into_page(self) -> (Vec<Self::Item>, Option<Page>);
}

// --- get-lists.json ---

#[derive(Debug, Clone, Deserialize)]
pub struct ListsResponse {
    #[serde(default)]
    pub lists: Vec<ApiList>,
    #[serde(default)]
    pub page: Option<Page>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiList {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

impl Paged for ListsResponse {
    type Item = ApiList;

    fn into_page(self) -> (Vec<ApiList>, Option<Page>) {
        (self.lists, self.page)
    }
}

// --- send-sms.json ---

#[derive(Debug, Clone, Deserialize)]
pub struct SendSmsResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub message_id: String,
    pub send_at: String,
}

// --- get-sms.json ---

#[derive(Debug, Clone, Deserialize)]
pub struct SmsResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub message_id: String,
    pub message: String,
    pub send_at: String,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub list_id: Option<String>,
}

// --- get-sms-responses.json / get-user-sms-responses.json ---

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsesResponse {
    #[serde(default)]
    pub responses: Vec<ApiResponse>,
    #[serde(default)]
    pub page: Option<Page>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub msisdn: String,
    #[serde(default)]
    pub response: String,
    pub received_at: String,
}

impl Paged for ResponsesResponse {
    type Item = ApiResponse;

    fn into_page(self) -> (Vec<ApiResponse>, Option<Page>) {
        (self.responses, self.page)
    }
}

// --- get-sms-sent.json ---

#[derive(Debug, Clone, Deserialize)]
pub struct SentResponse {
    #[serde(default)]
    pub recipients: Vec<ApiRecipient>,
    #[serde(default)]
    pub page: Option<Page>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiRecipient {
    #[serde(deserialize_with = "string_or_number")]
    pub msisdn: String,
}

impl Paged for SentResponse {
    type Item = ApiRecipient;

    fn into_page(self) -> (Vec<ApiRecipient>, Option<Page>) {
        (self.recipients, self.page)
    }
}

// --- Helpers ---

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Unsigned(u64),
    Signed(i64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Unsigned(n) => n.to_string(),
            StringOrNumber::Signed(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

/// Absent, null, empty and `0` all mean "no value".
fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value
        .map(String::from)
        .filter(|s| !s.is_empty() && s != "0"))
}

/// Format an instant the way the API expects.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse an API timestamp (UTC, `%Y-%m-%d %H:%M:%S`, RFC 3339 tolerated).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn numeric_ids_become_strings() {
        let list: ApiList = serde_json::from_str(r#"{"id": 123, "name": "Futsal"}"#).unwrap();
        assert_eq!(list.id, "123");
        let recipient: ApiRecipient = serde_json::from_str(r#"{"msisdn": "61400000000"}"#).unwrap();
        assert_eq!(recipient.msisdn, "61400000000");
    }

    #[test]
    fn zero_list_id_means_none() {
        let sms: SmsResponse = serde_json::from_str(
            r#"{"message_id": 5, "message": "hi", "send_at": "2026-03-14 09:00:00", "list_id": 0}"#,
        )
        .unwrap();
        assert_eq!(sms.list_id, None);

        let sms: SmsResponse = serde_json::from_str(
            r#"{"message_id": 5, "message": "hi", "send_at": "2026-03-14 09:00:00", "list_id": 77}"#,
        )
        .unwrap();
        assert_eq!(sms.list_id.as_deref(), Some("77"));
    }

    #[test]
    fn timestamps_use_api_format() {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 5, 7).unwrap();
        assert_eq!(format_timestamp(at), "2026-03-14 09:05:07");
        assert_eq!(parse_timestamp("2026-03-14 09:05:07"), Some(at));
        assert_eq!(parse_timestamp("2026-03-14T09:05:07Z"), Some(at));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn last_page_detection() {
        assert!(Page { count: 1, number: 1 }.is_last());
        assert!(!Page { count: 3, number: 2 }.is_last());
        assert!(Page { count: 0, number: 1 }.is_last());
    }
}
