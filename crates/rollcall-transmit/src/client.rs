// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the TransmitSMS REST API.
//!
//! Provides [`TransmitClient`] which handles basic authentication,
//! form-encoded requests, the API's error envelope, and page-by-page
//! collection of list endpoints. Failed calls are not retried.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use rollcall_core::RollcallError;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::{
    ApiList, ApiRecipient, ApiResponse, ListsResponse, Paged, ResponsesResponse, SendSmsResponse,
    SentResponse, SmsResponse, StatusEnvelope, SUCCESS_CODE, format_timestamp,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Upper bound on pages fetched for one collection call.
const MAX_PAGES: u32 = 1000;

/// Connection settings for [`TransmitClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub page_size: u32,
    pub timeout: Duration,
}

/// Who a `send-sms.json` call goes to.
#[derive(Debug, Clone, Copy)]
pub enum Destination<'a> {
    /// A number, or comma-joined numbers.
    Numbers(&'a str),
    /// Every member of a distribution list.
    List(&'a str),
}

/// HTTP client for TransmitSMS API communication.
#[derive(Debug, Clone)]
pub struct TransmitClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    page_size: u32,
}

impl TransmitClient {
    pub fn new(settings: ClientSettings) -> Result<Self, RollcallError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| RollcallError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key,
            api_secret: settings.api_secret,
            page_size: settings.page_size.max(1),
        })
    }

    /// All distribution lists on the account.
    pub async fn get_lists(&self) -> Result<Vec<ApiList>, RollcallError> {
        self.collect_pages::<ListsResponse>(Method::Get, "get-lists.json", Vec::new())
            .await
    }

    /// Cheapest authenticated call: one list, first page.
    pub async fn ping(&self) -> Result<(), RollcallError> {
        let form = [("page", "1".to_string()), ("limit", "1".to_string())];
        self.call::<ListsResponse>(Method::Get, "get-lists.json", &form)
            .await
            .map(|_| ())
    }

    /// Send one SMS. An empty `reply_callback` is omitted.
    pub async fn send_sms(
        &self,
        from: &str,
        destination: Destination<'_>,
        message: &str,
        reply_callback: Option<&str>,
    ) -> Result<SendSmsResponse, RollcallError> {
        let mut form = vec![
            ("message", message.to_string()),
            ("from", from.to_string()),
        ];
        match destination {
            Destination::Numbers(to) => form.push(("to", to.to_string())),
            Destination::List(list_id) => form.push(("list_id", list_id.to_string())),
        }
        if let Some(callback) = reply_callback.filter(|c| !c.is_empty()) {
            form.push(("reply_callback", callback.to_string()));
        }
        self.call(Method::Post, "send-sms.json", &form).await
    }

    /// A previously sent message.
    pub async fn get_sms(&self, message_id: &str) -> Result<SmsResponse, RollcallError> {
        self.call(
            Method::Post,
            "get-sms.json",
            &[("message_id", message_id.to_string())],
        )
        .await
    }

    /// Replies threaded to one message.
    pub async fn get_sms_responses(
        &self,
        message_id: &str,
    ) -> Result<Vec<ApiResponse>, RollcallError> {
        self.collect_pages::<ResponsesResponse>(
            Method::Post,
            "get-sms-responses.json",
            vec![("message_id", message_id.to_string())],
        )
        .await
    }

    /// Replies to any message received in `(start, end]`.
    pub async fn get_user_sms_responses(
        &self,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<ApiResponse>, RollcallError> {
        let mut form = vec![("start", format_timestamp(start))];
        if let Some(end) = end {
            form.push(("end", format_timestamp(end)));
        }
        self.collect_pages::<ResponsesResponse>(Method::Post, "get-user-sms-responses.json", form)
            .await
    }

    /// Numbers a message was sent to.
    pub async fn get_sms_sent(&self, message_id: &str) -> Result<Vec<ApiRecipient>, RollcallError> {
        self.collect_pages::<SentResponse>(
            Method::Post,
            "get-sms-sent.json",
            vec![("message_id", message_id.to_string())],
        )
        .await
    }

    /// Follow `page.count` until every page has been read.
    async fn collect_pages<T>(
        &self,
        method: Method,
        endpoint: &str,
        params: Vec<(&str, String)>,
    ) -> Result<Vec<T::Item>, RollcallError>
    where
        T: Paged + DeserializeOwned,
    {
        let mut items = Vec::new();
        for number in 1..=MAX_PAGES {
            let mut form = params.clone();
            form.push(("page", number.to_string()));
            form.push(("limit", self.page_size.to_string()));

            let (page_items, page) = self.call::<T>(method, endpoint, &form).await?.into_page();
            let fetched = page_items.len();
            items.extend(page_items);

            let done = match page {
                Some(page) => page.is_last(),
                None => true,
            };
            if done || fetched == 0 {
                return Ok(items);
            }
        }
        debug!(endpoint, pages = MAX_PAGES, "page limit reached");
        Ok(items)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, RollcallError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let encoded = serde_urlencoded::to_string(params).map_err(|e| RollcallError::Provider {
            message: format!("failed to encode {endpoint} parameters: {e}"),
            source: Some(Box::new(e)),
        })?;

        let request = match method {
            Method::Get if encoded.is_empty() => self.client.get(&url),
            Method::Get => self.client.get(format!("{url}?{encoded}")),
            Method::Post => self
                .client
                .post(&url)
                .header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
                .body(encoded),
        };

        let response = request
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .send()
            .await
            .map_err(|e| RollcallError::Provider {
                message: format!("{endpoint} request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(endpoint, status = %status, "TransmitSMS response received");

        let body = response.text().await.map_err(|e| RollcallError::Provider {
            message: format!("failed to read {endpoint} response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        let api_status = serde_json::from_str::<StatusEnvelope>(&body)
            .ok()
            .and_then(|envelope| envelope.error);
        if let Some(api_status) = &api_status {
            if api_status.code != SUCCESS_CODE {
                return Err(RollcallError::provider(format!(
                    "TransmitSMS API error on {endpoint} ({}): {}",
                    api_status.code, api_status.description
                )));
            }
        }
        if !status.is_success() {
            return Err(RollcallError::provider(format!(
                "TransmitSMS API returned {status} on {endpoint}: {body}"
            )));
        }

        serde_json::from_str(&body).map_err(|e| RollcallError::Provider {
            message: format!("failed to parse {endpoint} response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Method {
    Get,
    Post,
}
