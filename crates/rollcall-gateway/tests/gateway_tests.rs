// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rollcall_core::ResponseLookup;
use rollcall_flow::{Conversation, ConversationSettings, DeadlineResolver};
use rollcall_gateway::{GatewayState, build_router};
use rollcall_test_utils::{MockProvider, RecordingScheduler, SendTarget};
use tower::ServiceExt;

fn gateway() -> (MockProvider, RecordingScheduler, axum::Router) {
    let provider = MockProvider::new();
    let scheduler = RecordingScheduler::new();
    let now = provider.send_time();
    let conversation = Conversation::new(
        Arc::new(provider.clone()),
        Arc::new(scheduler.clone()),
        ConversationSettings {
            public_url: "https://rollcall.test".to_string(),
            deadlines: DeadlineResolver::from_minutes(0, 120).unwrap(),
            response_lookup: ResponseLookup::MessageId,
            admin_mobile: Some("61499999999".to_string()),
        },
    )
    .with_clock(move || now);
    let state = GatewayState::new(conversation)
        .with_adapter(Arc::new(provider.clone()))
        .with_adapter(Arc::new(scheduler.clone()));
    (provider, scheduler, build_router(state))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn create_event_answers_no_content_and_prompts() {
    let (provider, _, app) = gateway();
    provider.add_list("7", "Futsal", &[]).await;

    let response = app
        .oneshot(get("/create_event?mobile=61400000001&response=CREATE+EVENT"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let sent = provider.last_sent().await.unwrap();
    assert_eq!(sent.target, SendTarget::Numbers("61400000001".to_string()));
    assert!(sent.body.ends_with("Reply with one of: Futsal"));
}

#[tokio::test]
async fn unknown_stage_is_not_found() {
    let (provider, _, app) = gateway();

    let response = app
        .oneshot(get("/event_decision_on?mobile=1&response=x"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(provider.sent_count().await, 0);
}

#[tokio::test]
async fn details_callback_decodes_stage_context() {
    let (provider, scheduler, app) = gateway();
    provider.add_list("7", "Futsal", &["A", "B"]).await;

    let uri = "/create_event_details_replies?selected_list_id=7&event_creator=61400000001\
               &mobile=61400000001&response=Futsal%3B7pm%3Bthe+park%3Bin+3+hours";
    let response = app.oneshot(get(uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let sent = provider.sent_messages().await;
    assert_eq!(sent[0].target, SendTarget::List("7".to_string()));
    assert!(sent[0].body.ends_with("Deadline to reply is in 3 hours"));
    assert_eq!(scheduler.scheduled().await.len(), 1);
}

#[tokio::test]
async fn provider_failure_still_answers_no_content() {
    let (provider, _, app) = gateway();
    provider.fail_with("API returned 500").await;

    let response = app
        .oneshot(get("/create_event_status?mobile=1&response=STATUS+123"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn malformed_context_is_dropped_not_rejected() {
    let (provider, _, app) = gateway();

    let response = app
        .oneshot(get(
            "/catch_all?mobile=61455555555&response=running+late&event_creator=61400000001&in_count=lots",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    // Without a readable context there is nobody to forward to.
    assert_eq!(provider.sent_count().await, 0);
}

#[tokio::test]
async fn catch_all_relays_to_creator() {
    let (provider, _, app) = gateway();

    let response = app
        .oneshot(get(
            "/catch_all?mobile=61455555555&response=running+late&event_creator=61400000001",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let sent = provider.last_sent().await.unwrap();
    assert_eq!(sent.target, SendTarget::Numbers("61400000001".to_string()));
    assert!(sent.body.contains("\"running late\""));
}

#[tokio::test]
async fn donation_webhook_notifies_admin() {
    let (provider, _, app) = gateway();
    let payload = serde_json::json!({
        "type": "checkout.session.completed",
        "data": {"object": {"amount_total": 600, "customer_details": {"name": "Alex"}}}
    });

    let request = Request::builder()
        .method("POST")
        .uri("/donation-webhook")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let sent = provider.last_sent().await.unwrap();
    assert_eq!(sent.body, "Alex donated $6");
}

#[tokio::test]
async fn health_reports_ok() {
    let (_, _, app) = gateway();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["uptime_secs"].is_u64());
    assert_eq!(json["adapters"][0]["name"], "mock-provider");
    assert_eq!(json["adapters"][0]["kind"], "Provider");
    assert_eq!(json["adapters"][1]["kind"], "Scheduler");
    assert_eq!(json["adapters"][1]["healthy"], true);
}

#[tokio::test]
async fn unhealthy_provider_makes_health_unavailable() {
    let (provider, _, app) = gateway();
    provider.fail_with("API returned 401").await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["adapters"][0]["healthy"], false);
    assert_eq!(json["adapters"][0]["detail"], "API returned 401");
}
