// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end stage handler tests against the in-memory provider.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rollcall_core::{DecisionJob, MessageId, MessageRecord, ResponseLookup, RollcallError};
use rollcall_flow::messages;
use rollcall_flow::{
    Conversation, ConversationSettings, DeadlineResolver, DonationEvent, InboundSms, Stage,
    StageContext,
};
use rollcall_test_utils::{MockProvider, RecordingScheduler, SendTarget};

const BASE: &str = "https://rollcall.test";
const CREATOR: &str = "61400000001";

struct Harness {
    provider: MockProvider,
    scheduler: RecordingScheduler,
    conversation: Conversation,
}

fn settings(lookup: ResponseLookup, admin: Option<&str>) -> ConversationSettings {
    ConversationSettings {
        public_url: format!("{BASE}/"),
        deadlines: DeadlineResolver::from_minutes(0, 120).unwrap(),
        response_lookup: lookup,
        admin_mobile: admin.map(str::to_string),
    }
}

fn harness_at(now: DateTime<Utc>, lookup: ResponseLookup) -> Harness {
    let provider = MockProvider::new();
    let scheduler = RecordingScheduler::new();
    let conversation = Conversation::new(
        Arc::new(provider.clone()),
        Arc::new(scheduler.clone()),
        settings(lookup, Some("61499999999")),
    )
    .with_clock(move || now);
    Harness {
        provider,
        scheduler,
        conversation,
    }
}

fn harness() -> Harness {
    let now = MockProvider::new().send_time();
    harness_at(now, ResponseLookup::MessageId)
}

fn sms(from: &str, body: &str) -> InboundSms {
    InboundSms::new(from, body)
}

/// An event broadcast as message 555 to A..E with a three hour deadline.
async fn seed_event(provider: &MockProvider) {
    provider
        .add_message(
            MessageRecord {
                id: MessageId::from("555"),
                body: messages::rsvp_prompt("Futsal", "7pm", "the park", "in 3 hours"),
                sent_at: provider.send_time(),
                recipient_list_id: Some("7".to_string()),
            },
            &["A", "B", "C", "D", "E"],
        )
        .await;
}

#[tokio::test]
async fn start_lists_distribution_lists() {
    let h = harness();
    h.provider.add_list("7", "Futsal", &[]).await;
    h.provider.add_list("8", "Tennis", &[]).await;

    h.conversation
        .handle(Stage::Start, &sms(CREATOR, "CREATE EVENT"), &StageContext::default())
        .await
        .unwrap();

    let sent = h.provider.last_sent().await.unwrap();
    assert_eq!(sent.target, SendTarget::Numbers(CREATOR.to_string()));
    assert_eq!(
        sent.body,
        "What list would you like to send to? Reply with one of: Futsal, Tennis"
    );
    assert_eq!(
        sent.reply_callback.as_deref(),
        Some("https://rollcall.test/create_event_replies")
    );
}

#[tokio::test]
async fn unknown_list_prompts_again_on_same_stage() {
    let h = harness();
    h.provider.add_list("7", "Futsal", &[]).await;

    h.conversation.select_list(&sms(CREATOR, "Footy")).await.unwrap();

    let sent = h.provider.last_sent().await.unwrap();
    assert_eq!(sent.body, messages::NO_LIST_MATCH);
    assert_eq!(
        sent.reply_callback.as_deref(),
        Some("https://rollcall.test/create_event_replies")
    );
}

#[tokio::test]
async fn list_match_is_case_insensitive_and_carries_context() {
    let h = harness();
    h.provider.add_list("7", "Futsal", &[]).await;

    h.conversation
        .select_list(&sms(CREATOR, "  fUTSAL "))
        .await
        .unwrap();

    let sent = h.provider.last_sent().await.unwrap();
    assert_eq!(sent.body, messages::DETAILS_PROMPT);
    assert_eq!(
        sent.reply_callback.as_deref(),
        Some("https://rollcall.test/create_event_details_replies?selected_list_id=7&event_creator=61400000001")
    );
}

#[tokio::test]
async fn details_broadcast_confirm_and_schedule() {
    let h = harness();
    h.provider.add_list("7", "Futsal", &["A", "B"]).await;
    let context = StageContext::for_details("7", CREATOR);

    h.conversation
        .collect_details(&sms(CREATOR, "SUBJECT ; TIME;LOCATION; in 5 days"), &context)
        .await
        .unwrap();

    let sent = h.provider.sent_messages().await;
    assert_eq!(sent.len(), 2);

    let broadcast = &sent[0];
    assert_eq!(broadcast.target, SendTarget::List("7".to_string()));
    assert_eq!(
        broadcast.body,
        "Who's IN for SUBJECT TIME at LOCATION? Reply IN, IN +1/+2/+3/+#, OUT, or STOP. Deadline to reply is in 5 days"
    );
    assert_eq!(
        broadcast.reply_callback.as_deref(),
        Some("https://rollcall.test/catch_all?event_creator=61400000001")
    );

    let confirmation = &sent[1];
    assert_eq!(confirmation.target, SendTarget::Numbers(CREATOR.to_string()));
    assert_eq!(
        confirmation.body,
        messages::creator_confirmation(&broadcast.message_id)
    );

    let scheduled = h.scheduler.scheduled().await;
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].at, h.provider.send_time() + Duration::days(5));
    assert_eq!(
        scheduled[0].job,
        DecisionJob {
            message_id: broadcast.message_id.clone(),
            selected_list_id: "7".to_string(),
            send_to: CREATOR.to_string(),
        }
    );
}

#[tokio::test]
async fn missing_deadline_falls_back_to_two_hours() {
    let h = harness();
    let context = StageContext::for_details("7", CREATOR);

    h.conversation
        .collect_details(&sms(CREATOR, "SUBJECT;TIME;LOCATION"), &context)
        .await
        .unwrap();

    let sent = h.provider.sent_messages().await;
    assert!(sent[0].body.ends_with("Deadline to reply is in 2 hours"));
    let scheduled = h.scheduler.scheduled().await;
    assert_eq!(scheduled[0].at, h.provider.send_time() + Duration::hours(2));
}

#[tokio::test]
async fn oversized_deadline_is_broadcast_and_falls_back() {
    let h = harness();
    let context = StageContext::for_details("7", CREATOR);

    h.conversation
        .collect_details(&sms(CREATOR, "Futsal;7pm;the park;99999999 days"), &context)
        .await
        .unwrap();

    let sent = h.provider.sent_messages().await;
    assert!(sent[0].body.ends_with("Deadline to reply is 99999999 days"));
    let scheduled = h.scheduler.scheduled().await;
    assert_eq!(scheduled[0].at, h.provider.send_time() + Duration::hours(2));
}

#[tokio::test]
async fn bare_duration_gets_a_preposition() {
    let h = harness();
    let context = StageContext::for_details("7", CREATOR);

    h.conversation
        .collect_details(&sms(CREATOR, "Futsal;7pm;the park;90 minutes"), &context)
        .await
        .unwrap();

    let sent = h.provider.sent_messages().await;
    assert!(sent[0].body.ends_with("Deadline to reply is in 90 minutes"));
    let scheduled = h.scheduler.scheduled().await;
    assert_eq!(scheduled[0].at, h.provider.send_time() + Duration::minutes(90));
}

#[tokio::test]
async fn short_details_reprompt_without_broadcast() {
    let h = harness();
    let context = StageContext::for_details("7", CREATOR);

    h.conversation
        .collect_details(&sms(CREATOR, "just a subject"), &context)
        .await
        .unwrap();

    let sent = h.provider.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, messages::DETAILS_PROMPT);
    assert_eq!(
        sent[0].reply_callback.as_deref(),
        Some("https://rollcall.test/create_event_details_replies?selected_list_id=7&event_creator=61400000001")
    );
    assert!(h.scheduler.scheduled().await.is_empty());
}

#[tokio::test]
async fn details_without_context_is_invalid_input() {
    let h = harness();
    let err = h
        .conversation
        .collect_details(&sms(CREATOR, "a;b;c;d"), &StageContext::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RollcallError::InvalidInput(_)));
    assert_eq!(h.provider.sent_count().await, 0);
}

#[tokio::test]
async fn trigger_prompts_creator_with_fresh_tally() {
    let h = harness();
    seed_event(&h.provider).await;
    h.provider.add_response("555", "A", "IN", 1).await;
    h.provider.add_response("555", "B", "IN +1", 2).await;
    h.provider.add_response("555", "C", "OUT", 3).await;
    h.provider.add_response("555", "D", "where is it?", 4).await;

    let job = DecisionJob {
        message_id: MessageId::from("555"),
        selected_list_id: "7".to_string(),
        send_to: CREATOR.to_string(),
    };
    h.conversation.prompt_decision(&job).await.unwrap();

    let sent = h.provider.last_sent().await.unwrap();
    assert_eq!(sent.target, SendTarget::Numbers(CREATOR.to_string()));
    assert_eq!(
        sent.body,
        "3 are in, 1 are out. Reply GAME ON 555 or GAME CANCELED 555"
    );
    assert_eq!(
        sent.reply_callback.as_deref(),
        Some("https://rollcall.test/event_decision_reply?selected_list_id=7&event_message_id=555&in_count=3&event_creator=61400000001")
    );
}

#[tokio::test]
async fn game_on_broadcasts_to_everyone_not_out() {
    let h = harness();
    seed_event(&h.provider).await;
    h.provider.add_response("555", "A", "IN", 1).await;
    h.provider.add_response("555", "B", "OUT", 2).await;
    h.provider.add_response("555", "D", "OUT", 3).await;
    h.provider.add_response("555", "E", "IN +2", 4).await;

    let context = StageContext::for_decision("7", &MessageId::from("555"), 4, CREATOR);
    h.conversation
        .handle(Stage::Decision, &sms(CREATOR, "Game On 555"), &context)
        .await
        .unwrap();

    let sent = h.provider.last_sent().await.unwrap();
    assert_eq!(sent.target, SendTarget::Numbers("A,C,E".to_string()));
    assert_eq!(sent.body, "We have 4 committed to play, Game is ON!");
    assert_eq!(
        sent.reply_callback.as_deref(),
        Some("https://rollcall.test/catch_all?event_creator=61400000001")
    );
}

#[tokio::test]
async fn game_canceled_by_keyword_recomputes_from_body_id() {
    let h = harness();
    seed_event(&h.provider).await;
    h.provider.add_response("555", "C", "OUT", 1).await;

    h.conversation
        .decide(&sms(CREATOR, "GAME CANCELED 555"), &StageContext::default())
        .await
        .unwrap();

    let sent = h.provider.last_sent().await.unwrap();
    assert_eq!(sent.target, SendTarget::Numbers("A,B,D,E".to_string()));
    assert_eq!(sent.body, messages::GAME_CANCELED);
}

#[tokio::test]
async fn non_decision_reply_is_ignored() {
    let h = harness();
    seed_event(&h.provider).await;
    let context = StageContext::for_decision("7", &MessageId::from("555"), 4, CREATOR);

    h.conversation
        .decide(&sms(CREATOR, "maybe later"), &context)
        .await
        .unwrap();

    assert_eq!(h.provider.sent_count().await, 0);
}

#[tokio::test]
async fn decision_without_any_id_asks_for_one() {
    let h = harness();
    h.conversation
        .decide(&sms(CREATOR, "game on"), &StageContext::default())
        .await
        .unwrap();

    let sent = h.provider.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, messages::missing_event_id("GAME ON"));
}

#[tokio::test]
async fn status_before_deadline_reports_time_left() {
    let provider_time = MockProvider::new().send_time();
    let h = harness_at(provider_time + Duration::hours(1), ResponseLookup::MessageId);
    seed_event(&h.provider).await;
    h.provider.add_response("555", "A", "IN +2", 1).await;
    h.provider.add_response("555", "B", "OUT", 2).await;

    h.conversation
        .handle(Stage::Status, &sms("B", "STATUS 555"), &StageContext::default())
        .await
        .unwrap();

    let sent = h.provider.last_sent().await.unwrap();
    assert_eq!(sent.target, SendTarget::Numbers("B".to_string()));
    assert_eq!(sent.body, "Event 555: 3 in, 1 out. Replies close in 2 hours.");
}

#[tokio::test]
async fn status_at_exact_deadline_reads_as_past() {
    let provider_time = MockProvider::new().send_time();
    let h = harness_at(provider_time + Duration::hours(3), ResponseLookup::MessageId);
    seed_event(&h.provider).await;

    h.conversation.status(&sms("B", "status 555")).await.unwrap();

    let sent = h.provider.last_sent().await.unwrap();
    assert_eq!(
        sent.body,
        "Event 555: 0 in, 0 out. Replies closed less than a minute ago."
    );
}

#[tokio::test]
async fn status_after_deadline_reports_elapsed() {
    let provider_time = MockProvider::new().send_time();
    let h = harness_at(provider_time + Duration::hours(5), ResponseLookup::MessageId);
    seed_event(&h.provider).await;

    h.conversation.status(&sms("B", "STATUS 555")).await.unwrap();

    let sent = h.provider.last_sent().await.unwrap();
    assert_eq!(sent.body, "Event 555: 0 in, 0 out. Replies closed 2 hours ago.");
}

#[tokio::test]
async fn status_without_id_asks_for_one_without_lookups() {
    let h = harness();
    h.conversation.status(&sms("B", "STATUS")).await.unwrap();

    let sent = h.provider.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, messages::missing_event_id("STATUS"));
}

#[tokio::test]
async fn nudge_resends_prompt_to_non_respondents() {
    let h = harness();
    seed_event(&h.provider).await;
    h.provider.add_response("555", "C", "OUT", 1).await;
    h.provider.add_response("555", "D", "OUT", 2).await;
    h.provider.add_response("555", "E", "IN +2", 3).await;

    h.conversation
        .handle(Stage::Nudge, &sms(CREATOR, "NUDGE 555"), &StageContext::default())
        .await
        .unwrap();

    let sent = h.provider.sent_messages().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].target, SendTarget::Numbers("A,B".to_string()));
    assert!(sent[0].body.starts_with("Who's IN for Futsal 7pm at the park?"));
    assert_eq!(sent[1].target, SendTarget::Numbers(CREATOR.to_string()));
    assert_eq!(sent[1].body, "Reminder sent to 2 people for event 555.");
}

#[tokio::test]
async fn nudge_with_everyone_replied_only_confirms() {
    let h = harness();
    h.provider
        .add_message(
            MessageRecord {
                id: MessageId::from("556"),
                body: "Who's IN?".to_string(),
                sent_at: h.provider.send_time(),
                recipient_list_id: None,
            },
            &["A"],
        )
        .await;
    h.provider.add_response("556", "A", "in", 1).await;

    h.conversation.nudge(&sms(CREATOR, "nudge 556")).await.unwrap();

    let sent = h.provider.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("nobody to nudge"));
}

#[tokio::test]
async fn catch_all_ignores_empty_keyword_and_rsvp_replies() {
    let h = harness();
    let context = StageContext::for_broadcast(CREATOR);
    for body in ["", "   ", "STOP", "in +3", "Out", "subscribe"] {
        h.conversation
            .handle(Stage::CatchAll, &sms("A", body), &context)
            .await
            .unwrap();
    }
    assert_eq!(h.provider.sent_count().await, 0);
}

#[tokio::test]
async fn catch_all_forwards_to_creator_with_relay_callback() {
    let h = harness();
    let context = StageContext::for_broadcast(CREATOR);

    h.conversation
        .catch_all(&sms("61455555555", "Can I bring my dog?"), &context)
        .await
        .unwrap();

    let sent = h.provider.last_sent().await.unwrap();
    assert_eq!(sent.target, SendTarget::Numbers(CREATOR.to_string()));
    assert_eq!(sent.body, messages::relay_wrapper("Can I bring my dog?"));
    assert_eq!(
        sent.reply_callback.as_deref(),
        Some("https://rollcall.test/catch_all?is_catch_all_reply=true&send_response_to=61455555555")
    );
}

#[tokio::test]
async fn relay_reply_goes_back_verbatim() {
    let h = harness();
    let context = StageContext::for_relay("61455555555");

    h.conversation
        .catch_all(&sms(CREATOR, "Sure, bring the dog"), &context)
        .await
        .unwrap();

    let sent = h.provider.last_sent().await.unwrap();
    assert_eq!(sent.target, SendTarget::Numbers("61455555555".to_string()));
    assert_eq!(sent.body, "Sure, bring the dog");
    assert_eq!(
        sent.reply_callback.as_deref(),
        Some("https://rollcall.test/catch_all?is_catch_all_reply=true&send_response_to=61400000001")
    );
}

#[tokio::test]
async fn catch_all_without_destination_is_dropped() {
    let h = harness();
    h.conversation
        .catch_all(&sms("A", "hello?"), &StageContext::default())
        .await
        .unwrap();
    assert_eq!(h.provider.sent_count().await, 0);
}

#[tokio::test]
async fn provider_failure_surfaces_as_provider_error() {
    let h = harness();
    h.provider.fail_with("API returned 503").await;

    let err = h
        .conversation
        .start(&sms(CREATOR, "create event"))
        .await
        .unwrap_err();
    assert!(matches!(err, RollcallError::Provider { .. }));
}

#[tokio::test]
async fn since_sent_lookup_counts_the_window() {
    let provider_time = MockProvider::new().send_time();
    let h = harness_at(provider_time, ResponseLookup::SinceSent);
    seed_event(&h.provider).await;
    // Window lookups are not threaded: replies to any message count.
    h.provider.add_response("555", "A", "IN", 1).await;
    h.provider.add_response("999", "B", "IN +1", 2).await;
    h.provider.add_response("555", "C", "OUT", 0).await;

    let tally = h
        .conversation
        .tally_for(&MessageId::from("555"))
        .await
        .unwrap();
    assert_eq!(tally.in_count, 3);
    // Received exactly at send time: outside the (start, end] window.
    assert_eq!(tally.out_count, 0);
}

#[tokio::test]
async fn audiences_are_idempotent_over_unchanged_data() {
    let h = harness();
    seed_event(&h.provider).await;
    h.provider.add_response("555", "B", "OUT", 1).await;
    let id = MessageId::from("555");

    let first = h.conversation.decision_audience(&id).await.unwrap();
    let second = h.conversation.decision_audience(&id).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), "A,C,D,E");

    let nudge = h.conversation.nudge_audience(&id).await.unwrap();
    assert_eq!(nudge.to_string(), "A,C,D,E");
}

#[tokio::test]
async fn donation_notifies_admin() {
    let h = harness();
    let event: DonationEvent = serde_json::from_value(serde_json::json!({
        "type": "checkout.session.completed",
        "data": {"object": {"amount_total": 650, "customer_details": {"name": "Sam"}}}
    }))
    .unwrap();

    h.conversation.notify_donation(&event).await.unwrap();

    let sent = h.provider.last_sent().await.unwrap();
    assert_eq!(sent.target, SendTarget::Numbers("61499999999".to_string()));
    assert_eq!(sent.body, "Sam donated $6.5");
}

#[tokio::test]
async fn donation_without_admin_is_ignored() {
    let provider = MockProvider::new();
    let conversation = Conversation::new(
        Arc::new(provider.clone()),
        Arc::new(RecordingScheduler::new()),
        settings(ResponseLookup::MessageId, None),
    );
    let event: DonationEvent = serde_json::from_value(serde_json::json!({
        "type": "checkout.session.completed",
        "data": {"object": {"amount_total": 600}}
    }))
    .unwrap();

    conversation.notify_donation(&event).await.unwrap();
    assert_eq!(provider.sent_count().await, 0);
}
