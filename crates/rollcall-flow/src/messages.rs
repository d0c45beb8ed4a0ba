// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound SMS texts.

use chrono::Duration;
use rollcall_core::MessageId;

use crate::classify::Decision;
use crate::deadline::{DEADLINE_MARKER, humanize_duration};
use crate::tally::Tally;

pub const NO_LIST_MATCH: &str = "Sorry, we couldn't find that list. Please try again.";

pub const DETAILS_PROMPT: &str =
    "Got it. Now tell us the details. Reply with: SUBJECT;WHEN;WHERE;DEADLINE";

pub const GAME_CANCELED: &str =
    "We do not have enough people committed to play. Game is OFF, enjoy your day!";

pub fn list_prompt<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let names: Vec<&str> = names.into_iter().collect();
    format!(
        "What list would you like to send to? Reply with one of: {}",
        names.join(", ")
    )
}

pub fn rsvp_prompt(subject: &str, when: &str, location: &str, deadline: &str) -> String {
    format!(
        "Who's IN for {subject} {when} at {location}? Reply IN, IN +1/+2/+3/+#, OUT, or STOP. {DEADLINE_MARKER}{deadline}"
    )
}

pub fn creator_confirmation(message_id: &MessageId) -> String {
    format!(
        "Sent! Your event ID is {message_id}. Text STATUS {message_id} for a headcount or NUDGE {message_id} to remind anyone who hasn't replied."
    )
}

pub fn decision_prompt(tally: Tally, message_id: &MessageId) -> String {
    format!(
        "{} are in, {} are out. Reply {} {message_id} or {} {message_id}",
        tally.in_count,
        tally.out_count,
        Decision::GameOn.phrase(),
        Decision::GameCanceled.phrase(),
    )
}

pub fn decision_announcement(decision: Decision, in_count: u32) -> String {
    match decision {
        Decision::GameOn => format!("We have {in_count} committed to play, Game is ON!"),
        Decision::GameCanceled => GAME_CANCELED.to_string(),
    }
}

pub fn relay_wrapper(body: &str) -> String {
    format!(
        "Someone sent this reply to your message: \"{body}\". You can ignore this reply, or reply to this message & we'll forward your response to them."
    )
}

/// Asks for the numeric id a command needs, e.g. "STATUS 12345".
pub fn missing_event_id(command: &str) -> String {
    format!("Please include a valid event ID, like {command} 12345.")
}

/// Headcount with time left before the deadline.
pub fn status_open(message_id: &MessageId, tally: Tally, remaining: Duration) -> String {
    format!(
        "Event {message_id}: {} in, {} out. Replies close in {}.",
        tally.in_count,
        tally.out_count,
        humanize_duration(remaining)
    )
}

/// Headcount after the deadline has passed.
pub fn status_closed(message_id: &MessageId, tally: Tally, elapsed: Duration) -> String {
    format!(
        "Event {message_id}: {} in, {} out. Replies closed {} ago.",
        tally.in_count,
        tally.out_count,
        humanize_duration(elapsed)
    )
}

pub fn nudge_confirmation(message_id: &MessageId, nudged: usize) -> String {
    if nudged == 0 {
        return format!("Everyone has already replied to event {message_id}, nobody to nudge.");
    }
    let people = if nudged == 1 { "person" } else { "people" };
    format!("Reminder sent to {nudged} {people} for event {message_id}.")
}
