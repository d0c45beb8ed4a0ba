// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply classification.
//!
//! Pure functions over a normalized (trimmed, lowercased) SMS body that
//! decide which handler, if any, an inbound message belongs to. Matching is
//! anchored: "intense" and "3 out of 4" are not RSVP replies.

use std::sync::LazyLock;

use regex::Regex;

/// `in`/`out`, optional trailing `.`/`!`, optional `+`, optional head count.
static RSVP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(in|out)[.!]*\s*\+?\s*(\d*)$").expect("RSVP pattern is valid")
});

/// Whole-body keywords: event triggers and commands, then carrier-reserved words.
pub const KEYWORD_REPLIES: &[&str] = &[
    "in",
    "out",
    "create event",
    "subscribe",
    "status",
    "nudge",
    "stop",
    "stopall",
    "unsubscribe",
    "cancel",
    "end",
    "quit",
    "start",
    "unstop",
    "yes",
    "help",
    "info",
];

const GAME_ON: &str = "game on";
const GAME_CANCELED: &str = "game canceled";

/// Trim and lowercase an SMS body.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Outcome of RSVP classification, carrying the head count so callers never
/// re-derive the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rsvp {
    NotReply,
    In(u32),
    Out(u32),
}

impl Rsvp {
    pub fn is_reply(self) -> bool {
        !matches!(self, Rsvp::NotReply)
    }

    pub fn is_out(self) -> bool {
        matches!(self, Rsvp::Out(_))
    }
}

/// Classify a body as IN, OUT, or neither.
pub fn classify_rsvp(text: &str) -> Rsvp {
    let normalized = normalize(text);
    let Some(captures) = RSVP_PATTERN.captures(&normalized) else {
        return Rsvp::NotReply;
    };

    let quantity = parse_quantity(&normalized);
    match &captures[1] {
        "in" => Rsvp::In(quantity),
        _ => Rsvp::Out(quantity),
    }
}

pub fn is_rsvp_reply(text: &str) -> bool {
    classify_rsvp(text).is_reply()
}

pub fn is_keyword_reply(text: &str) -> bool {
    let normalized = normalize(text);
    KEYWORD_REPLIES.contains(&normalized.as_str())
}

pub fn is_acceptable_decision_reply(text: &str) -> bool {
    Decision::parse(text).is_some()
}

/// Head count of an RSVP body: the replier plus any stated extras.
///
/// Every non-digit is discarded. No digits means the replier alone (`1`);
/// otherwise `1 + digits`, so "IN +2" is three people and "OUT +0" is one.
pub fn parse_quantity(text: &str) -> u32 {
    let digits = strip_nondigits(text);
    if digits.is_empty() {
        return 1;
    }
    digits
        .parse::<u32>()
        .map_or(u32::MAX, |extra| extra.saturating_add(1))
}

pub fn strip_nondigits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// The creator's final call on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    GameOn,
    GameCanceled,
}

impl Decision {
    /// Parse a reply that starts with "game on" or "game canceled".
    ///
    /// Anything may follow the phrase after a word boundary, typically the
    /// event id ("GAME ON 12345").
    pub fn parse(text: &str) -> Option<Self> {
        let normalized = normalize(text);
        if starts_with_phrase(&normalized, GAME_CANCELED) {
            Some(Decision::GameCanceled)
        } else if starts_with_phrase(&normalized, GAME_ON) {
            Some(Decision::GameOn)
        } else {
            None
        }
    }

    /// The phrase as shown to the creator.
    pub fn phrase(self) -> &'static str {
        match self {
            Decision::GameOn => "GAME ON",
            Decision::GameCanceled => "GAME CANCELED",
        }
    }
}

fn starts_with_phrase(text: &str, phrase: &str) -> bool {
    text.strip_prefix(phrase)
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphabetic()))
}
