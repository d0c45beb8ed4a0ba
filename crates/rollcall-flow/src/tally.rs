// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Head counts and follow-up audiences derived from provider response lists.
//!
//! Nothing here is stored. Every tally and audience is recomputed from the
//! responses and recipients the provider returns for a single request.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use rollcall_core::{Recipient, Response};

use crate::classify::{Rsvp, classify_rsvp};

/// IN and OUT head counts for one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub in_count: u32,
    pub out_count: u32,
}

/// Sum RSVP head counts per bucket. Non-RSVP replies are skipped.
///
/// Every RSVP reply counts, including repeats from the same number.
pub fn collect_counts(responses: &[Response]) -> Tally {
    responses
        .iter()
        .fold(Tally::default(), |mut tally, response| {
            match classify_rsvp(&response.body) {
                Rsvp::In(quantity) => tally.in_count = tally.in_count.saturating_add(quantity),
                Rsvp::Out(quantity) => tally.out_count = tally.out_count.saturating_add(quantity),
                Rsvp::NotReply => {}
            }
            tally
        })
}

/// Ordered, duplicate-free set of phone numbers for a follow-up broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Audience(Vec<String>);

impl Audience {
    pub fn numbers(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-joined form accepted by the provider's `to` field.
    pub fn to_recipient_string(&self) -> String {
        self.0.join(",")
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_recipient_string())
    }
}

impl FromIterator<String> for Audience {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        Self(
            iter.into_iter()
                .filter(|number| seen.insert(number.clone()))
                .collect(),
        )
    }
}

/// Recipients minus everyone whose most recent RSVP reply is OUT.
///
/// Silence counts as "in": the decision goes to everyone who has not
/// explicitly backed out.
pub fn decision_audience(recipients: &[Recipient], responses: &[Response]) -> Audience {
    let mut latest: HashMap<&str, (DateTime<Utc>, Rsvp)> = HashMap::new();
    for response in responses {
        let rsvp = classify_rsvp(&response.body);
        if !rsvp.is_reply() {
            continue;
        }
        let entry = latest
            .entry(response.from_number.as_str())
            .or_insert((response.received_at, rsvp));
        if response.received_at >= entry.0 {
            *entry = (response.received_at, rsvp);
        }
    }

    recipients
        .iter()
        .filter(|recipient| {
            latest
                .get(recipient.number.as_str())
                .is_none_or(|(_, rsvp)| !rsvp.is_out())
        })
        .map(|recipient| recipient.number.clone())
        .collect()
}

/// Recipients who have not sent any RSVP reply yet.
pub fn nudge_audience(recipients: &[Recipient], responses: &[Response]) -> Audience {
    let replied: HashSet<&str> = responses
        .iter()
        .filter(|response| classify_rsvp(&response.body).is_reply())
        .map(|response| response.from_number.as_str())
        .collect();

    recipients
        .iter()
        .filter(|recipient| !replied.contains(recipient.number.as_str()))
        .map(|recipient| recipient.number.clone())
        .collect()
}
