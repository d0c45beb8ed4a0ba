// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Free-text deadline resolution.
//!
//! Event creators type deadlines like "in 2 hours", "5pm" or "friday at 6".
//! The resolver turns them into an instant relative to a reference time,
//! interpreting wall-clock phrases in a fixed UTC offset. Anything it cannot
//! read resolves to `reference + fallback`; resolution never fails.

use std::sync::LazyLock;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc, Weekday,
};
use regex::Regex;
use rollcall_core::RollcallError;

/// Text preceding the deadline phrase in the RSVP broadcast.
pub const DEADLINE_MARKER: &str = "Deadline to reply is ";

/// Phrase used when the creator leaves the deadline out.
pub const DEFAULT_DEADLINE_PHRASE: &str = "in 2 hours";

const PREPOSITIONS: &[&str] = &["in", "at", "on", "by"];

static RELATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^in\s+(\d+|an?)\s*(minutes?|mins?|m|hours?|hrs?|h|days?|d|weeks?|wks?|w)$",
    )
    .expect("relative pattern is valid")
});

static CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})(?::(\d{2}))?\s*(am|pm|a\.m\.?|p\.m\.?)?$").expect("clock pattern is valid")
});

static WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:on\s+|next\s+)?(mon|monday|tue|tues|tuesday|wed|wednesday|thu|thur|thurs|thursday|fri|friday|sat|saturday|sun|sunday)(?:\s+(.+))?$",
    )
    .expect("weekday pattern is valid")
});

/// Resolves deadline phrases in a fixed timezone with a fallback duration.
#[derive(Debug, Clone, Copy)]
pub struct DeadlineResolver {
    offset: FixedOffset,
    fallback: Duration,
}

impl DeadlineResolver {
    pub fn new(offset: FixedOffset, fallback: Duration) -> Self {
        Self { offset, fallback }
    }

    /// Build from configured minute values.
    pub fn from_minutes(
        utc_offset_minutes: i32,
        fallback_minutes: u32,
    ) -> Result<Self, RollcallError> {
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                RollcallError::Config(format!("invalid UTC offset: {utc_offset_minutes} minutes"))
            })?;
        Ok(Self::new(offset, Duration::minutes(i64::from(fallback_minutes))))
    }

    pub fn fallback(&self) -> Duration {
        self.fallback
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Resolve `text` relative to `reference`, falling back when absent or unreadable.
    pub fn resolve(&self, text: Option<&str>, reference: DateTime<Utc>) -> DateTime<Utc> {
        text.and_then(|text| self.parse(text, reference))
            .unwrap_or(reference + self.fallback)
    }

    /// Recover the deadline phrase from a broadcast body and resolve it
    /// against the original send time.
    pub fn resolve_for_status_query(
        &self,
        original_body: &str,
        sent_at: DateTime<Utc>,
    ) -> DateTime<Utc> {
        self.resolve(extract_deadline_phrase(original_body), sent_at)
    }

    /// Parse a phrase, retrying with a synthesized "in " when it has no
    /// leading preposition ("2 hours" reads as "in 2 hours").
    pub fn parse(&self, text: &str, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let phrase = clean(text);
        if phrase.is_empty() {
            return None;
        }
        self.parse_phrase(&phrase, reference).or_else(|| {
            let synthesized = synthesize_preposition(&phrase)?;
            self.parse_phrase(&synthesized, reference)
        })
    }

    /// The phrase to show in the RSVP broadcast.
    ///
    /// Blank input becomes the default phrase. A phrase that only reads with
    /// a synthesized preposition is shown in that form, so the text a status
    /// query re-parses later is the text the trigger was scheduled from.
    pub fn normalize_phrase(&self, text: Option<&str>, reference: DateTime<Utc>) -> String {
        let Some(raw) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return DEFAULT_DEADLINE_PHRASE.to_string();
        };
        let phrase = clean(raw);
        if self.parse_phrase(&phrase, reference).is_some() {
            return raw.to_string();
        }
        match synthesize_preposition(&phrase) {
            Some(synthesized) if self.parse_phrase(&synthesized, reference).is_some() => {
                format!("in {raw}")
            }
            _ => raw.to_string(),
        }
    }

    fn parse_phrase(&self, phrase: &str, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if phrase == "now" {
            return Some(reference);
        }
        if let Some(duration) = parse_relative(phrase) {
            return reference.checked_add_signed(duration);
        }

        let local = reference.with_timezone(&self.offset);
        let today = local.date_naive();

        if let Some(rest) = phrase.strip_prefix("tomorrow") {
            let tomorrow = today.succ_opt()?;
            let rest = rest.trim();
            let time = if rest.is_empty() {
                noon()
            } else {
                parse_time_of_day(strip_time_preposition(rest))?
            };
            return self.instant(tomorrow, time);
        }

        if let Some(captures) = WEEKDAY.captures(phrase) {
            let weekday = parse_weekday(&captures[1])?;
            let time = match captures.get(2) {
                Some(rest) => parse_time_of_day(strip_time_preposition(rest.as_str()))?,
                None => noon(),
            };
            return self.instant(next_weekday_after(today, weekday), time);
        }

        let time = parse_time_of_day(strip_time_preposition(phrase))?;
        self.next_occurrence(reference, today, time)
    }

    /// First instant at `time` strictly after `reference`.
    fn next_occurrence(
        &self,
        reference: DateTime<Utc>,
        today: NaiveDate,
        time: NaiveTime,
    ) -> Option<DateTime<Utc>> {
        let candidate = self.instant(today, time)?;
        if candidate > reference {
            Some(candidate)
        } else {
            self.instant(today.succ_opt()?, time)
        }
    }

    fn instant(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        self.offset
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(|local| local.with_timezone(&Utc))
    }
}

/// Substring after the deadline marker, trimmed. `None` when the marker is
/// missing or nothing follows it.
pub fn extract_deadline_phrase(body: &str) -> Option<&str> {
    let start = body.find(DEADLINE_MARKER)? + DEADLINE_MARKER.len();
    let phrase = body[start..].trim();
    (!phrase.is_empty()).then_some(phrase)
}

/// Coarse human rendering of a non-negative duration: "2 days 3 hours",
/// "45 minutes", "less than a minute".
pub fn humanize_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes().max(0);
    if total_minutes == 0 {
        return "less than a minute".to_string();
    }

    let days = total_minutes / (24 * 60);
    let hours = (total_minutes % (24 * 60)) / 60;
    let minutes = total_minutes % 60;

    let parts: Vec<String> = [(days, "day"), (hours, "hour"), (minutes, "minute")]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| pluralize(value, unit))
        .collect();
    // Minutes only matter below a day.
    let shown = if days > 0 { 2 } else { parts.len() };
    parts.into_iter().take(shown).collect::<Vec<_>>().join(" ")
}

fn pluralize(value: i64, unit: &str) -> String {
    if value == 1 {
        format!("1 {unit}")
    } else {
        format!("{value} {unit}s")
    }
}

/// Lowercase, collapse whitespace, drop trailing sentence punctuation.
fn clean(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .trim_end_matches(['.', '!', '?'])
        .to_string()
}

fn synthesize_preposition(phrase: &str) -> Option<String> {
    let first = phrase.split_whitespace().next()?;
    if PREPOSITIONS.contains(&first) {
        None
    } else {
        Some(format!("in {phrase}"))
    }
}

fn parse_relative(phrase: &str) -> Option<Duration> {
    if phrase == "in half an hour" {
        return Some(Duration::minutes(30));
    }
    let captures = RELATIVE.captures(phrase)?;
    let amount: i64 = match &captures[1] {
        "a" | "an" => 1,
        digits => digits.parse().ok()?,
    };
    let unit = &captures[2];
    let duration = match unit.chars().next()? {
        'm' => Duration::try_minutes(amount)?,
        'h' => Duration::try_hours(amount)?,
        'd' => Duration::try_days(amount)?,
        _ => Duration::try_weeks(amount)?,
    };
    Some(duration)
}

fn strip_time_preposition(phrase: &str) -> &str {
    phrase
        .strip_prefix("at ")
        .or_else(|| phrase.strip_prefix("by "))
        .unwrap_or(phrase)
        .trim()
}

/// A wall-clock time: named times, `5pm`, `5:30 pm`, `17:00`.
///
/// An hour without am/pm reads inside 6am..6pm, so "6" is morning and "5"
/// is afternoon. Hours above 12 are 24-hour clock.
fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    match text {
        "noon" | "midday" => return Some(noon()),
        "midnight" => return NaiveTime::from_hms_opt(0, 0, 0),
        "tonight" => return Some(tonight()),
        _ => {}
    }

    let captures = CLOCK.captures(text)?;
    let hour: u32 = captures[1].parse().ok()?;
    let minute: u32 = match captures.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    let hour = match captures.get(3).map(|m| m.as_str().starts_with('p')) {
        Some(pm) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            }
        }
        None if (1..=5).contains(&hour) => hour + 12,
        None => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    let weekday = match name.get(..3)? {
        "mon" => Weekday::Mon,
        "tue" => Weekday::Tue,
        "wed" => Weekday::Wed,
        "thu" => Weekday::Thu,
        "fri" => Weekday::Fri,
        "sat" => Weekday::Sat,
        "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

/// The next date falling on `weekday`, strictly after `today`.
fn next_weekday_after(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (7 + weekday.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
    let days = if ahead == 0 { 7 } else { ahead };
    today + Duration::days(i64::from(days))
}

fn noon() -> NaiveTime {
    NaiveTime::MIN + Duration::hours(12)
}

fn tonight() -> NaiveTime {
    NaiveTime::MIN + Duration::hours(20)
}
