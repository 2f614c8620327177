//! Normalization of the timestamps rendered on post pages.
//!
//! Post pages expose either a machine-readable attribute or a display string
//! such as `Aug 21, 2023` or `3 days ago`. Both are turned into UTC instants;
//! anything unrecognized becomes `None`, which the manifest renders as an
//! empty string.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeDelta, Utc};
use regex::Regex;

static RELATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(a|an|one|\d+)\s+(second|minute|hour|day|week|month|year)s?\s+ago$").unwrap()
});

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%b %d, %Y", "%B %d, %Y", "%d %B %Y", "%d %b %Y"];

/// Parse a raw timestamp into a UTC instant.
///
/// `now` anchors relative forms like `2 hours ago`.
#[must_use]
pub fn normalize_timestamp(raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    if (9..=11).contains(&raw.len()) && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
    }

    parse_relative(raw, now)
}

fn parse_relative(raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let lowered = raw.to_lowercase();
    match lowered.as_str() {
        "just now" | "now" => return Some(now),
        "yesterday" => return now.checked_sub_signed(TimeDelta::try_days(1)?),
        _ => {}
    }

    let captures = RELATIVE.captures(&lowered)?;
    let amount: i64 = match &captures[1] {
        "a" | "an" | "one" => 1,
        digits => digits.parse().ok()?,
    };
    let unit_secs: i64 = match &captures[2] {
        "second" => 1,
        "minute" => 60,
        "hour" => 3_600,
        "day" => 86_400,
        "week" => 7 * 86_400,
        "month" => 30 * 86_400,
        "year" => 365 * 86_400,
        _ => return None,
    };

    let delta = TimeDelta::try_seconds(amount.checked_mul(unit_secs)?)?;
    now.checked_sub_signed(delta)
}

/// Render a normalized timestamp for the manifest.
#[must_use]
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}
