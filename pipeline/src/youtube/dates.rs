//! Date and duration parsing for video metadata.
//!
//! Sources disagree on how they expose time: the Data API gives RFC 3339
//! timestamps, feeds give timestamps, and scraped pages only give relative
//! text ("Streamed 3 months ago"). Everything funnels into a plain
//! calendar date, exact when obtainable and approximate otherwise.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate};
use regex::Regex;

#[allow(clippy::unwrap_used)]
static RELATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s+(hour|day|week|month|year)s?\s+ago").unwrap()
});

/// Calendar date from a timestamp string such as "2024-03-05T14:00:00Z".
#[must_use]
pub fn date_from_timestamp(timestamp: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(timestamp.get(..10)?, "%Y-%m-%d").ok()
}

/// Approximate date from relative text such as "3 months ago" or
/// "Streamed 2 weeks ago", counting back from `today`.
///
/// Months and years are approximated at 30 and 365 days; the result is a
/// best-effort anchor for the date-window candidate search, not an exact
/// date.
#[must_use]
pub fn parse_relative_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let captures = RELATIVE.captures(text)?;
    let amount: i64 = captures[1].parse().ok()?;
    let days = match captures[2].to_lowercase().as_str() {
        "hour" => 0,
        "day" => amount,
        "week" => amount * 7,
        "month" => amount * 30,
        "year" => amount * 365,
        _ => return None,
    };
    today.checked_sub_signed(Duration::days(days))
}

/// Seconds from an ISO-8601 duration such as "PT4H30M15S".
#[must_use]
pub fn parse_iso8601_duration(duration: &str) -> Option<u64> {
    let rest = duration.strip_prefix("PT")?;

    let mut seconds = 0_u64;
    let mut number = String::new();
    for c in rest.chars() {
        if c.is_ascii_digit() {
            number.push(c);
            continue;
        }
        let value: u64 = number.parse().ok()?;
        number.clear();
        match c {
            'H' => seconds += value * 3600,
            'M' => seconds += value * 60,
            'S' => seconds += value,
            _ => return None,
        }
    }
    if !number.is_empty() {
        return None;
    }
    Some(seconds)
}
