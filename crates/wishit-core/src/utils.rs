//! Date and text helpers shared by the dashboard screens

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

/// Short French month labels, January first
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Juin", "Juil", "Août", "Sep", "Oct", "Nov", "Déc",
];

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 (`2024-05-02T08:00:00.000Z`), a naive ISO date-time, or a
/// bare `YYYY-MM-DD` date taken as midnight UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a backend date, discarding any time component
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|timestamp| timestamp.date_naive())
}

/// Age in whole years on `today`, floored to the last completed birthday.
///
/// Negative when `birth` lies in the future.
#[must_use]
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Whole calendar months between `earlier` and `today`: `(Δyear * 12) + Δmonth`.
///
/// Zero for the current month, negative for future months.
#[must_use]
pub fn months_between(earlier: NaiveDate, today: NaiveDate) -> i32 {
    let month_delta = i32::try_from(today.month()).unwrap_or(0)
        - i32::try_from(earlier.month()).unwrap_or(0);
    (today.year() - earlier.year()) * 12 + month_delta
}

/// Labels for the `N` months ending with the month of `today`, oldest first
#[must_use]
pub fn trailing_month_labels<const N: usize>(today: NaiveDate) -> [&'static str; N] {
    let current = today.month0() as usize;
    std::array::from_fn(|slot| {
        let back = (N - 1 - slot) % 12;
        let index = (current + 12 - back) % 12;
        MONTH_LABELS.get(index).copied().unwrap_or_default()
    })
}

/// Case-insensitive substring test
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Truncate `text` to at most `max_chars` characters, appending `...` when cut
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

/// Format a timestamp for list screens, e.g. `02/05/2024 08:00`
#[must_use]
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%d/%m/%Y %H:%M").to_string()
}
