//! Date parsing with multi-format fallback.
//!
//! JSON APIs disagree on how to spell a timestamp. `parse_json_date`
//! recognises the Microsoft `\/Date(ms±hhmm)\/` form, the JavaScript
//! `new Date(ms)` form, and a list of ISO-8601 variants tried in order.
//! All results are naive UTC.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

const ISO_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a date as found in a JSON payload. Returns `None` when no known
/// format matches.
pub fn parse_json_date(input: &str) -> Option<NaiveDateTime> {
    let cleaned: String = input.chars().filter(|c| *c != '\n' && *c != '\r').collect();
    let trimmed = cleaned
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(&cleaned);

    if trimmed.contains("/Date(") {
        return parse_ms_date(trimmed);
    }
    let compact: String = trimmed.chars().filter(|c| *c != ' ').collect();
    if compact.contains("newDate(") {
        return parse_js_date(&compact);
    }
    parse_iso8601(trimmed)
}

/// Try each ISO-8601 layout in turn. Offsets are normalised to UTC.
pub fn parse_iso8601(input: &str) -> Option<NaiveDateTime> {
    ISO_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%:z")
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// Parse an `If-Modified-Since` style value: RFC 2822 / IMF-fixdate first,
/// then the ISO layouts.
pub fn parse_http_date(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    DateTime::parse_from_rfc2822(input)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| parse_iso8601(input))
}

/// Render as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn format_http_date(value: &NaiveDateTime) -> String {
    value.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn from_epoch_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

// \/Date(1234567890123)\/ or \/Date(1234567890123+0530)\/
fn parse_ms_date(input: &str) -> Option<NaiveDateTime> {
    let start = input.find("/Date(")? + "/Date(".len();
    let rest = &input[start..];
    let inner = &rest[..rest.find(')')?];

    // Skip a leading minus so pre-1970 values are not read as an offset.
    let sign_at = inner
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '+' || *c == '-')
        .map(|(i, _)| i);
    let (millis, offset) = match sign_at {
        Some(i) => (&inner[..i], Some(&inner[i..])),
        None => (inner, None),
    };

    let mut value = from_epoch_millis(millis.parse().ok()?)?;
    if let Some(offset) = offset {
        let (sign, digits) = offset.split_at(1);
        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let hours: i64 = digits[..2].parse().ok()?;
        let minutes: i64 = digits[2..].parse().ok()?;
        if hours > 23 || minutes > 59 {
            return None;
        }
        let shift = Duration::hours(hours) + Duration::minutes(minutes);
        // Near the edge of the representable range the shift can overflow.
        value = if sign == "+" {
            value.checked_add_signed(shift)?
        } else {
            value.checked_sub_signed(shift)?
        };
    }
    Some(value)
}

// newDate(1234567890123), spaces already removed
fn parse_js_date(input: &str) -> Option<NaiveDateTime> {
    let start = input.find("newDate(")? + "newDate(".len();
    let rest = &input[start..];
    let millis = &rest[..rest.find(')')?];
    from_epoch_millis(millis.parse().ok()?)
}
