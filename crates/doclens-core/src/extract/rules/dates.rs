//! Date canonicalization and validation.

use chrono::NaiveDate;

use super::patterns::ORDINAL_SUFFIX;
use crate::models::config::DateConfig;

/// Canonicalize a numeric date to `YYYY-MM-DD` using the local clock year.
///
/// See [`canonicalize_date_with`] for the rules.
pub fn canonicalize_date(raw: &str) -> String {
    canonicalize_date_with(raw, &DateConfig::default())
}

/// Canonicalize a numeric date (`/`, `-` or `.` separated) to `YYYY-MM-DD`.
///
/// When the first part is 12 or less it is read as the month, otherwise as
/// the day. `03/04/2023` is therefore always March 4th. Two-digit years are
/// expanded with a century window relative to the current year. Anything
/// that does not split into three numeric parts is returned unchanged.
///
/// Only 1-2 digit years go through the century window. A year part of 3 or
/// 5+ digits has no sensible two-digit reading, so the raw string is
/// returned unchanged instead of being expanded.
pub fn canonicalize_date_with(raw: &str, config: &DateConfig) -> String {
    let parts: Vec<&str> = raw.trim().split(['/', '-', '.']).collect();
    if parts.len() != 3 {
        return raw.to_string();
    }

    let Some(numbers) = parse_parts(&parts) else {
        return raw.to_string();
    };
    let [first, second, year_part] = numbers;

    let year = match parts[2].len() {
        4 => year_part,
        1 | 2 => expand_two_digit_year(year_part, config),
        _ => return raw.to_string(),
    };

    let (month, day) = if first <= 12 {
        (first, second)
    } else {
        (second, first)
    };

    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Whether a date value names a real calendar day.
///
/// Accepts canonical `YYYY-MM-DD` values and month-name forms such as
/// `Jan 15, 2024` or `September 3rd 2021`.
pub fn is_calendar_date(value: &str) -> bool {
    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
        return true;
    }

    let cleaned = value.replace([',', '.'], " ");
    let cleaned = ORDINAL_SUFFIX.replace_all(&cleaned, "$1");
    // chrono reads "Sep" and "September" but not "Sept"
    let cleaned = cleaned
        .split_whitespace()
        .map(|token| {
            if token.eq_ignore_ascii_case("sept") {
                "Sep"
            } else {
                token
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    NaiveDate::parse_from_str(&cleaned, "%B %d %Y").is_ok()
}

fn parse_parts(parts: &[&str]) -> Option<[u32; 3]> {
    let mut numbers = [0u32; 3];
    for (slot, part) in numbers.iter_mut().zip(parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }
    Some(numbers)
}

fn expand_two_digit_year(two_digit: u32, config: &DateConfig) -> u32 {
    let current = config.current_year();
    let century = current - current.rem_euclid(100);
    let two_digit = two_digit as i32;

    let year = if two_digit > current.rem_euclid(100) + config.century_window {
        century - 100 + two_digit
    } else {
        century + two_digit
    };

    year.max(0) as u32
}
