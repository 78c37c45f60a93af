//! Weekday arithmetic and weekday labels found in listings.
//!
//! Weekdays are plain integers `0..=6` with `0` = Monday, matching
//! [`chrono::Weekday::num_days_from_monday`].

use chrono::{Datelike, NaiveDate};

/// Number of days in a week.
pub const DAYS_PER_WEEK: i64 = 7;

/// Largest valid weekday value.
pub const MAX_WEEKDAY: u8 = 6;

const ENGLISH_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Shift `weekday` by `days`, wrapping into `0..=6`.
///
/// Negative shifts wrap backwards (Monday - 1 = Sunday).
pub fn shift(weekday: u8, days: i64) -> u8 {
    (i64::from(weekday) + days).rem_euclid(DAYS_PER_WEEK) as u8
}

/// Whether `weekday` lies in `0..=6`.
pub fn is_valid(weekday: u8) -> bool {
    weekday <= MAX_WEEKDAY
}

/// English display name of a weekday.
pub fn name(weekday: u8) -> Option<&'static str> {
    const DISPLAY: [&str; 7] = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ];
    DISPLAY.get(usize::from(weekday)).copied()
}

/// Parse a weekday label as printed by a listing site.
///
/// Accepts English names in full (`Monday`), plural (`Mondays`) or
/// three-letter (`Mon`) form, case-insensitively, and the single CJK
/// characters `一二三四五六日` (`天` for Sunday), optionally prefixed with
/// `星期`, `周` or `週`.
pub fn parse_label(label: &str) -> Option<u8> {
    let label = label.trim().trim_end_matches([',', ':', '.']);
    if label.is_empty() {
        return None;
    }

    let cjk = label
        .strip_prefix("星期")
        .or_else(|| label.strip_prefix('周'))
        .or_else(|| label.strip_prefix('週'))
        .unwrap_or(label);
    let mut chars = cjk.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        let day = match c {
            '一' => Some(0),
            '二' => Some(1),
            '三' => Some(2),
            '四' => Some(3),
            '五' => Some(4),
            '六' => Some(5),
            '日' | '天' => Some(6),
            _ => None,
        };
        if day.is_some() {
            return day;
        }
    }

    let lower = label.to_ascii_lowercase();
    let singular = lower.strip_suffix('s').unwrap_or(&lower);
    ENGLISH_NAMES
        .iter()
        .position(|name| {
            *name == lower || *name == singular || (lower.len() == 3 && name.starts_with(&lower))
        })
        .map(|idx| idx as u8)
}

/// Weekday of a `month/day` premiere label in `year`.
///
/// Listings that only print a premiere date (`"10/05"`, or a range such as
/// `"10/05~12/21"`) air weekly on that date's weekday.
pub fn from_date_label(label: &str, year: i32) -> Option<u8> {
    let start = label.split('~').next()?.trim();
    let (month, day) = start.split_once('/')?;
    let month = month.trim().parse::<u32>().ok()?;
    let day = day.trim().parse::<u32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.weekday().num_days_from_monday() as u8)
}
