//! Calendar primitives shared by the advancer, the calendar encoder and the notification gate.
//!
//! Canonical dates are `YYYY-MM-DD`; human-facing dates are `DD/MM/YYYY`.

use chrono::{Datelike, Duration, NaiveDate};

pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";
pub const ICS_DATE_FORMAT: &str = "%Y%m%d";

/// Parses a canonical `YYYY-MM-DD` date. Impossible dates such as `2024-02-30` yield `None`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, CANONICAL_FORMAT).ok()
}

pub fn format_canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// Renders a canonical date string as `DD/MM/YYYY`.
///
/// Empty input renders empty; input that is not a canonical date is returned untouched.
pub fn format_display(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    match parse_date(input) {
        Some(date) => date.format(DISPLAY_FORMAT).to_string(),
        None => input.to_string(),
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|first_next| (first_next - Duration::days(1)).day())
        .unwrap_or(28)
}

/// Builds `year-month-day`, clipping `day` to the last day of the month.
pub fn clipped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let day = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Moves `date` by `months`, keeping its day-of-month and clipping to the target month's
/// last day (Jan 31 + 1 month is Feb 28/29, never Mar 2).
pub fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    clipped_date(year, month, date.day())
}

/// Moves `date` by `years` with the same clipping rule (Feb 29 becomes Feb 28 off leap years).
pub fn shift_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    clipped_date(date.year() + years, date.month(), date.day())
}

/// Whole months from `from` to `to`, ignoring the day of month.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() * 12 + to.month0() as i32) - (from.year() * 12 + from.month0() as i32)
}
