//! Date helpers for attendance data.
//!
//! Every date in the dataset is a calendar date with no time of day. Dates are held as
//! [`NaiveDate`] and treated as midnight UTC, so parsing and re-serialising a `YYYY-MM-DD`
//! string always returns the same string regardless of the local timezone.

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::error::{AttendanceError, Result};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a strict `YYYY-MM-DD` string.
pub fn parse_attendance_date(input: &str) -> Result<NaiveDate> {
    let invalid = || AttendanceError::InvalidDateFormat(input.to_string());

    let parts: Vec<&str> = input.split('-').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }
    let widths = [4, 2, 2];
    for (part, width) in parts.iter().zip(widths) {
        if part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
    }

    let year: i32 = parts[0].parse().map_err(|_| invalid())?;
    let month: u32 = parts[1].parse().map_err(|_| invalid())?;
    let day: u32 = parts[2].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Inclusive on both ends. A reversed window contains nothing.
pub fn is_date_in_range(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    start <= date && date <= end
}

/// Parses a `YYYY-MM` month key into its first day.
pub fn parse_month_key(input: &str) -> Result<NaiveDate> {
    let invalid = || AttendanceError::InvalidMonthToken(input.to_string());

    let (year_str, month_str) = input.split_once('-').ok_or_else(invalid)?;
    if year_str.len() != 4 || !year_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if month_str.is_empty() || month_str.len() > 2 || !month_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let year: i32 = year_str.parse().map_err(|_| invalid())?;
    let month: u32 = month_str.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }

    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

/// "2025-05" -> "May 2025"
pub fn month_label(month_key: &str) -> Result<String> {
    let first = parse_month_key(month_key)?;
    Ok(first.format("%B %Y").to_string())
}

/// "Oct 01, 2025 - Nov 02, 2025"
pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", start.format("%b %d, %Y"), end.format("%b %d, %Y"))
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    let next_first = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    match next_first {
        Some(next) => next - Duration::days(1),
        None => first,
    }
}

/// Shifts a first-of-month date by whole months.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let first = first_of_month(date);
    let index = first.year() * 12 + first.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month0 = index.rem_euclid(12) as u32;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(first)
}

/// Local calendar date, used for the default end of the window.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
