//! Date boundary parsing and calendar ranges.
//!
//! Query boundaries arrive as bare `YYYY-MM-DD` strings. [`parse_boundary`]
//! turns them into absolute instants: the lower bound of a range floors to
//! midnight, the upper bound ceilings to the last second of the day. Syntax
//! failures and calendrically impossible dates are reported as distinct
//! errors so callers can tell the user which mistake they made.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use thiserror::Error;

static DATE_SYNTAX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid date regex"));

/// Result type for date parsing.
pub type DateResult<T> = Result<T, DateError>;

/// Errors produced while interpreting date input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// Input does not match `YYYY-MM-DD`.
    #[error("`{input}` is not in the correct format, use YYYY-MM-DD")]
    MalformedDate { input: String },

    /// Input matches the pattern but names a date that does not exist.
    #[error("`{input}` is an impossible date")]
    ImpossibleDate { input: String },

    /// Month outside 1-12.
    #[error("month {month} is out of range, use 1-12")]
    InvalidMonth { month: u32 },
}

/// Which side of a date range a boundary string belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Lower bound; time floors to 00:00:00.
    From,
    /// Upper bound; time ceilings to 23:59:59.
    To,
}

/// Parses a strict `YYYY-MM-DD` boundary string into an absolute instant.
///
/// # Errors
///
/// [`DateError::MalformedDate`] when the string does not match the pattern,
/// [`DateError::ImpossibleDate`] when it does but the date does not exist on
/// the calendar (e.g. `2021-02-30`).
pub fn parse_boundary(raw: &str, boundary: Boundary) -> DateResult<NaiveDateTime> {
    let malformed = || DateError::MalformedDate {
        input: raw.to_string(),
    };

    let caps = DATE_SYNTAX.captures(raw).ok_or_else(malformed)?;
    let (Ok(year), Ok(month), Ok(day)) = (
        caps[1].parse::<i32>(),
        caps[2].parse::<u32>(),
        caps[3].parse::<u32>(),
    ) else {
        return Err(malformed());
    };

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DateError::ImpossibleDate {
        input: raw.to_string(),
    })?;

    let datetime = match boundary {
        Boundary::From => date.and_hms_opt(0, 0, 0),
        Boundary::To => date.and_hms_opt(23, 59, 59),
    };
    Ok(datetime.expect("valid time"))
}

/// Returns the inclusive `[first-day 00:00:00, last-day 23:59:59]` range of
/// the given month, accounting for leap years.
pub fn month_range(year: i32, month: u32) -> DateResult<(NaiveDateTime, NaiveDateTime)> {
    if !(1..=12).contains(&month) {
        return Err(DateError::InvalidMonth { month });
    }

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(DateError::InvalidMonth { month })?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .expect("valid last day of month");

    Ok((
        first.and_hms_opt(0, 0, 0).expect("valid time"),
        last.and_hms_opt(23, 59, 59).expect("valid time"),
    ))
}
