use crate::error::{ReportError, Result};
use chrono::{Datelike, Days, NaiveDate};

pub fn first_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        ReportError::DateError(format!("Invalid month {:04}-{:02}", year, month))
    })
}

pub fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    first_day_of_month(next_year, next_month)?
        .checked_sub_days(Days::new(1))
        .ok_or_else(|| {
            ReportError::DateError(format!("No last day for {:04}-{:02}", year, month))
        })
}

/// Months elapsed since year 0, January. Lets month windows be built with
/// plain integer arithmetic.
pub fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// Inverse of [`month_index`], returning the first day of that month.
pub fn month_from_index(index: i32) -> Result<NaiveDate> {
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    first_day_of_month(year, month)
}

/// First day of a daily window of `days` days ending at `end` inclusive.
pub fn daily_window_start(end: NaiveDate, days: u64) -> Result<NaiveDate> {
    end.checked_sub_days(Days::new(days.saturating_sub(1)))
        .ok_or_else(|| {
            ReportError::DateError(format!(
                "A {}-day window ending {} starts before the earliest supported date",
                days, end
            ))
        })
}

pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ReportError::DateError(format!(
            "Invalid date '{}'. Expected YYYY-MM-DD",
            value
        ))
    })
}
