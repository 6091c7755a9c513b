//! Calendar-date helpers. Scheduling only ever looks at whole days.

use chrono::{DateTime, Duration, Local, NaiveDate, Timelike};

use crate::revision_scheduler::SchedulerError;

/// Parse a `YYYY-MM-DD` date, or an RFC 3339 timestamp normalised to its
/// calendar day.
pub fn parse_calendar_date(input: &str) -> Result<NaiveDate, SchedulerError> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| SchedulerError::InvalidDate(input.to_string()))
}

/// Get adjusted "today" based on the daily reset hour.
///
/// Before the reset hour the study day is still "yesterday", so late-night
/// reviews count towards the previous day.
pub fn adjusted_today(daily_reset_hour: u32) -> NaiveDate {
    let now = Local::now();

    if now.hour() < daily_reset_hour {
        (now - Duration::days(1)).date_naive()
    } else {
        now.date_naive()
    }
}

/// e.g. `Fri, Jan 10, 2025`
pub fn format_date_for_display(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

pub fn relative_date_description(date: NaiveDate, today: NaiveDate) -> String {
    let diff_days = (date - today).num_days();

    match diff_days {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        d if d > 1 => format!("In {} days", d),
        d => format!("{} days ago", d.abs()),
    }
}
