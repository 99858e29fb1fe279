//! Calendar-view helpers: month grids, per-day completion summaries, and
//! display formatting.
//!
//! The per-day summary only counts habits that already existed on the day in
//! question, so a calendar cell before a habit's creation never reports that
//! habit as missed.

use crate::types::{sunday_indexed, Habit};
use chrono::{Datelike, Days, NaiveDate};

use super::stats::last_day_of_month;

/// One cell in a six-week month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for the padding cells borrowed from the previous/next month
    pub in_month: bool,
}

/// Completion summary for a single calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayCompletion {
    /// Habits that existed on this day
    pub active: u32,
    /// Habits marked done on this day
    pub completed: u32,
    /// `completed / active` as a rounded percentage; 0 with no active habits
    pub percent: u32,
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    last_day_of_month(year, month).day()
}

/// Full month name for display.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// The fixed 42-cell (six week) grid for a month, Sunday-first, padded with
/// trailing days of the previous month and leading days of the next.
pub fn calendar_days(year: i32, month: u32) -> Vec<CalendarDay> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let lead = u64::from(sunday_indexed(first));
    let Some(grid_start) = first.checked_sub_days(Days::new(lead)) else {
        return Vec::new();
    };

    grid_start
        .iter_days()
        .take(42)
        .map(|date| CalendarDay {
            date,
            in_month: date.month() == month && date.year() == year,
        })
        .collect()
}

/// The Sunday-aligned week containing `anchor`, Sunday first.
pub fn week_dates(anchor: NaiveDate) -> Vec<NaiveDate> {
    let lead = u64::from(sunday_indexed(anchor));
    let start = anchor
        .checked_sub_days(Days::new(lead))
        .unwrap_or(anchor);
    start.iter_days().take(7).collect()
}

/// Habits that existed on `date` (created on or before it).
pub fn active_habits_on<'a>(habits: &'a [Habit], date: NaiveDate) -> Vec<&'a Habit> {
    habits.iter().filter(|h| h.existed_on(date)).collect()
}

/// Habits marked done on `date`.
pub fn habits_completed_on<'a>(habits: &'a [Habit], date: NaiveDate) -> Vec<&'a Habit> {
    habits.iter().filter(|h| h.is_done_on(date)).collect()
}

/// Per-day summary counting only habits that existed by `date`.
pub fn day_completion(habits: &[Habit], date: NaiveDate) -> DayCompletion {
    let active = active_habits_on(habits, date).len() as u32;
    let completed = habits_completed_on(habits, date).len() as u32;
    let percent = if active > 0 {
        (f64::from(completed) / f64::from(active) * 100.0).round() as u32
    } else {
        0
    };
    DayCompletion {
        active,
        completed,
        percent,
    }
}

/// Display form of a date range, collapsing shared month/year,
/// e.g. "May 5 – 11, 2025" or "Dec 29, 2024 – Jan 4, 2025".
pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    let start_month = &month_name(start.month())[..3];
    let end_month = &month_name(end.month())[..3];

    if start.year() != end.year() {
        format!(
            "{} {}, {} – {} {}, {}",
            start_month,
            start.day(),
            start.year(),
            end_month,
            end.day(),
            end.year()
        )
    } else if start.month() != end.month() {
        format!(
            "{} {} – {} {}, {}",
            start_month,
            start.day(),
            end_month,
            end.day(),
            end.year()
        )
    } else {
        format!("{} {} – {}, {}", start_month, start.day(), end.day(), end.year())
    }
}
