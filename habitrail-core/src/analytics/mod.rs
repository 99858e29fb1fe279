//! Analytics over habit completion history.
//!
//! Provides the pure computation layer behind every stats and calendar view:
//! - Streak arithmetic (current, longest, active-streak membership)
//! - Completion rates over sliding windows
//! - Weekly day-of-week and monthly trend aggregates
//! - Calendar grids and per-day completion summaries
//! - One-call report assembly for dashboards
//!
//! Every function takes the habit data and an explicit reference date; no
//! operation reads the wall clock, performs I/O, or keeps state between
//! calls. Callers are free to invoke these from any thread.

pub mod calendar;
pub mod report;
pub mod stats;
pub mod streaks;

pub use calendar::{
    active_habits_on, calendar_days, day_completion, days_in_month, format_date_range,
    habits_completed_on, month_name, week_dates, CalendarDay, DayCompletion,
};
pub use report::{generate_report, HabitHighlight, ReportConfig, StatsReport};
pub use stats::{
    completion_rate, completion_series, longest_current_streak, monthly_aggregate,
    overall_completion_rate, top_habit, weekly_aggregate, MonthlyAggregate, WeekdayBucket,
};
pub use streaks::{
    current_streak, current_streak_start, in_active_streak, longest_streak, longest_streak_up_to,
    streak_days_in_month, streak_ending_at, streak_ongoing,
};
