//! Aggregate completion statistics across one or many habits.
//!
//! Like the streak functions, everything here is pure: the caller passes the
//! habit snapshots and the reference date. Window sizes default at the call
//! sites (30-day completion window, 70-day weekly lookback, 6 trend months)
//! but are always explicit parameters here.

use crate::types::{sunday_indexed, Habit};
use chrono::{Datelike, Days, Months, NaiveDate};
use std::collections::BTreeSet;

use super::streaks::current_streak;

/// Completion counts for one day of the week across all habits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekdayBucket {
    /// Day of week, 0 = Sunday .. 6 = Saturday
    pub weekday: u8,
    /// Completions that fell on this weekday inside the lookback window
    pub count: u32,
    /// Occurrences of this weekday inside the lookback window
    pub total: u32,
}

impl WeekdayBucket {
    /// Completions per occurrence of this weekday; 0 when the window is empty.
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.count) / f64::from(self.total)
        }
    }

    /// Full weekday name for display.
    pub fn day_name(weekday: u8) -> &'static str {
        match weekday {
            0 => "Sunday",
            1 => "Monday",
            2 => "Tuesday",
            3 => "Wednesday",
            4 => "Thursday",
            5 => "Friday",
            6 => "Saturday",
            _ => "Unknown",
        }
    }
}

/// Completion rate for one calendar month, oldest-first in series output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyAggregate {
    pub year: i32,
    /// 1-12
    pub month: u32,
    /// Completed days / possible days, as a percentage rounded to nearest
    pub rate: u32,
}

impl MonthlyAggregate {
    /// Short display label, e.g. "Mar 2024".
    pub fn label(&self) -> String {
        let name = match self.month {
            1 => "Jan",
            2 => "Feb",
            3 => "Mar",
            4 => "Apr",
            5 => "May",
            6 => "Jun",
            7 => "Jul",
            8 => "Aug",
            9 => "Sep",
            10 => "Oct",
            11 => "Nov",
            12 => "Dec",
            _ => "???",
        };
        format!("{} {}", name, self.year)
    }
}

/// First day of the window of the most recent `window_days` days ending at
/// `today` inclusive.
fn window_start(window_days: u32, today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(window_days.saturating_sub(1))))
        .unwrap_or(NaiveDate::MIN)
}

/// Percentage of the last `window_days` days (ending at `today`, inclusive)
/// on which the habit was done. Always in `[0, 100]`.
///
/// The divisor is the full window even when the habit is younger than the
/// window; new habits therefore start low and climb as history accumulates.
/// This mirrors the long-standing behavior and deliberately differs from
/// [`monthly_aggregate`], which is creation-date-aware.
pub fn completion_rate(done: &BTreeSet<NaiveDate>, window_days: u32, today: NaiveDate) -> f64 {
    if window_days == 0 {
        return 0.0;
    }
    let start = window_start(window_days, today);
    let completed = done.range(start..=today).count() as u32;
    f64::from(completed) / f64::from(window_days) * 100.0
}

/// Mean of per-habit completion rates; 0 when there are no habits.
pub fn overall_completion_rate(habits: &[Habit], window_days: u32, today: NaiveDate) -> f64 {
    if habits.is_empty() {
        return 0.0;
    }
    let sum: f64 = habits
        .iter()
        .map(|h| completion_rate(&h.done_dates, window_days, today))
        .sum();
    sum / habits.len() as f64
}

/// Per-day completion flags for the last `n` days, oldest first.
pub fn completion_series(
    done: &BTreeSet<NaiveDate>,
    n: u32,
    today: NaiveDate,
) -> Vec<(NaiveDate, bool)> {
    window_start(n, today)
        .iter_days()
        .take(n as usize)
        .map(|d| (d, done.contains(&d)))
        .collect()
}

/// Day-of-week completion buckets over the lookback window ending at `today`.
///
/// Both the completion counts and the weekday totals are limited to the same
/// `[today - lookback_days, today]` range, so `count / total` is a true rate.
pub fn weekly_aggregate(habits: &[Habit], lookback_days: u32, today: NaiveDate) -> [WeekdayBucket; 7] {
    let start = today
        .checked_sub_days(Days::new(u64::from(lookback_days)))
        .unwrap_or(NaiveDate::MIN);

    let mut buckets = [WeekdayBucket::default(); 7];
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.weekday = i as u8;
    }

    for habit in habits {
        for date in habit.done_dates.range(start..=today) {
            buckets[usize::from(sunday_indexed(*date))].count += 1;
        }
    }

    let mut day = start;
    while day <= today {
        buckets[usize::from(sunday_indexed(day))].total += 1;
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    buckets
}

/// Completion rate for each of the last `month_count` calendar months
/// (including the current one), oldest first.
///
/// Possible days per habit exclude days before the habit existed; a habit
/// created after a month's end contributes nothing to that month. With no
/// habits at all, every month reports rate 0.
pub fn monthly_aggregate(habits: &[Habit], month_count: u32, today: NaiveDate) -> Vec<MonthlyAggregate> {
    let mut series = Vec::with_capacity(month_count as usize);

    for back in (0..month_count).rev() {
        let Some(anchor) = today.checked_sub_months(Months::new(back)) else {
            continue;
        };
        let (year, month) = (anchor.year(), anchor.month());
        let month_start = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month start");
        let month_end = last_day_of_month(year, month);

        let mut total_possible: i64 = 0;
        let mut total_completed: i64 = 0;

        for habit in habits {
            if habit.created_at > month_end {
                continue;
            }
            let start = habit.created_at.max(month_start);
            total_possible += (month_end - start).num_days() + 1;
            total_completed += habit.done_dates.range(start..=month_end).count() as i64;
        }

        let rate = if total_possible > 0 {
            (total_completed as f64 / total_possible as f64 * 100.0).round() as u32
        } else {
            0
        };

        series.push(MonthlyAggregate { year, month, rate });
    }

    series
}

/// Last calendar day of the given month.
pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .expect("valid month end")
}

/// Habit with the highest completion rate over the window, if any.
///
/// Earlier habits win ties, matching list order in the UI.
pub fn top_habit<'a>(habits: &'a [Habit], window_days: u32, today: NaiveDate) -> Option<&'a Habit> {
    habits.iter().reduce(|best, habit| {
        let best_rate = completion_rate(&best.done_dates, window_days, today);
        let rate = completion_rate(&habit.done_dates, window_days, today);
        if rate > best_rate {
            habit
        } else {
            best
        }
    })
}

/// Habit with the longest active streak, with its length.
///
/// Returns the first habit with streak 0 when nothing is active, so callers
/// always have something to display for a non-empty habit list.
pub fn longest_current_streak<'a>(habits: &'a [Habit], today: NaiveDate) -> Option<(&'a Habit, u32)> {
    let first = habits.first()?;
    let mut best = (first, 0u32);
    for habit in habits {
        let streak = current_streak(&habit.done_dates, today);
        if streak > best.1 {
            best = (habit, streak);
        }
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HabitDraft;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn habit(created: &str, done: &[&str]) -> Habit {
        let mut h = Habit::new(HabitDraft::titled("test"), d(created));
        h.done_dates = done.iter().map(|s| d(s)).collect();
        h
    }

    #[test]
    fn test_completion_rate_basic() {
        let done: BTreeSet<NaiveDate> = ["2024-01-28", "2024-01-29", "2024-01-30"]
            .iter()
            .map(|s| d(s))
            .collect();
        let rate = completion_rate(&done, 30, d("2024-01-30"));
        assert!((rate - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_completion_rate_ignores_dates_outside_window() {
        let done: BTreeSet<NaiveDate> = ["2023-01-01", "2024-01-30"].iter().map(|s| d(s)).collect();
        let rate = completion_rate(&done, 30, d("2024-01-30"));
        assert!((rate - (1.0 / 30.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_completion_rate_monotonic_under_additions() {
        let today = d("2024-01-30");
        let mut done: BTreeSet<NaiveDate> = ["2024-01-10"].iter().map(|s| d(s)).collect();
        let mut prev = completion_rate(&done, 30, today);
        for day in ["2024-01-11", "2024-01-15", "2024-01-30"] {
            done.insert(d(day));
            let next = completion_rate(&done, 30, today);
            assert!(next >= prev, "rate decreased after adding {day}");
            prev = next;
        }
    }

    #[test]
    fn test_completion_rate_zero_window() {
        let done: BTreeSet<NaiveDate> = ["2024-01-30"].iter().map(|s| d(s)).collect();
        assert_eq!(completion_rate(&done, 0, d("2024-01-30")), 0.0);
    }

    #[test]
    fn test_overall_completion_rate_empty() {
        assert_eq!(overall_completion_rate(&[], 30, d("2024-01-30")), 0.0);
    }

    #[test]
    fn test_overall_completion_rate_is_mean() {
        let habits = vec![
            habit("2024-01-01", &["2024-01-28", "2024-01-29", "2024-01-30"]),
            habit("2024-01-01", &[]),
        ];
        let rate = overall_completion_rate(&habits, 30, d("2024-01-30"));
        assert!((rate - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_completion_series_oldest_first() {
        let done: BTreeSet<NaiveDate> = ["2024-01-30"].iter().map(|s| d(s)).collect();
        let series = completion_series(&done, 3, d("2024-01-30"));
        assert_eq!(series.len(), 3);
        assert_eq!(series[0], (d("2024-01-28"), false));
        assert_eq!(series[2], (d("2024-01-30"), true));
    }

    #[test]
    fn test_weekly_aggregate_no_habits() {
        let buckets = weekly_aggregate(&[], 70, d("2024-01-30"));
        // 71 calendar days in the inclusive window: every weekday occurs 10
        // times, plus one extra for the weekday shared by both endpoints.
        let totals: u32 = buckets.iter().map(|b| b.total).sum();
        assert_eq!(totals, 71);
        for bucket in &buckets {
            assert_eq!(bucket.count, 0);
            assert!(bucket.total == 10 || bucket.total == 11);
        }
    }

    #[test]
    fn test_weekly_aggregate_windows_both_sides() {
        // One completion inside the window, one far in the past
        let habits = vec![habit("2023-01-01", &["2023-01-02", "2024-01-29"])];
        let buckets = weekly_aggregate(&habits, 70, d("2024-01-30"));
        // 2024-01-29 is a Monday; the 2023 date must not be counted
        assert_eq!(buckets[1].count, 1);
        let counts: u32 = buckets.iter().map(|b| b.count).sum();
        assert_eq!(counts, 1);
    }

    #[test]
    fn test_weekly_aggregate_bucket_weekdays() {
        let buckets = weekly_aggregate(&[], 70, d("2024-01-30"));
        for (i, bucket) in buckets.iter().enumerate() {
            assert_eq!(bucket.weekday, i as u8);
        }
        assert_eq!(WeekdayBucket::day_name(0), "Sunday");
        assert_eq!(WeekdayBucket::day_name(6), "Saturday");
    }

    #[test]
    fn test_monthly_aggregate_creation_aware() {
        // Habit created mid-March with one completion: 17 possible days
        let habits = vec![habit("2024-03-15", &["2024-03-20"])];
        let series = monthly_aggregate(&habits, 1, d("2024-03-31"));
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].year, 2024);
        assert_eq!(series[0].month, 3);
        assert_eq!(series[0].rate, 6); // round(1/17 * 100)
    }

    #[test]
    fn test_monthly_aggregate_skips_not_yet_created() {
        let habits = vec![habit("2024-04-01", &[])];
        let series = monthly_aggregate(&habits, 2, d("2024-04-15"));
        assert_eq!(series.len(), 2);
        // March: habit didn't exist, no possible days, rate 0
        assert_eq!(series[0].month, 3);
        assert_eq!(series[0].rate, 0);
    }

    #[test]
    fn test_monthly_aggregate_empty_habits_yields_zero_months() {
        let series = monthly_aggregate(&[], 6, d("2024-06-15"));
        assert_eq!(series.len(), 6);
        assert!(series.iter().all(|m| m.rate == 0));
        // Oldest first
        assert_eq!(series[0].month, 1);
        assert_eq!(series[5].month, 6);
    }

    #[test]
    fn test_monthly_aggregate_crosses_year_boundary() {
        let series = monthly_aggregate(&[], 3, d("2024-01-15"));
        assert_eq!((series[0].year, series[0].month), (2023, 11));
        assert_eq!((series[2].year, series[2].month), (2024, 1));
    }

    #[test]
    fn test_monthly_aggregate_label() {
        let m = MonthlyAggregate {
            year: 2024,
            month: 3,
            rate: 6,
        };
        assert_eq!(m.label(), "Mar 2024");
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2024, 2), d("2024-02-29")); // leap year
        assert_eq!(last_day_of_month(2023, 2), d("2023-02-28"));
        assert_eq!(last_day_of_month(2024, 12), d("2024-12-31"));
    }

    #[test]
    fn test_top_habit() {
        let habits = vec![
            habit("2024-01-01", &["2024-01-29"]),
            habit("2024-01-01", &["2024-01-28", "2024-01-29", "2024-01-30"]),
        ];
        let top = top_habit(&habits, 30, d("2024-01-30")).unwrap();
        assert_eq!(top.id, habits[1].id);
        assert!(top_habit(&[], 30, d("2024-01-30")).is_none());
    }

    #[test]
    fn test_longest_current_streak() {
        let habits = vec![
            habit("2024-01-01", &["2024-01-01"]),
            habit("2024-01-01", &["2024-01-28", "2024-01-29", "2024-01-30"]),
        ];
        let (best, streak) = longest_current_streak(&habits, d("2024-01-30")).unwrap();
        assert_eq!(best.id, habits[1].id);
        assert_eq!(streak, 3);

        // All-cold habits still yield a display candidate
        let cold = vec![habit("2024-01-01", &["2024-01-01"])];
        let (_, streak) = longest_current_streak(&cold, d("2024-01-30")).unwrap();
        assert_eq!(streak, 0);
    }
}
