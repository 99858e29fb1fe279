//! Streak computation over a habit's done dates.
//!
//! Every function here is pure and total: it takes the habit's date set plus
//! an explicit reference date and returns a fresh value. "Today" is always
//! injected by the caller so results are deterministic under test.
//!
//! The current-streak policy has a one-day grace window: a streak survives
//! today being not-yet-marked as long as yesterday was done, and only breaks
//! once two consecutive days are both missed.

use chrono::{Datelike, Days, NaiveDate};
use std::collections::BTreeSet;

/// Length of the streak ending at `date`, inclusive.
///
/// Returns 0 when `date` itself is not done; otherwise counts backward
/// day-by-day until the first gap.
pub fn streak_ending_at(done: &BTreeSet<NaiveDate>, date: NaiveDate) -> u32 {
    if !done.contains(&date) {
        return 0;
    }
    let mut streak = 1;
    let mut cursor = date;
    while let Some(prev) = cursor.pred_opt() {
        if !done.contains(&prev) {
            break;
        }
        streak += 1;
        cursor = prev;
    }
    streak
}

/// The active streak as of `today`, honoring the grace window.
///
/// Anchors on `today` when done, else on yesterday; returns 0 when both are
/// missed, regardless of how much unbroken history lies further back.
pub fn current_streak(done: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    if done.contains(&today) {
        return streak_ending_at(done, today);
    }
    match today.pred_opt() {
        Some(yesterday) if done.contains(&yesterday) => streak_ending_at(done, yesterday),
        _ => 0,
    }
}

/// First day of the current streak, or `None` when there is no active streak.
pub fn current_streak_start(done: &BTreeSet<NaiveDate>, today: NaiveDate) -> Option<NaiveDate> {
    let streak = current_streak(done, today);
    if streak == 0 {
        return None;
    }
    let anchor = if done.contains(&today) {
        today
    } else {
        today.pred_opt()?
    };
    anchor.checked_sub_days(Days::new(u64::from(streak) - 1))
}

/// Longest run of consecutive done dates ever recorded.
pub fn longest_streak(done: &BTreeSet<NaiveDate>) -> u32 {
    longest_run(done.iter().copied())
}

/// Longest run of consecutive done dates on or before `date`.
pub fn longest_streak_up_to(done: &BTreeSet<NaiveDate>, date: NaiveDate) -> u32 {
    longest_run(done.range(..=date).copied())
}

fn longest_run(dates: impl Iterator<Item = NaiveDate>) -> u32 {
    let mut max = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for date in dates {
        run = match prev {
            Some(p) if (date - p).num_days() == 1 => run + 1,
            _ => 1,
        };
        max = max.max(run);
        prev = Some(date);
    }
    max
}

/// Whether `date` belongs to a streak that is still alive as of `today`.
///
/// A past done date stays "active" when the following day is also done, or
/// when the following day is today itself (the still-open slot). Future
/// dates are never active.
pub fn in_active_streak(done: &BTreeSet<NaiveDate>, date: NaiveDate, today: NaiveDate) -> bool {
    if date > today {
        return false;
    }
    if date == today {
        return done.contains(&date);
    }
    if !done.contains(&date) {
        return false;
    }
    let Some(next) = date.succ_opt() else {
        return false;
    };
    next <= today && (done.contains(&next) || next == today)
}

/// Context-free variant used for month-level streak highlighting: `date` and
/// the day after are both done. Does not special-case today.
pub fn streak_ongoing(done: &BTreeSet<NaiveDate>, date: NaiveDate) -> bool {
    done.contains(&date)
        && date
            .succ_opt()
            .is_some_and(|next| done.contains(&next))
}

/// All days in the given month that sit inside an ongoing streak.
pub fn streak_days_in_month(done: &BTreeSet<NaiveDate>, year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|d| d.month() == month)
        .filter(|d| streak_ongoing(done, *d))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dates(strs: &[&str]) -> BTreeSet<NaiveDate> {
        strs.iter().map(|s| d(s)).collect()
    }

    #[test]
    fn test_current_streak_today_done() {
        let done = dates(&["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(current_streak(&done, d("2024-01-03")), 3);
    }

    #[test]
    fn test_current_streak_grace_window() {
        // Yesterday done, today not yet marked: streak survives
        let done = dates(&["2024-01-01", "2024-01-02"]);
        assert_eq!(current_streak(&done, d("2024-01-03")), 2);
    }

    #[test]
    fn test_current_streak_gone_cold() {
        // Two consecutive missed days break the streak outright
        let done = dates(&["2024-01-01", "2024-01-02"]);
        assert_eq!(current_streak(&done, d("2024-01-04")), 0);
    }

    #[test]
    fn test_current_streak_empty() {
        assert_eq!(current_streak(&BTreeSet::new(), d("2024-01-03")), 0);
    }

    #[test]
    fn test_current_streak_is_deterministic() {
        let done = dates(&["2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01"]);
        let first = current_streak(&done, d("2024-03-01"));
        for _ in 0..3 {
            assert_eq!(current_streak(&done, d("2024-03-01")), first);
        }
        // Spans the leap day
        assert_eq!(first, 4);
    }

    #[test]
    fn test_streak_ending_at_absent_date_is_zero() {
        let done = dates(&["2024-01-01", "2024-01-02"]);
        assert_eq!(streak_ending_at(&done, d("2024-01-03")), 0);
        assert_eq!(streak_ending_at(&done, d("2023-12-31")), 0);
    }

    #[test]
    fn test_streak_ending_at_counts_inclusive() {
        let done = dates(&["2024-01-01", "2024-01-02", "2024-01-05"]);
        assert_eq!(streak_ending_at(&done, d("2024-01-02")), 2);
        assert_eq!(streak_ending_at(&done, d("2024-01-05")), 1);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let done = dates(&["2024-01-30", "2024-01-31", "2024-02-01", "2024-02-02"]);
        assert_eq!(streak_ending_at(&done, d("2024-02-02")), 4);
    }

    #[test]
    fn test_longest_streak() {
        let done = dates(&[
            "2024-01-01",
            "2024-01-02",
            "2024-01-05",
            "2024-01-06",
            "2024-01-07",
        ]);
        assert_eq!(longest_streak(&done), 3);
    }

    #[test]
    fn test_longest_streak_empty_and_singleton() {
        assert_eq!(longest_streak(&BTreeSet::new()), 0);
        assert_eq!(longest_streak(&dates(&["2024-06-15"])), 1);
    }

    #[test]
    fn test_longest_streak_gapless_equals_len() {
        // Property from the contract: a gapless sequence of length k scores k
        let start = d("2024-03-25");
        let done: BTreeSet<NaiveDate> = start.iter_days().take(10).collect();
        assert_eq!(longest_streak(&done), 10);
    }

    #[test]
    fn test_longest_streak_up_to() {
        let done = dates(&[
            "2024-01-01",
            "2024-01-02",
            "2024-01-03",
            "2024-01-10",
            "2024-01-11",
        ]);
        assert_eq!(longest_streak_up_to(&done, d("2024-01-02")), 2);
        assert_eq!(longest_streak_up_to(&done, d("2024-01-31")), 3);
        assert_eq!(longest_streak_up_to(&done, d("2023-12-31")), 0);
    }

    #[test]
    fn test_current_streak_start() {
        let done = dates(&["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(
            current_streak_start(&done, d("2024-01-03")),
            Some(d("2024-01-01"))
        );
        // Grace window: anchor falls on yesterday
        assert_eq!(
            current_streak_start(&done, d("2024-01-04")),
            Some(d("2024-01-01"))
        );
        assert_eq!(current_streak_start(&done, d("2024-01-06")), None);
    }

    #[test]
    fn test_in_active_streak_future_is_false() {
        let done = dates(&["2024-01-05"]);
        assert!(!in_active_streak(&done, d("2024-01-05"), d("2024-01-04")));
    }

    #[test]
    fn test_in_active_streak_today() {
        let done = dates(&["2024-01-05"]);
        assert!(in_active_streak(&done, d("2024-01-05"), d("2024-01-05")));
        assert!(!in_active_streak(&BTreeSet::new(), d("2024-01-05"), d("2024-01-05")));
    }

    #[test]
    fn test_in_active_streak_tolerates_open_today() {
        // Yesterday done, today still open: yesterday is active
        let done = dates(&["2024-01-04"]);
        assert!(in_active_streak(&done, d("2024-01-04"), d("2024-01-05")));
        // Two days back with nothing since: broken
        assert!(!in_active_streak(&done, d("2024-01-04"), d("2024-01-06")));
    }

    #[test]
    fn test_in_active_streak_chained() {
        let done = dates(&["2024-01-03", "2024-01-04", "2024-01-05"]);
        assert!(in_active_streak(&done, d("2024-01-03"), d("2024-01-05")));
        assert!(in_active_streak(&done, d("2024-01-04"), d("2024-01-05")));
    }

    #[test]
    fn test_streak_ongoing() {
        let done = dates(&["2024-01-03", "2024-01-04"]);
        assert!(streak_ongoing(&done, d("2024-01-03")));
        assert!(!streak_ongoing(&done, d("2024-01-04")));
        assert!(!streak_ongoing(&done, d("2024-01-02")));
    }

    #[test]
    fn test_streak_days_in_month() {
        let done = dates(&["2024-01-30", "2024-01-31", "2024-02-01", "2024-02-10"]);
        assert_eq!(
            streak_days_in_month(&done, 2024, 1),
            vec![d("2024-01-30"), d("2024-01-31")]
        );
        assert!(streak_days_in_month(&done, 2024, 2).is_empty());
    }
}
