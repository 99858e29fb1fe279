//! Stats report assembly: one call that gathers every dashboard figure for a
//! set of habits, ready for terminal, markdown, or JSON rendering.

use chrono::NaiveDate;

use super::stats::{
    completion_rate, longest_current_streak, monthly_aggregate, overall_completion_rate, top_habit,
    weekly_aggregate, MonthlyAggregate, WeekdayBucket,
};
use super::streaks::longest_streak;
use crate::types::Habit;

/// Tunable windows for report generation.
#[derive(Debug, Clone, Copy)]
pub struct ReportConfig {
    /// Completion-rate window in days
    pub window_days: u32,
    /// Weekly heatmap lookback in days
    pub lookback_days: u32,
    /// Number of months in the trend series
    pub trend_months: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            lookback_days: 70,
            trend_months: 6,
        }
    }
}

/// A habit singled out by the report, with the figure that earned the spot.
#[derive(Debug, Clone)]
pub struct HabitHighlight {
    pub title: String,
    /// Completion rate for the top habit, streak length for the streak leader
    pub value: f64,
}

/// Complete statistics for a set of habits at a reference date.
#[derive(Debug, Clone)]
pub struct StatsReport {
    /// The date the report was computed for
    pub today: NaiveDate,
    /// Windows used
    pub config: ReportConfig,
    /// Number of habits included
    pub habit_count: usize,
    /// Mean per-habit completion rate over the window, in percent
    pub overall_rate: f64,
    /// Longest streak ever across all habits
    pub longest_ever: u32,
    /// Best completion rate over the window
    pub top_habit: Option<HabitHighlight>,
    /// Longest currently-active streak
    pub streak_leader: Option<HabitHighlight>,
    /// Day-of-week completion buckets
    pub weekly: [WeekdayBucket; 7],
    /// Month-over-month completion rates, oldest first
    pub monthly: Vec<MonthlyAggregate>,
}

/// Compute the full stats report for the given habits as of `today`.
pub fn generate_report(habits: &[Habit], config: ReportConfig, today: NaiveDate) -> StatsReport {
    let top = top_habit(habits, config.window_days, today).map(|h| HabitHighlight {
        title: h.title.clone(),
        value: completion_rate(&h.done_dates, config.window_days, today),
    });

    let leader = longest_current_streak(habits, today).map(|(h, streak)| HabitHighlight {
        title: h.title.clone(),
        value: f64::from(streak),
    });

    let longest_ever = habits
        .iter()
        .map(|h| longest_streak(&h.done_dates))
        .max()
        .unwrap_or(0);

    StatsReport {
        today,
        config,
        habit_count: habits.len(),
        overall_rate: overall_completion_rate(habits, config.window_days, today),
        longest_ever,
        top_habit: top,
        streak_leader: leader,
        weekly: weekly_aggregate(habits, config.lookback_days, today),
        monthly: monthly_aggregate(habits, config.trend_months, today),
    }
}
