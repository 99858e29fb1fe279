//! Core domain types for habitrail
//!
//! These types represent the persistent data model shared by every storage
//! backend and consumed by the analytics layer.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Habit** | A recurring activity a person wants to keep; owns a set of done dates |
//! | **Done date** | A calendar date (`YYYY-MM-DD`) on which a habit was marked complete |
//! | **Streak** | A maximal run of consecutive done dates |
//! | **Reminder** | Optional per-habit schedule (time of day + weekdays) |
//! | **Share** | A claimable snapshot of a habit, addressed by an 8-character code |
//!
//! All date handling in the data model is calendar-date granularity
//! ([`chrono::NaiveDate`]); "consecutive" always means exactly one calendar
//! day apart, regardless of time zone. Times of day only appear in reminder
//! schedules.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================
// Habit
// ============================================

/// A tracked habit and its completion history.
///
/// `done_dates` is a [`BTreeSet`], so the two data-model invariants — no
/// duplicate dates, processed in sorted order — hold by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Short display title
    pub title: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Calendar date the habit was created; days before this don't count
    /// against month-level completion rates
    pub created_at: NaiveDate,
    /// All dates on which this habit was marked complete
    pub done_dates: BTreeSet<NaiveDate>,
    /// Optional reminder schedule
    pub reminder: Option<Reminder>,
    /// Optional category tag
    pub category: Option<String>,
    /// Identity of the sharer, when this habit was imported from a share
    pub shared_by: Option<String>,
    /// When the import happened
    pub shared_at: Option<NaiveDate>,
}

impl Habit {
    /// Create a fresh habit from a draft, with a generated id and no history.
    pub fn new(draft: HabitDraft, created_at: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            created_at,
            done_dates: BTreeSet::new(),
            reminder: draft.reminder,
            category: draft.category,
            shared_by: None,
            shared_at: None,
        }
    }

    /// Whether this habit was marked complete on the given date.
    pub fn is_done_on(&self, date: NaiveDate) -> bool {
        self.done_dates.contains(&date)
    }

    /// Whether this habit existed on the given date.
    ///
    /// Creation timestamps are calendar dates, so "created on or before the
    /// end of `date`" collapses to a plain date comparison.
    pub fn existed_on(&self, date: NaiveDate) -> bool {
        self.created_at <= date
    }
}

/// User-supplied fields for creating a habit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub reminder: Option<Reminder>,
}

impl HabitDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

// ============================================
// Reminder
// ============================================

/// Per-habit reminder schedule.
///
/// Delivery is out of scope for this library; callers poll [`Reminder::is_due_at`]
/// and do their own notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    /// Whether the reminder is active
    pub enabled: bool,
    /// Time of day in 24-hour `HH:MM` form
    pub time: String,
    /// Weekdays the reminder fires on (0 = Sunday .. 6 = Saturday)
    pub days: Vec<u8>,
    /// Date the reminder last fired, to suppress repeats within a day
    pub last_notified: Option<NaiveDate>,
}

impl Reminder {
    /// Parse the `HH:MM` schedule time, if well-formed.
    pub fn schedule_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.time, "%H:%M").ok()
    }

    /// Whether the reminder should fire at the given local time.
    ///
    /// Fires within a five-minute window after the scheduled time, on
    /// scheduled weekdays only, at most once per day.
    pub fn is_due_at(&self, now: NaiveDateTime) -> bool {
        if !self.enabled {
            return false;
        }
        if self.last_notified == Some(now.date()) {
            return false;
        }
        if !self.days.contains(&sunday_indexed(now.date())) {
            return false;
        }
        let Some(at) = self.schedule_time() else {
            return false;
        };
        let elapsed =
            i64::from(now.time().num_seconds_from_midnight()) - i64::from(at.num_seconds_from_midnight());
        (0..300).contains(&elapsed)
    }
}

/// Day-of-week index with Sunday = 0, matching the weekly aggregate buckets.
pub fn sunday_indexed(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

// ============================================
// Shares
// ============================================

/// A claimable snapshot of a habit, addressed by its share code.
///
/// Shares carry only the descriptive fields; completion history never
/// travels with a share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedHabit {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Id of the habit that was shared
    pub habit_id: String,
    /// Snapshot of the habit title at share time
    pub title: String,
    /// Snapshot of the description
    pub description: Option<String>,
    /// Snapshot of the category
    pub category: Option<String>,
    /// Identity (e.g. email) of the user who shared
    pub shared_by: String,
    /// When the share was created
    pub shared_at: NaiveDate,
    /// 8-character claim code (A–Z, 0–9)
    pub share_code: String,
    /// Date after which the code stops resolving
    pub expires_at: NaiveDate,
    /// Whether someone has imported this share
    pub claimed: bool,
}

impl SharedHabit {
    /// Whether the share is still claimable on the given date.
    pub fn is_live_on(&self, today: NaiveDate) -> bool {
        today <= self.expires_at
    }
}

/// Parse a stored `YYYY-MM-DD` string into a calendar date.
pub fn parse_date(s: &str) -> crate::error::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| crate::error::Error::InvalidDate(s.to_string()))
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_habit_new_has_no_history() {
        let habit = Habit::new(HabitDraft::titled("Read"), d("2024-01-10"));
        assert!(habit.done_dates.is_empty());
        assert_eq!(habit.created_at, d("2024-01-10"));
        assert!(!habit.id.is_empty());
    }

    #[test]
    fn test_existed_on() {
        let habit = Habit::new(HabitDraft::titled("Read"), d("2024-03-15"));
        assert!(!habit.existed_on(d("2024-03-14")));
        assert!(habit.existed_on(d("2024-03-15")));
        assert!(habit.existed_on(d("2024-03-16")));
    }

    #[test]
    fn test_reminder_due_window() {
        let reminder = Reminder {
            enabled: true,
            time: "21:00".to_string(),
            days: vec![0, 1, 2, 3, 4, 5, 6],
            last_notified: None,
        };
        // 2024-01-03 is a Wednesday
        let base = d("2024-01-03");
        assert!(reminder.is_due_at(base.and_hms_opt(21, 0, 0).unwrap()));
        assert!(reminder.is_due_at(base.and_hms_opt(21, 4, 59).unwrap()));
        assert!(!reminder.is_due_at(base.and_hms_opt(21, 5, 0).unwrap()));
        assert!(!reminder.is_due_at(base.and_hms_opt(20, 59, 0).unwrap()));
    }

    #[test]
    fn test_reminder_respects_weekdays_and_last_notified() {
        let mut reminder = Reminder {
            enabled: true,
            time: "08:00".to_string(),
            days: vec![1], // Mondays only
            last_notified: None,
        };
        let monday = d("2024-01-01");
        let tuesday = d("2024-01-02");
        assert!(reminder.is_due_at(monday.and_hms_opt(8, 1, 0).unwrap()));
        assert!(!reminder.is_due_at(tuesday.and_hms_opt(8, 1, 0).unwrap()));

        reminder.last_notified = Some(monday);
        assert!(!reminder.is_due_at(monday.and_hms_opt(8, 1, 0).unwrap()));
    }

    #[test]
    fn test_sunday_indexed() {
        assert_eq!(sunday_indexed(d("2024-01-07")), 0); // Sunday
        assert_eq!(sunday_indexed(d("2024-01-01")), 1); // Monday
        assert_eq!(sunday_indexed(d("2024-01-06")), 6); // Saturday
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("2024-01-15").is_ok());
        assert!(parse_date("not-a-date").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }
}
