//! Storage abstraction over habit data.
//!
//! Two interchangeable backends sit behind [`HabitStore`]: the SQLite
//! [`Database`](crate::db::Database) for real persistence and [`MemoryStore`]
//! for demo mode, where nothing outlives the process. The analytics layer
//! never touches a store directly; callers load snapshots and pass them in,
//! so it stays agnostic to which backend supplied the data.

use crate::error::{Error, Result};
use crate::types::{Habit, HabitDraft, Reminder, SharedHabit};
use chrono::NaiveDate;
use std::sync::Mutex;

/// Storage operations shared by every backend.
pub trait HabitStore {
    /// All habits, ordered by creation date then title.
    fn list_habits(&self) -> Result<Vec<Habit>>;

    /// Look up a single habit by id.
    fn get_habit(&self, id: &str) -> Result<Option<Habit>>;

    /// Persist a fully-formed habit (used by creation and share import).
    fn insert_habit(&self, habit: &Habit) -> Result<()>;

    /// Add or remove a completion date. Adding an already-present date is a
    /// no-op; removing an absent one likewise.
    fn set_done_date(&self, habit_id: &str, date: NaiveDate, present: bool) -> Result<()>;

    /// Replace the reminder schedule for a habit.
    fn update_reminder(&self, habit_id: &str, reminder: Option<&Reminder>) -> Result<()>;

    /// Delete a habit and its completion history.
    fn delete_habit(&self, habit_id: &str) -> Result<()>;

    /// Record a new share.
    fn insert_share(&self, share: &SharedHabit) -> Result<()>;

    /// Look up a share by its claim code.
    fn share_by_code(&self, code: &str) -> Result<Option<SharedHabit>>;

    /// All shares created by the given identity.
    fn list_shares(&self, shared_by: &str) -> Result<Vec<SharedHabit>>;

    /// Flag a share as claimed.
    fn mark_claimed(&self, share_id: &str) -> Result<()>;

    /// Remove a share record.
    fn delete_share(&self, share_id: &str) -> Result<()>;

    /// Create a habit from a draft and persist it.
    fn create_habit(&self, draft: HabitDraft, created_at: NaiveDate) -> Result<Habit> {
        let habit = Habit::new(draft, created_at);
        self.insert_habit(&habit)?;
        Ok(habit)
    }
}

/// Ephemeral in-memory store used for demo mode.
///
/// Scoped to the process the way the original demo mode was scoped to the
/// browser; dropping the store drops the data.
#[derive(Default)]
pub struct MemoryStore {
    habits: Mutex<Vec<Habit>>,
    shares: Mutex<Vec<SharedHabit>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with the starter habits shown in demo mode.
    pub fn with_demo_data(today: NaiveDate) -> Self {
        let store = Self::new();

        let mut water = Habit::new(
            HabitDraft {
                title: "Drink Water".to_string(),
                description: Some("Drink at least 8 glasses of water daily".to_string()),
                ..Default::default()
            },
            today,
        );
        water.done_dates.insert(today);

        let exercise = Habit::new(
            HabitDraft {
                title: "Exercise".to_string(),
                description: Some("30 minutes of physical activity".to_string()),
                ..Default::default()
            },
            today,
        );

        let mut read = Habit::new(
            HabitDraft {
                title: "Read".to_string(),
                description: Some("Read for 20 minutes before bed".to_string()),
                reminder: Some(Reminder {
                    enabled: true,
                    time: "21:00".to_string(),
                    days: vec![0, 1, 2, 3, 4, 5, 6],
                    last_notified: None,
                }),
                ..Default::default()
            },
            today,
        );
        read.done_dates.insert(today);
        if let Some(yesterday) = today.pred_opt() {
            read.done_dates.insert(yesterday);
        }

        {
            let mut habits = store.habits.lock().unwrap();
            habits.push(water);
            habits.push(exercise);
            habits.push(read);
        }
        store
    }

    fn with_habit<T>(&self, id: &str, f: impl FnOnce(&mut Habit) -> T) -> Result<T> {
        let mut habits = self.habits.lock().unwrap();
        match habits.iter_mut().find(|h| h.id == id) {
            Some(habit) => Ok(f(habit)),
            None => Err(Error::HabitNotFound(id.to_string())),
        }
    }
}

impl HabitStore for MemoryStore {
    fn list_habits(&self) -> Result<Vec<Habit>> {
        let mut habits = self.habits.lock().unwrap().clone();
        habits.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.title.cmp(&b.title)));
        Ok(habits)
    }

    fn get_habit(&self, id: &str) -> Result<Option<Habit>> {
        Ok(self.habits.lock().unwrap().iter().find(|h| h.id == id).cloned())
    }

    fn insert_habit(&self, habit: &Habit) -> Result<()> {
        self.habits.lock().unwrap().push(habit.clone());
        Ok(())
    }

    fn set_done_date(&self, habit_id: &str, date: NaiveDate, present: bool) -> Result<()> {
        self.with_habit(habit_id, |habit| {
            if present {
                habit.done_dates.insert(date);
            } else {
                habit.done_dates.remove(&date);
            }
        })
    }

    fn update_reminder(&self, habit_id: &str, reminder: Option<&Reminder>) -> Result<()> {
        self.with_habit(habit_id, |habit| {
            habit.reminder = reminder.cloned();
        })
    }

    fn delete_habit(&self, habit_id: &str) -> Result<()> {
        let mut habits = self.habits.lock().unwrap();
        let before = habits.len();
        habits.retain(|h| h.id != habit_id);
        if habits.len() == before {
            return Err(Error::HabitNotFound(habit_id.to_string()));
        }
        Ok(())
    }

    fn insert_share(&self, share: &SharedHabit) -> Result<()> {
        self.shares.lock().unwrap().push(share.clone());
        Ok(())
    }

    fn share_by_code(&self, code: &str) -> Result<Option<SharedHabit>> {
        Ok(self
            .shares
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.share_code == code)
            .cloned())
    }

    fn list_shares(&self, shared_by: &str) -> Result<Vec<SharedHabit>> {
        Ok(self
            .shares
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.shared_by == shared_by)
            .cloned()
            .collect())
    }

    fn mark_claimed(&self, share_id: &str) -> Result<()> {
        let mut shares = self.shares.lock().unwrap();
        match shares.iter_mut().find(|s| s.id == share_id) {
            Some(share) => {
                share.claimed = true;
                Ok(())
            }
            None => Err(Error::ShareNotFound(share_id.to_string())),
        }
    }

    fn delete_share(&self, share_id: &str) -> Result<()> {
        let mut shares = self.shares.lock().unwrap();
        let before = shares.len();
        shares.retain(|s| s.id != share_id);
        if shares.len() == before {
            return Err(Error::ShareNotFound(share_id.to_string()));
        }
        Ok(())
    }
}
