//! Database repository layer
//!
//! SQLite-backed implementation of [`HabitStore`]. Dates are persisted as
//! `YYYY-MM-DD` TEXT; reminder schedules as JSON.

use crate::error::{Error, Result};
use crate::store::HabitStore;
use crate::types::{format_date, parse_date, Habit, Reminder, SharedHabit};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Mutex;

/// Database handle (single connection behind a mutex)
pub struct Database {
    conn: Mutex<Connection>,
}

/// Habit columns in the order every query selects them.
const HABIT_COLUMNS: &str =
    "id, title, description, created_at, category, reminder, shared_by, shared_at";

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for better concurrency
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    /// Map a habit row into a [`Habit`] with an empty date set; completion
    /// history is attached by the caller.
    fn row_to_habit(row: &Row<'_>) -> rusqlite::Result<RawHabit> {
        Ok(RawHabit {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            created_at: row.get(3)?,
            category: row.get(4)?,
            reminder: row.get(5)?,
            shared_by: row.get(6)?,
            shared_at: row.get(7)?,
        })
    }

    fn row_to_share(row: &Row<'_>) -> rusqlite::Result<RawShare> {
        Ok(RawShare {
            id: row.get(0)?,
            habit_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            category: row.get(4)?,
            shared_by: row.get(5)?,
            shared_at: row.get(6)?,
            share_code: row.get(7)?,
            expires_at: row.get(8)?,
            claimed: row.get(9)?,
        })
    }

    fn done_dates_for(conn: &Connection, habit_id: &str) -> Result<BTreeSet<NaiveDate>> {
        let mut stmt = conn.prepare("SELECT date FROM done_dates WHERE habit_id = ?")?;
        let rows = stmt.query_map([habit_id], |row| row.get::<_, String>(0))?;

        let mut dates = BTreeSet::new();
        for raw in rows {
            dates.insert(parse_date(&raw?)?);
        }
        Ok(dates)
    }

    fn habit_exists(conn: &Connection, habit_id: &str) -> Result<bool> {
        let found: Option<i64> = conn
            .query_row("SELECT 1 FROM habits WHERE id = ?", [habit_id], |r| r.get(0))
            .optional()?;
        Ok(found.is_some())
    }
}

/// Habit row as stored, before date parsing.
struct RawHabit {
    id: String,
    title: String,
    description: Option<String>,
    created_at: String,
    category: Option<String>,
    reminder: Option<String>,
    shared_by: Option<String>,
    shared_at: Option<String>,
}

impl RawHabit {
    fn into_habit(self, done_dates: BTreeSet<NaiveDate>) -> Result<Habit> {
        let reminder: Option<Reminder> = match self.reminder {
            Some(json) => Some(serde_json::from_str(&json)?),
            None => None,
        };
        Ok(Habit {
            id: self.id,
            title: self.title,
            description: self.description,
            created_at: parse_date(&self.created_at)?,
            done_dates,
            reminder,
            category: self.category,
            shared_by: self.shared_by,
            shared_at: self.shared_at.as_deref().map(parse_date).transpose()?,
        })
    }
}

struct RawShare {
    id: String,
    habit_id: String,
    title: String,
    description: Option<String>,
    category: Option<String>,
    shared_by: String,
    shared_at: String,
    share_code: String,
    expires_at: String,
    claimed: bool,
}

impl RawShare {
    fn into_share(self) -> Result<SharedHabit> {
        Ok(SharedHabit {
            id: self.id,
            habit_id: self.habit_id,
            title: self.title,
            description: self.description,
            category: self.category,
            shared_by: self.shared_by,
            shared_at: parse_date(&self.shared_at)?,
            share_code: self.share_code,
            expires_at: parse_date(&self.expires_at)?,
            claimed: self.claimed,
        })
    }
}

impl HabitStore for Database {
    fn list_habits(&self) -> Result<Vec<Habit>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits ORDER BY created_at, title"
        ))?;
        let raw: Vec<RawHabit> = stmt
            .query_map([], Self::row_to_habit)?
            .collect::<rusqlite::Result<_>>()?;

        // One pass over done_dates instead of a query per habit
        let mut stmt = conn.prepare("SELECT habit_id, date FROM done_dates")?;
        let mut by_habit: HashMap<String, BTreeSet<NaiveDate>> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (habit_id, raw_date) = row?;
            by_habit.entry(habit_id).or_default().insert(parse_date(&raw_date)?);
        }

        raw.into_iter()
            .map(|r| {
                let dates = by_habit.remove(&r.id).unwrap_or_default();
                r.into_habit(dates)
            })
            .collect()
    }

    fn get_habit(&self, id: &str) -> Result<Option<Habit>> {
        let conn = self.conn.lock().unwrap();
        let raw = conn
            .query_row(
                &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?"),
                [id],
                Self::row_to_habit,
            )
            .optional()?;

        match raw {
            Some(raw) => {
                let dates = Self::done_dates_for(&conn, id)?;
                Ok(Some(raw.into_habit(dates)?))
            }
            None => Ok(None),
        }
    }

    fn insert_habit(&self, habit: &Habit) -> Result<()> {
        let reminder_json = habit
            .reminder
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            &format!(
                "INSERT INTO habits ({HABIT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
            ),
            params![
                habit.id,
                habit.title,
                habit.description,
                format_date(habit.created_at),
                habit.category,
                reminder_json,
                habit.shared_by,
                habit.shared_at.map(format_date),
            ],
        )?;

        for date in &habit.done_dates {
            conn.execute(
                "INSERT OR IGNORE INTO done_dates (habit_id, date) VALUES (?1, ?2)",
                params![habit.id, format_date(*date)],
            )?;
        }
        Ok(())
    }

    fn set_done_date(&self, habit_id: &str, date: NaiveDate, present: bool) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        if !Self::habit_exists(&conn, habit_id)? {
            return Err(Error::HabitNotFound(habit_id.to_string()));
        }

        if present {
            conn.execute(
                "INSERT OR IGNORE INTO done_dates (habit_id, date) VALUES (?1, ?2)",
                params![habit_id, format_date(date)],
            )?;
        } else {
            conn.execute(
                "DELETE FROM done_dates WHERE habit_id = ?1 AND date = ?2",
                params![habit_id, format_date(date)],
            )?;
        }
        Ok(())
    }

    fn update_reminder(&self, habit_id: &str, reminder: Option<&Reminder>) -> Result<()> {
        let reminder_json = reminder.map(serde_json::to_string).transpose()?;

        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE habits SET reminder = ?1 WHERE id = ?2",
            params![reminder_json, habit_id],
        )?;
        if updated == 0 {
            return Err(Error::HabitNotFound(habit_id.to_string()));
        }
        Ok(())
    }

    fn delete_habit(&self, habit_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        // done_dates rows go with the habit via ON DELETE CASCADE
        let deleted = conn.execute("DELETE FROM habits WHERE id = ?", [habit_id])?;
        if deleted == 0 {
            return Err(Error::HabitNotFound(habit_id.to_string()));
        }
        Ok(())
    }

    fn insert_share(&self, share: &SharedHabit) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO shared_habits
                (id, habit_id, title, description, category, shared_by,
                 shared_at, share_code, expires_at, claimed)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                share.id,
                share.habit_id,
                share.title,
                share.description,
                share.category,
                share.shared_by,
                format_date(share.shared_at),
                share.share_code,
                format_date(share.expires_at),
                share.claimed,
            ],
        )?;
        Ok(())
    }

    fn share_by_code(&self, code: &str) -> Result<Option<SharedHabit>> {
        let conn = self.conn.lock().unwrap();
        let raw = conn
            .query_row(
                r#"
                SELECT id, habit_id, title, description, category, shared_by,
                       shared_at, share_code, expires_at, claimed
                FROM shared_habits WHERE share_code = ?
                "#,
                [code],
                Self::row_to_share,
            )
            .optional()?;
        raw.map(RawShare::into_share).transpose()
    }

    fn list_shares(&self, shared_by: &str) -> Result<Vec<SharedHabit>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, habit_id, title, description, category, shared_by,
                   shared_at, share_code, expires_at, claimed
            FROM shared_habits WHERE shared_by = ? ORDER BY shared_at
            "#,
        )?;
        let raw: Vec<RawShare> = stmt
            .query_map([shared_by], Self::row_to_share)?
            .collect::<rusqlite::Result<_>>()?;
        raw.into_iter().map(RawShare::into_share).collect()
    }

    fn mark_claimed(&self, share_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE shared_habits SET claimed = 1 WHERE id = ?",
            [share_id],
        )?;
        if updated == 0 {
            return Err(Error::ShareNotFound(share_id.to_string()));
        }
        Ok(())
    }

    fn delete_share(&self, share_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM shared_habits WHERE id = ?", [share_id])?;
        if deleted == 0 {
            return Err(Error::ShareNotFound(share_id.to_string()));
        }
        Ok(())
    }
}
