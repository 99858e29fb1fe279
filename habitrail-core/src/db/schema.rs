//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: habits and their completion history
    r#"
    CREATE TABLE IF NOT EXISTS habits (
        id          TEXT PRIMARY KEY,
        title       TEXT NOT NULL,
        description TEXT,
        created_at  TEXT NOT NULL,      -- calendar date, YYYY-MM-DD
        category    TEXT,
        reminder    JSON                -- serialized reminder schedule
    );

    CREATE TABLE IF NOT EXISTS done_dates (
        habit_id    TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
        date        TEXT NOT NULL,      -- calendar date, YYYY-MM-DD

        PRIMARY KEY (habit_id, date)
    );

    CREATE INDEX IF NOT EXISTS idx_done_dates_date ON done_dates(date);
    CREATE INDEX IF NOT EXISTS idx_habits_category ON habits(category);
    "#,
    // Version 2: sharing (claimable habit snapshots + import provenance)
    r#"
    CREATE TABLE IF NOT EXISTS shared_habits (
        id          TEXT PRIMARY KEY,
        habit_id    TEXT NOT NULL,
        title       TEXT NOT NULL,
        description TEXT,
        category    TEXT,
        shared_by   TEXT NOT NULL,
        shared_at   TEXT NOT NULL,
        share_code  TEXT NOT NULL UNIQUE,
        expires_at  TEXT NOT NULL,
        claimed     INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS idx_shared_habits_code ON shared_habits(share_code);

    ALTER TABLE habits ADD COLUMN shared_by TEXT;
    ALTER TABLE habits ADD COLUMN shared_at TEXT;
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        // Run migrations twice - should be idempotent
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let tables = ["habits", "done_dates", "shared_habits"];

        for table in tables {
            let exists: i32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
                    [table],
                    |r| r.get(0),
                )
                .unwrap();
            assert_eq!(exists, 1, "Table {} should exist", table);
        }
    }

    #[test]
    fn test_done_dates_unique_per_habit() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        conn.execute(
            "INSERT INTO habits (id, title, created_at) VALUES ('h1', 'Read', '2024-01-01')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO done_dates (habit_id, date) VALUES ('h1', '2024-01-02')",
            [],
        )
        .unwrap();

        // Second insert of the same (habit, date) pair must be rejected
        let duplicate = conn.execute(
            "INSERT INTO done_dates (habit_id, date) VALUES ('h1', '2024-01-02')",
            [],
        );
        assert!(duplicate.is_err());
    }
}
