//! # habitrail-core
//!
//! Core library for habitrail - a personal habit tracker.
//!
//! This library provides:
//! - Domain types for habits, reminders, and shares
//! - Storage backends: SQLite and an in-memory demo store behind one trait
//! - Pure analytics over completion history (streaks, rates, trends)
//! - Habit sharing via short claim codes
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! The analytics layer never performs I/O: callers load habit snapshots from
//! a [`HabitStore`] and pass them in together with an explicit "today", so
//! every computation is deterministic and testable.
//!
//! ## Example
//!
//! ```rust,no_run
//! use habitrail_core::{Config, Database, HabitStore};
//! use habitrail_core::analytics::{generate_report, ReportConfig};
//!
//! let config = Config::load().expect("failed to load config");
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let habits = db.list_habits().expect("failed to load habits");
//! let today = chrono::Local::now().date_naive();
//! let report = generate_report(&habits, ReportConfig::default(), today);
//! println!("completion rate: {:.0}%", report.overall_rate);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use store::{HabitStore, MemoryStore};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod sharing;
pub mod store;
pub mod types;
