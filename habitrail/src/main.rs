//! habitrail — track daily habits, streaks, and completion stats from the
//! terminal.

mod render;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use habitrail_core::analytics::{completion_rate, current_streak, generate_report, ReportConfig};
use habitrail_core::{
    parse_date, sharing, Config, Database, Habit, HabitDraft, HabitStore, MemoryStore, Reminder,
};

#[derive(Parser)]
#[command(name = "habitrail", version)]
#[command(about = "Track daily habits, streaks, and completion stats")]
struct Cli {
    /// Run against an ephemeral demo store instead of the real database
    #[arg(long, global = true)]
    demo: bool,

    /// Override the reference date (YYYY-MM-DD); defaults to the local date
    #[arg(long, global = true, value_name = "DATE")]
    today: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new habit
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// List habits with today's status and current streaks
    List,
    /// Mark a habit as done
    Done {
        /// Habit id, id prefix, or title
        habit: String,
        /// Date to mark (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove a completion mark
    Undo {
        /// Habit id, id prefix, or title
        habit: String,
        /// Date to unmark (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a habit and its history
    Remove {
        /// Habit id, id prefix, or title
        habit: String,
    },
    /// Show the stats report
    Stats {
        /// Export format instead of the terminal view
        #[arg(long, value_enum)]
        export: Option<ExportFormat>,
        /// Completion-rate window in days
        #[arg(long)]
        window: Option<u32>,
    },
    /// Month calendar for one habit or all of them
    Calendar {
        /// Habit id, id prefix, or title; omit for the all-habits view
        habit: Option<String>,
        /// Month to show as YYYY-MM, defaults to the current month
        #[arg(long)]
        month: Option<String>,
    },
    /// Share a habit and print its claim code
    Share {
        /// Habit id, id prefix, or title
        habit: String,
    },
    /// List your shares
    Shares {
        /// Revoke the share with this code instead of listing
        #[arg(long, value_name = "CODE")]
        revoke: Option<String>,
    },
    /// Import a shared habit by its claim code
    Import { code: String },
    /// Set or clear a habit's reminder schedule
    Remind {
        /// Habit id, id prefix, or title
        habit: String,
        /// Reminder time as 24-hour HH:MM
        #[arg(long)]
        time: Option<String>,
        /// Weekdays the reminder fires on, 0 = Sunday (default: every day)
        #[arg(long, value_delimiter = ',')]
        days: Vec<u8>,
        /// Clear the reminder
        #[arg(long)]
        off: bool,
    },
    /// Show reminders that are due right now
    Due,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Md,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    Config::ensure_xdg_env();
    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = habitrail_core::logging::init(&config.logging)
        .context("failed to initialize logging")?;

    let today = match &cli.today {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };

    let store: Box<dyn HabitStore> = if cli.demo {
        eprintln!("demo mode: changes will not be saved");
        Box::new(MemoryStore::with_demo_data(today))
    } else {
        let db = Database::open(&Config::database_path()).context("failed to open database")?;
        db.migrate().context("failed to run database migrations")?;
        Box::new(db)
    };

    run(cli.command, store.as_ref(), &config, today)
}

fn run(command: Command, store: &dyn HabitStore, config: &Config, today: NaiveDate) -> Result<()> {
    match command {
        Command::Add {
            title,
            description,
            category,
        } => {
            let draft = HabitDraft {
                title,
                description,
                category,
                reminder: None,
            };
            let habit = store.create_habit(draft, today)?;
            tracing::info!(habit_id = %habit.id, title = %habit.title, "habit created");
            println!("Added '{}' ({})", habit.title, short_id(&habit.id));
        }

        Command::List => {
            let habits = store.list_habits()?;
            if habits.is_empty() {
                println!("No habits yet. Add one with `habitrail add <title>`.");
                return Ok(());
            }
            for habit in &habits {
                let mark = if habit.is_done_on(today) { "x" } else { " " };
                let streak = current_streak(&habit.done_dates, today);
                let rate = completion_rate(&habit.done_dates, config.analytics.window_days, today);
                println!(
                    "  [{}] {:<28} {:>3}d streak  {:>3.0}%  {}",
                    mark,
                    habit.title,
                    streak,
                    rate,
                    short_id(&habit.id)
                );
            }
        }

        Command::Done { habit, date } => {
            let habit = resolve_habit(store, &habit)?;
            let date = resolve_date(date.as_deref(), today)?;
            store.set_done_date(&habit.id, date, true)?;
            let done = {
                let mut dates = habit.done_dates.clone();
                dates.insert(date);
                dates
            };
            let streak = current_streak(&done, today);
            println!(
                "Marked '{}' done on {} ({} day streak)",
                habit.title, date, streak
            );
        }

        Command::Undo { habit, date } => {
            let habit = resolve_habit(store, &habit)?;
            let date = resolve_date(date.as_deref(), today)?;
            store.set_done_date(&habit.id, date, false)?;
            println!("Unmarked '{}' on {}", habit.title, date);
        }

        Command::Remove { habit } => {
            let habit = resolve_habit(store, &habit)?;
            store.delete_habit(&habit.id)?;
            tracing::info!(habit_id = %habit.id, "habit deleted");
            println!("Removed '{}'", habit.title);
        }

        Command::Stats { export, window } => {
            let habits = store.list_habits()?;
            let report_config = ReportConfig {
                window_days: window.unwrap_or(config.analytics.window_days),
                lookback_days: config.analytics.lookback_days,
                trend_months: config.analytics.trend_months,
            };
            let report = generate_report(&habits, report_config, today);
            match export {
                None => render::print_terminal(&report),
                Some(ExportFormat::Md) => render::print_markdown(&report)?,
                Some(ExportFormat::Json) => render::print_json(&report)?,
            }
        }

        Command::Calendar { habit, month } => {
            let (year, month) = match month {
                Some(s) => parse_month(&s)?,
                None => (today.year(), today.month()),
            };
            let habits = store.list_habits()?;
            let habit = habit
                .as_deref()
                .map(|selector| resolve_habit(store, selector))
                .transpose()?;
            render::print_calendar(&habits, habit.as_ref(), year, month, today);
        }

        Command::Share { habit } => {
            let habit = resolve_habit(store, &habit)?;
            let identity = config.profile.identity_or_default();
            let share = sharing::share_habit(
                store,
                &habit.id,
                &identity,
                config.sharing.expiry_days,
                today,
            )?;
            println!("Shared '{}'", habit.title);
            println!("  code:    {}", share.share_code);
            println!("  expires: {}", share.expires_at);
        }

        Command::Shares { revoke } => {
            let identity = config.profile.identity_or_default();
            if let Some(code) = revoke {
                let code = code.to_uppercase();
                let Some(share) = store.share_by_code(&code)? else {
                    bail!("no share with code {code}");
                };
                store.delete_share(&share.id)?;
                println!("Revoked share {} ('{}')", code, share.title);
                return Ok(());
            }
            let shares = store.list_shares(&identity)?;
            if shares.is_empty() {
                println!("No shares. Create one with `habitrail share <habit>`.");
                return Ok(());
            }
            for share in &shares {
                let status = if share.claimed {
                    "claimed"
                } else if share.is_live_on(today) {
                    "live"
                } else {
                    "expired"
                };
                println!(
                    "  {}  {:<28} shared {}  expires {}  [{}]",
                    share.share_code, share.title, share.shared_at, share.expires_at, status
                );
            }
        }

        Command::Import { code } => {
            let habit = sharing::import_share(store, &code.to_uppercase(), today)?;
            println!(
                "Imported '{}' (shared by {})",
                habit.title,
                habit.shared_by.as_deref().unwrap_or("unknown")
            );
        }

        Command::Remind {
            habit,
            time,
            days,
            off,
        } => {
            let habit = resolve_habit(store, &habit)?;
            if off {
                store.update_reminder(&habit.id, None)?;
                println!("Cleared reminder for '{}'", habit.title);
                return Ok(());
            }
            let Some(time) = time else {
                bail!("pass --time HH:MM to set a reminder, or --off to clear it");
            };
            let days = if days.is_empty() {
                (0..7).collect()
            } else {
                days
            };
            if days.iter().any(|d| *d > 6) {
                bail!("reminder days must be 0 (Sunday) through 6 (Saturday)");
            }
            let reminder = Reminder {
                enabled: true,
                time,
                days,
                last_notified: None,
            };
            if reminder.schedule_time().is_none() {
                bail!("invalid reminder time '{}'; expected HH:MM", reminder.time);
            }
            store.update_reminder(&habit.id, Some(&reminder))?;
            println!("Reminder for '{}' set to {}", habit.title, reminder.time);
        }

        Command::Due => {
            let now = today.and_time(Local::now().time());
            let habits = store.list_habits()?;
            let due: Vec<&Habit> = habits
                .iter()
                .filter(|h| h.reminder.as_ref().is_some_and(|r| r.is_due_at(now)))
                .collect();
            if due.is_empty() {
                println!("No reminders due.");
            } else {
                for habit in due {
                    println!("  {} — due now", habit.title);
                }
            }
        }
    }

    Ok(())
}

fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}

fn resolve_date(date: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match date {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(today),
    }
}

/// Match a habit by exact id, then unique id prefix, then case-insensitive
/// title.
fn resolve_habit(store: &dyn HabitStore, selector: &str) -> Result<Habit> {
    if let Some(habit) = store.get_habit(selector)? {
        return Ok(habit);
    }
    let habits = store.list_habits()?;
    let matches: Vec<&Habit> = habits
        .iter()
        .filter(|h| h.id.starts_with(selector) || h.title.eq_ignore_ascii_case(selector))
        .collect();
    match matches.len() {
        0 => bail!("no habit matches '{selector}'"),
        1 => Ok(matches[0].clone()),
        n => bail!("'{selector}' matches {n} habits; use the id"),
    }
}

fn parse_month(s: &str) -> Result<(i32, u32)> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 2 {
        bail!("expected month as YYYY-MM, got '{s}'");
    }
    let year: i32 = parts[0].parse().with_context(|| format!("bad year in '{s}'"))?;
    let month: u32 = parts[1].parse().with_context(|| format!("bad month in '{s}'"))?;
    if !(1..=12).contains(&month) {
        bail!("month must be 01-12, got {month}");
    }
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn store_with(titles: &[&str]) -> MemoryStore {
        let store = MemoryStore::default();
        let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        for title in titles {
            store.create_habit(HabitDraft::titled(*title), today).unwrap();
        }
        store
    }

    #[test]
    fn resolves_habit_by_title_case_insensitive() {
        let store = store_with(&["Drink Water", "Exercise"]);
        let habit = resolve_habit(&store, "drink water").unwrap();
        assert_eq!(habit.title, "Drink Water");
    }

    #[test]
    fn resolves_habit_by_id_prefix() {
        let store = store_with(&["Read"]);
        let id = store.list_habits().unwrap()[0].id.clone();
        let habit = resolve_habit(&store, &id[..8]).unwrap();
        assert_eq!(habit.id, id);
    }

    #[test]
    fn unknown_selector_is_an_error() {
        let store = store_with(&["Read"]);
        assert!(resolve_habit(&store, "nope").is_err());
    }

    #[test]
    fn parses_month_strings() {
        assert_eq!(parse_month("2025-03").unwrap(), (2025, 3));
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("2025").is_err());
    }
}
