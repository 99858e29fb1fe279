//! Terminal, markdown, and JSON rendering for stats and calendar views.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use habitrail_core::analytics::{
    calendar_days, day_completion, in_active_streak, month_name, StatsReport, WeekdayBucket,
};
use habitrail_core::Habit;

/// Width of the proportional bars in terminal output.
const BAR_WIDTH: usize = 20;

fn bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn print_terminal(report: &StatsReport) {
    let title = format!("Habit Stats — {}", report.today.format("%b %d, %Y"));

    println!();
    println!("╭{}╮", "─".repeat(50));
    println!("│{:^50}│", title);
    println!("╰{}╯", "─".repeat(50));
    println!();

    if report.habit_count == 0 {
        println!("  No habits yet. Add one with `habitrail add`.");
        println!();
        return;
    }

    println!("SUMMARY");
    println!(
        "   Habits: {:<10} Completion ({}d): {:.0}%",
        report.habit_count, report.config.window_days, report.overall_rate
    );
    println!("   Longest streak ever: {} days", report.longest_ever);
    println!();

    if let Some(top) = &report.top_habit {
        println!("TOP HABIT");
        println!("   {} — {:.0}% over the window", top.title, top.value);
        println!();
    }

    if let Some(leader) = &report.streak_leader {
        println!("STREAKS");
        println!(
            "   {} — {} day{} and counting",
            leader.title,
            leader.value as u32,
            if leader.value as u32 == 1 { "" } else { "s" }
        );
        println!();
    }

    println!("BY WEEKDAY (last {} days)", report.config.lookback_days);
    for bucket in &report.weekly {
        println!(
            "   {:<9} {} {:>3}/{}",
            WeekdayBucket::day_name(bucket.weekday),
            bar(bucket.rate()),
            bucket.count,
            bucket.total
        );
    }
    println!();

    println!("MONTHLY TREND");
    for month in &report.monthly {
        println!(
            "   {:<9} {} {:>3}%",
            month.label(),
            bar(f64::from(month.rate) / 100.0),
            month.rate
        );
    }
    println!();
}

pub fn print_markdown(report: &StatsReport) -> Result<()> {
    println!("# Habit Stats: {}", report.today.format("%B %d, %Y"));
    println!();

    if report.habit_count == 0 {
        println!("*No habits yet.*");
        return Ok(());
    }

    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Habits | {} |", report.habit_count);
    println!(
        "| Completion rate ({}d) | {:.0}% |",
        report.config.window_days, report.overall_rate
    );
    println!("| Longest streak ever | {} days |", report.longest_ever);
    if let Some(top) = &report.top_habit {
        println!("| Top habit | {} ({:.0}%) |", top.title, top.value);
    }
    if let Some(leader) = &report.streak_leader {
        println!("| Streak leader | {} ({} days) |", leader.title, leader.value as u32);
    }
    println!();

    println!("## By Weekday");
    println!();
    println!("| Day | Completions | Occurrences |");
    println!("|-----|-------------|-------------|");
    for bucket in &report.weekly {
        println!(
            "| {} | {} | {} |",
            WeekdayBucket::day_name(bucket.weekday),
            bucket.count,
            bucket.total
        );
    }
    println!();

    println!("## Monthly Trend");
    println!();
    println!("| Month | Rate |");
    println!("|-------|------|");
    for month in &report.monthly {
        println!("| {} | {}% |", month.label(), month.rate);
    }

    Ok(())
}

pub fn print_json(report: &StatsReport) -> Result<()> {
    let json = serde_json::json!({
        "today": report.today.to_string(),
        "habit_count": report.habit_count,
        "overall_rate": report.overall_rate,
        "longest_streak_ever": report.longest_ever,
        "top_habit": report.top_habit.as_ref().map(|t| serde_json::json!({
            "title": t.title,
            "completion_rate": t.value,
        })),
        "streak_leader": report.streak_leader.as_ref().map(|s| serde_json::json!({
            "title": s.title,
            "current_streak": s.value as u32,
        })),
        "weekly": report.weekly.iter().map(|b| serde_json::json!({
            "weekday": WeekdayBucket::day_name(b.weekday),
            "count": b.count,
            "total": b.total,
        })).collect::<Vec<_>>(),
        "monthly": report.monthly.iter().map(|m| serde_json::json!({
            "month": m.label(),
            "rate": m.rate,
        })).collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Render a month grid. With a single habit, done days get `*` and days
/// inside a still-active streak get `+`; across all habits, cells are shaded
/// by that day's completion percentage.
pub fn print_calendar(
    habits: &[Habit],
    habit: Option<&Habit>,
    year: i32,
    month: u32,
    today: NaiveDate,
) {
    println!();
    match habit {
        Some(h) => println!("  {} {} — {}", month_name(month), year, h.title),
        None => println!("  {} {} — all habits", month_name(month), year),
    }
    println!("  Su  Mo  Tu  We  Th  Fr  Sa");

    let grid = calendar_days(year, month);
    for week in grid.chunks(7) {
        let mut line = String::from(" ");
        for cell in week {
            if !cell.in_month {
                line.push_str("    ");
                continue;
            }
            let mark = match habit {
                Some(h) => {
                    if in_active_streak(&h.done_dates, cell.date, today) {
                        '+'
                    } else if h.is_done_on(cell.date) {
                        '*'
                    } else {
                        ' '
                    }
                }
                None => {
                    let summary = day_completion(habits, cell.date);
                    match summary.percent {
                        0 => ' ',
                        1..=49 => '.',
                        50..=99 => 'o',
                        _ => '*',
                    }
                }
            };
            line.push_str(&format!("{:>3}{}", cell.date.day(), mark));
        }
        // Six fixed rows; drop the all-padding trailing ones
        if line.trim().is_empty() {
            continue;
        }
        println!("{}", line);
    }

    println!();
    match habit {
        Some(_) => println!("  + active streak   * done"),
        None => println!("  . some done   o most done   * all done"),
    }
    println!();
}
