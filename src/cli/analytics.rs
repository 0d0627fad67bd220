//! Streak reports: current streaks, longest streak and the completion log

use anyhow::Result;

use crate::error::HabitError;
use crate::habit::{capitalize, format_timestamp, validate_label, Habit, LogEntry};
use crate::store::HabitStore;
use crate::tracker;

use super::NEVER_COMPLETED;

/// Current streak of every habit
pub fn streaks(store: &HabitStore) -> Result<()> {
    let habits = store.list_habits(None)?;
    if habits.is_empty() {
        println!("No habit found. Please add a habit first!");
        return Ok(());
    }

    let rows: Vec<(u32, Habit)> = habits.into_iter().map(|h| (h.streak, h)).collect();
    print!("{}", render_streak_table(&rows, "Current Streak"));
    Ok(())
}

/// Longest streak ever recorded for one habit
pub fn longest(store: &HabitStore, name: &str) -> Result<()> {
    let name = validate_label("habit", name)?;
    let habit = store
        .get_habit(&name)?
        .ok_or_else(|| HabitError::habit_not_found(&name))?;
    let longest = tracker::longest_streak(store, &name)?;

    print!("{}", render_streak_table(&[(longest, habit)], "Longest Streak"));
    Ok(())
}

/// Completion log of one habit
pub fn log(store: &HabitStore, name: &str, json: bool) -> Result<()> {
    let name = validate_label("habit", name)?;
    if !store.habit_exists(&name)? {
        return Err(HabitError::habit_not_found(&name).into());
    }
    let entries = store.log_entries(&name)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    print!("{}", render_log(&entries));
    Ok(())
}

fn render_streak_table(rows: &[(u32, Habit)], streak_header: &str) -> String {
    let mut out = format!(
        "{:<15} {:<12} {:<18} {}\n",
        "Name", "Periodicity", "Completion Time", streak_header
    );
    out.push_str(&"_".repeat(70));
    out.push('\n');

    for (streak, habit) in rows {
        let completed = habit
            .last_completed_at
            .as_ref()
            .filter(|_| habit.is_started())
            .map(format_timestamp)
            .unwrap_or_else(|| NEVER_COMPLETED.to_string());
        out.push_str(&format!(
            "{:<15} {:<12} {:<18} {} {}\n",
            capitalize(&habit.name),
            capitalize(habit.periodicity.as_str()),
            completed,
            streak,
            habit.periodicity.unit(),
        ));
    }
    out
}

fn render_log(entries: &[LogEntry]) -> String {
    let rule = "-".repeat(75);
    let mut out = format!("{}\n", rule);

    if entries.is_empty() {
        out.push_str("No record found!\n");
    }
    for entry in entries {
        out.push_str(&format!(
            "Habit: {} | Completed: {} | Streak: {} | Logged at: {}\n",
            capitalize(&entry.habit),
            if entry.completed { "True" } else { "False" },
            entry.streak,
            format_timestamp(&entry.logged_at),
        ));
    }

    out.push_str(&rule);
    out.push('\n');
    out
}
