//! User-facing habit actions
//!
//! Every action takes the store handle and one `now` captured by the caller,
//! so the habit update and its log entry always carry the same timestamp.

use anyhow::Result;
use chrono::NaiveDateTime;
use log::info;

use crate::error::HabitError;
use crate::habit::{Habit, Periodicity};
use crate::store::HabitStore;
use crate::streak::{self, StreakOutcome};

/// What a completion attempt did to a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub periodicity: Periodicity,
    pub outcome: StreakOutcome,
    pub previous_streak: u32,
    pub streak: u32,
}

pub fn add_habit(
    store: &HabitStore,
    name: &str,
    periodicity: Periodicity,
    category: &str,
    now: NaiveDateTime,
) -> Result<Habit> {
    if store.habit_exists(name)? {
        return Err(HabitError::Duplicate(name.to_string()).into());
    }

    let habit = Habit::new(name, periodicity, category, now);
    store.add_habit_with_log(&habit)?;

    info!(
        "event=habit_add module=tracker status=ok habit={} periodicity={} category={}",
        name, periodicity, category
    );
    Ok(habit)
}

pub fn remove_habit(store: &HabitStore, name: &str) -> Result<()> {
    if !store.remove_habit(name)? {
        return Err(HabitError::habit_not_found(name).into());
    }
    info!("event=habit_remove module=tracker status=ok habit={}", name);
    Ok(())
}

/// Remove every habit filed under `category`. Returns the removed names.
pub fn delete_category(store: &HabitStore, category: &str) -> Result<Vec<String>> {
    let removed = store.delete_category(category)?;
    if removed.is_empty() {
        return Err(HabitError::category_not_found(category).into());
    }
    info!(
        "event=category_delete module=tracker status=ok category={} habits_removed={}",
        category,
        removed.len()
    );
    Ok(removed)
}

pub fn change_periodicity(
    store: &HabitStore,
    name: &str,
    periodicity: Periodicity,
    now: NaiveDateTime,
) -> Result<()> {
    if !store.reset_periodicity(name, periodicity, now)? {
        return Err(HabitError::habit_not_found(name).into());
    }

    info!(
        "event=habit_periodicity module=tracker status=ok habit={} periodicity={}",
        name, periodicity
    );
    Ok(())
}

pub fn mark_completed(store: &HabitStore, name: &str, now: NaiveDateTime) -> Result<Completion> {
    let periodicity = store
        .get_periodicity(name)?
        .ok_or_else(|| HabitError::habit_not_found(name))?;
    let previous_streak = store.get_current_streak(name)?.unwrap_or(0);
    let last_completion = store.get_last_completion(name)?.flatten();

    let outcome = streak::evaluate(periodicity, last_completion, previous_streak, now);
    let new_streak = outcome.new_streak(previous_streak);

    store.record_completion(name, outcome.completed_at(), new_streak, now)?;

    info!(
        "event=habit_complete module=tracker status=ok habit={} outcome={} streak={}",
        name,
        outcome_label(&outcome),
        new_streak
    );

    Ok(Completion {
        periodicity,
        outcome,
        previous_streak,
        streak: new_streak,
    })
}

/// Longest streak ever logged for a habit (0 when nothing was logged)
pub fn longest_streak(store: &HabitStore, name: &str) -> Result<u32> {
    if !store.habit_exists(name)? {
        return Err(HabitError::habit_not_found(name).into());
    }
    Ok(store.longest_streak(name)?.unwrap_or(0))
}

fn outcome_label(outcome: &StreakOutcome) -> &'static str {
    match outcome {
        StreakOutcome::AlreadyCompletedThisPeriod => "already_completed",
        StreakOutcome::Continued { .. } => "continued",
        StreakOutcome::Restarted { .. } => "restarted",
    }
}
