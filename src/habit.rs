//! Habit domain values: periodicity, habit snapshots and log entries

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HabitError;

/// Storage and display format for all timestamps (minute precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Cadence at which a habit is expected to be completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
    Daily,
    Weekly,
    Monthly,
}

impl Periodicity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Periodicity::Daily => "daily",
            Periodicity::Weekly => "weekly",
            Periodicity::Monthly => "monthly",
        }
    }

    /// Suffix used when printing a streak count
    pub fn unit(&self) -> &'static str {
        match self {
            Periodicity::Daily => "Day(s)",
            Periodicity::Weekly => "Week(s)",
            Periodicity::Monthly => "Month(s)",
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Periodicity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Periodicity::Daily),
            "weekly" => Ok(Periodicity::Weekly),
            "monthly" => Ok(Periodicity::Monthly),
            other => Err(format!("unknown periodicity: {}", other)),
        }
    }
}

/// Snapshot of a stored habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Habit {
    pub name: String,
    pub periodicity: Periodicity,
    pub category: String,
    pub created_at: NaiveDateTime,
    pub streak: u32,
    pub last_completed_at: Option<NaiveDateTime>,
}

impl Habit {
    /// A freshly added habit: no streak, never completed
    pub fn new(name: &str, periodicity: Periodicity, category: &str, created_at: NaiveDateTime) -> Self {
        Self {
            name: name.to_string(),
            periodicity,
            category: category.to_string(),
            created_at,
            streak: 0,
            last_completed_at: None,
        }
    }

    /// A zero streak means the habit counts as never completed,
    /// whatever the stored completion time says.
    pub fn is_started(&self) -> bool {
        self.streak > 0 && self.last_completed_at.is_some()
    }
}

/// One row of a habit's completion log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub habit: String,
    pub completed: bool,
    pub streak: u32,
    pub logged_at: NaiveDateTime,
}

/// Validate a habit or category label and return its canonical (lowercase) form
pub fn validate_label(kind: &'static str, raw: &str) -> Result<String, HabitError> {
    let trimmed = raw.trim();
    let valid = trimmed.chars().count() > 1 && trimmed.chars().all(char::is_alphabetic);
    if !valid {
        return Err(HabitError::Validation {
            kind,
            value: raw.to_string(),
        });
    }
    Ok(trimmed.to_lowercase())
}

/// Capitalize the first letter, for display
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Current local time truncated to the minute
pub fn current_minute() -> NaiveDateTime {
    truncate_to_minute(Local::now().naive_local())
}

pub fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
        .with_context(|| format!("Invalid timestamp '{}', expected YYYY-MM-DD HH:MM", raw))
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}
