//! Habit storage with SQLite
//!
//! `HabitStore` owns the connection and is passed explicitly to every
//! action. All statements are parameterized.

mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::debug;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

use crate::habit::{format_timestamp, Habit, LogEntry, Periodicity, TIMESTAMP_FORMAT};

pub use schema::SCHEMA;

const HABIT_COLUMNS: &str =
    "name, periodicity, category, created_at, streak, last_completed_at";

pub struct HabitStore {
    conn: Connection,
}

impl HabitStore {
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        let store = Self { conn };
        store.init_schema()?;
        debug!("event=db_open module=store status=ok path={}", path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ============================================
    // HABITS
    // ============================================

    pub fn habit_exists(&self, name: &str) -> Result<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM habits WHERE name = ?)",
            params![name],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Insert a new habit and its creation entry (not completed, streak 0)
    /// in one transaction.
    pub fn add_habit_with_log(&self, habit: &Habit) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        insert_habit(&tx, habit)?;
        insert_log(&tx, &habit.name, false, 0, habit.created_at)?;
        tx.commit()?;
        Ok(())
    }

    pub fn get_habit(&self, name: &str) -> Result<Option<Habit>> {
        let result = self.conn.query_row(
            &format!("SELECT {} FROM habits WHERE name = ?", HABIT_COLUMNS),
            params![name],
            map_habit,
        );

        match result {
            Ok(habit) => Ok(Some(habit)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All habits in insertion order, optionally restricted to one periodicity
    pub fn list_habits(&self, periodicity: Option<Periodicity>) -> Result<Vec<Habit>> {
        let base_query = format!("SELECT {} FROM habits", HABIT_COLUMNS);

        let rows = match periodicity {
            Some(p) => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("{} WHERE periodicity = ? ORDER BY rowid", base_query))?;
                let rows = stmt
                    .query_map(params![p], map_habit)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = self.conn.prepare(&format!("{} ORDER BY rowid", base_query))?;
                let rows = stmt
                    .query_map([], map_habit)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(rows)
    }

    /// Delete a habit together with its completion log.
    /// Returns false when no such habit exists.
    pub fn remove_habit(&self, name: &str) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        delete_logs(&tx, name)?;
        let deleted = tx.execute("DELETE FROM habits WHERE name = ?", params![name])?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    /// Switch a habit to a new periodicity: the streak goes back to 0,
    /// the last completion is cleared and the log is replaced by a single
    /// marker entry logged at `now`. Returns false when no such habit exists.
    pub fn reset_periodicity(
        &self,
        name: &str,
        periodicity: Periodicity,
        now: NaiveDateTime,
    ) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        let updated = tx.execute(
            "UPDATE habits SET periodicity = ?, streak = 0, last_completed_at = NULL WHERE name = ?",
            params![periodicity, name],
        )?;
        if updated == 0 {
            return Ok(false);
        }
        delete_logs(&tx, name)?;
        insert_log(&tx, name, false, 0, now)?;
        tx.commit()?;
        Ok(true)
    }

    pub fn set_streak_and_completion(
        &self,
        name: &str,
        streak: u32,
        completed_at: NaiveDateTime,
    ) -> Result<()> {
        update_streak(&self.conn, name, streak, completed_at)?;
        Ok(())
    }

    /// Persist one evaluated completion attempt: the new streak (when the
    /// attempt counted) and its log entry, in one transaction.
    pub fn record_completion(
        &self,
        name: &str,
        completed_at: Option<NaiveDateTime>,
        streak: u32,
        logged_at: NaiveDateTime,
    ) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        if let Some(completed_at) = completed_at {
            update_streak(&tx, name, streak, completed_at)?;
        }
        insert_log(&tx, name, completed_at.is_some(), streak, logged_at)?;
        tx.commit()?;
        Ok(())
    }

    pub fn get_current_streak(&self, name: &str) -> Result<Option<u32>> {
        let streak = self
            .conn
            .query_row(
                "SELECT streak FROM habits WHERE name = ?",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(streak)
    }

    /// Outer `None`: habit absent. Inner `None`: never completed.
    pub fn get_last_completion(&self, name: &str) -> Result<Option<Option<NaiveDateTime>>> {
        let completion = self
            .conn
            .query_row(
                "SELECT last_completed_at FROM habits WHERE name = ?",
                params![name],
                |row| optional_timestamp(row, 0),
            )
            .optional()?;
        Ok(completion)
    }

    pub fn get_periodicity(&self, name: &str) -> Result<Option<Periodicity>> {
        let periodicity = self
            .conn
            .query_row(
                "SELECT periodicity FROM habits WHERE name = ?",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(periodicity)
    }

    // ============================================
    // CATEGORIES
    // ============================================

    /// Distinct categories, sorted
    pub fn list_categories(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT category FROM habits ORDER BY category")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn habits_in_category(&self, category: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM habits WHERE category = ? ORDER BY rowid")?;
        let rows = stmt.query_map(params![category], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete every habit of a category, and their logs.
    /// Returns the names of the removed habits.
    pub fn delete_category(&self, category: &str) -> Result<Vec<String>> {
        let names = self.habits_in_category(category)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM completion_log WHERE habit IN (SELECT name FROM habits WHERE category = ?)",
            params![category],
        )?;
        tx.execute("DELETE FROM habits WHERE category = ?", params![category])?;
        tx.commit()?;

        Ok(names)
    }

    // ============================================
    // COMPLETION LOG
    // ============================================

    pub fn append_log_entry(
        &self,
        name: &str,
        completed: bool,
        streak: u32,
        logged_at: NaiveDateTime,
    ) -> Result<()> {
        insert_log(&self.conn, name, completed, streak, logged_at)?;
        Ok(())
    }

    /// Log entries of one habit in insertion order
    pub fn log_entries(&self, name: &str) -> Result<Vec<LogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT habit, completed, streak, logged_at
             FROM completion_log
             WHERE habit = ?
             ORDER BY id",
        )?;

        let rows = stmt.query_map(params![name], |row| {
            Ok(LogEntry {
                habit: row.get(0)?,
                completed: row.get(1)?,
                streak: row.get(2)?,
                logged_at: timestamp(row, 3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Highest streak ever logged for a habit; `None` when the log is empty
    pub fn longest_streak(&self, name: &str) -> Result<Option<u32>> {
        let longest = self.conn.query_row(
            "SELECT MAX(streak) FROM completion_log WHERE habit = ?",
            params![name],
            |row| row.get(0),
        )?;
        Ok(longest)
    }
}

// ============================================
// STATEMENTS
// ============================================

// Shared by the single-statement methods and the transactional ones;
// a `Transaction` derefs to `Connection`.

fn insert_habit(conn: &Connection, habit: &Habit) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO habits (name, periodicity, category, created_at, streak, last_completed_at)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            habit.name,
            habit.periodicity,
            habit.category,
            format_timestamp(&habit.created_at),
            habit.streak,
            habit.last_completed_at.as_ref().map(format_timestamp),
        ],
    )
}

fn update_streak(
    conn: &Connection,
    name: &str,
    streak: u32,
    completed_at: NaiveDateTime,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE habits SET streak = ?, last_completed_at = ? WHERE name = ?",
        params![streak, format_timestamp(&completed_at), name],
    )
}

fn insert_log(
    conn: &Connection,
    name: &str,
    completed: bool,
    streak: u32,
    logged_at: NaiveDateTime,
) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO completion_log (habit, completed, streak, logged_at) VALUES (?, ?, ?, ?)",
        params![name, completed, streak, format_timestamp(&logged_at)],
    )
}

fn delete_logs(conn: &Connection, name: &str) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM completion_log WHERE habit = ?", params![name])
}

// ============================================
// ROW MAPPING
// ============================================

fn map_habit(row: &Row) -> rusqlite::Result<Habit> {
    Ok(Habit {
        name: row.get(0)?,
        periodicity: row.get(1)?,
        category: row.get(2)?,
        created_at: timestamp(row, 3)?,
        streak: row.get(4)?,
        last_completed_at: optional_timestamp(row, 5)?,
    })
}

fn timestamp(row: &Row, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn optional_timestamp(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDateTime>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

impl ToSql for Periodicity {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Periodicity {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}
