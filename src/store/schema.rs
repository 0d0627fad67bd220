//! SQLite schema definition
//!
//! Two tables: habit definitions and the append-only completion log.
//! Timestamps are TEXT in `YYYY-MM-DD HH:MM` form.

pub const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

-- ============================================
-- HABITS
-- ============================================

CREATE TABLE IF NOT EXISTS habits (
    name TEXT PRIMARY KEY,                 -- lowercase, alphabetic
    periodicity TEXT NOT NULL
        CHECK (periodicity IN ('daily', 'weekly', 'monthly')),
    category TEXT NOT NULL,
    created_at TEXT NOT NULL,
    streak INTEGER NOT NULL DEFAULT 0,
    last_completed_at TEXT                 -- NULL = never completed
);

CREATE INDEX IF NOT EXISTS idx_habits_category ON habits(category);

-- ============================================
-- COMPLETION LOG
-- ============================================

-- One row per evaluated completion, plus a marker row when a habit is
-- added or its periodicity changes (completed = 0, streak = 0)
CREATE TABLE IF NOT EXISTS completion_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    habit TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    streak INTEGER NOT NULL DEFAULT 0,
    logged_at TEXT NOT NULL,
    FOREIGN KEY(habit) REFERENCES habits(name) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_completion_log_habit ON completion_log(habit);
"#;
