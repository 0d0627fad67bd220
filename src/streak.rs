//! Streak evaluation
//!
//! Decides what a single "mark completed" event does to a habit's streak.
//! The evaluation is a pure function of the habit's periodicity, its last
//! completion, its current streak and the moment of completion.

use chrono::{Datelike, NaiveDateTime};

use crate::habit::Periodicity;

/// Result of evaluating one completion attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakOutcome {
    /// The habit was already completed in the current period; nothing changes
    AlreadyCompletedThisPeriod,
    /// The streak was extended
    Continued {
        streak: u32,
        completed_at: NaiveDateTime,
    },
    /// A period was missed; counting restarts at 1
    Restarted {
        streak: u32,
        completed_at: NaiveDateTime,
    },
}

impl StreakOutcome {
    /// Whether the attempt counted towards the streak
    pub fn counted(&self) -> bool {
        !matches!(self, StreakOutcome::AlreadyCompletedThisPeriod)
    }

    /// Streak value after applying this outcome to `current`
    pub fn new_streak(&self, current: u32) -> u32 {
        match self {
            StreakOutcome::AlreadyCompletedThisPeriod => current,
            StreakOutcome::Continued { streak, .. } | StreakOutcome::Restarted { streak, .. } => {
                *streak
            }
        }
    }

    pub fn completed_at(&self) -> Option<NaiveDateTime> {
        match self {
            StreakOutcome::AlreadyCompletedThisPeriod => None,
            StreakOutcome::Continued { completed_at, .. }
            | StreakOutcome::Restarted { completed_at, .. } => Some(*completed_at),
        }
    }
}

/// Evaluate a completion attempt at `now`.
pub fn evaluate(
    periodicity: Periodicity,
    last_completion: Option<NaiveDateTime>,
    current_streak: u32,
    now: NaiveDateTime,
) -> StreakOutcome {
    // First completion under the current periodicity never restarts
    let last = match last_completion {
        Some(last) if current_streak > 0 => last,
        _ => {
            return StreakOutcome::Continued {
                streak: 1,
                completed_at: now,
            }
        }
    };

    let continued = StreakOutcome::Continued {
        streak: current_streak.saturating_add(1),
        completed_at: now,
    };
    let restarted = StreakOutcome::Restarted {
        streak: 1,
        completed_at: now,
    };

    match periodicity {
        Periodicity::Daily => match days_between(last, now) {
            0 => StreakOutcome::AlreadyCompletedThisPeriod,
            1 => continued,
            _ => restarted,
        },
        Periodicity::Weekly => match weeks_elapsed(days_between(last, now)) {
            1 => StreakOutcome::AlreadyCompletedThisPeriod,
            2 => continued,
            _ => restarted,
        },
        Periodicity::Monthly => match months_between(last, now) {
            0 => StreakOutcome::AlreadyCompletedThisPeriod,
            1 => continued,
            _ => restarted,
        },
    }
}

/// Whole calendar days from `last` to `now`, ignoring the time of day.
/// Negative when `now` is before `last`.
pub fn days_between(last: NaiveDateTime, now: NaiveDateTime) -> i64 {
    (now.date() - last.date()).num_days()
}

/// Bucket a day difference into a weekly period count:
/// 1 = same week, 2 = next week, 3 = at least one week missed.
pub fn weeks_elapsed(days: i64) -> u8 {
    if days > 14 {
        3
    } else if days >= 7 {
        2
    } else {
        1
    }
}

/// Difference of month numbers only; the year is not taken into account,
/// so December to January yields -11.
pub fn months_between(last: NaiveDateTime, now: NaiveDateTime) -> i32 {
    now.month() as i32 - last.month() as i32
}
