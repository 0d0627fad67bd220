//! Domain errors surfaced to the user

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HabitError {
    /// Habit or category label is not alphabetic or is too short
    #[error("Invalid {kind} name '{value}': use letters only, at least two of them.")]
    Validation { kind: &'static str, value: String },

    #[error("No {kind} named '{name}' found.")]
    NotFound { kind: &'static str, name: String },

    #[error("Habit '{0}' already exists, please choose another name.")]
    Duplicate(String),
}

impl HabitError {
    pub fn habit_not_found(name: &str) -> Self {
        Self::NotFound {
            kind: "habit",
            name: name.to_string(),
        }
    }

    pub fn category_not_found(name: &str) -> Self {
        Self::NotFound {
            kind: "category",
            name: name.to_string(),
        }
    }
}
