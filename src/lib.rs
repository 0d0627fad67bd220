pub mod cli;
pub mod config;
pub mod error;
pub mod habit;
pub mod logging;
pub mod store;
pub mod streak;
pub mod tracker;

pub use config::Config;
pub use error::HabitError;
pub use habit::{Habit, LogEntry, Periodicity};
pub use store::HabitStore;
pub use streak::{evaluate, StreakOutcome};
pub use tracker::Completion;
