//! Command implementations

pub mod analytics;
pub mod category;
pub mod habit;
pub mod list;

use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Placeholder shown for a habit that was never completed
pub const NEVER_COMPLETED: &str = "--/--/-- --:--";

/// Ask a y/N question on stdin. `assume_yes` skips the prompt.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
