//! List command implementation

use anyhow::Result;

use crate::habit::{capitalize, format_timestamp, Habit, Periodicity};
use crate::store::HabitStore;

pub fn run(store: &HabitStore, periodicity: Option<Periodicity>, json: bool) -> Result<()> {
    let habits = store.list_habits(periodicity)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&habits)?);
        return Ok(());
    }

    if habits.is_empty() {
        match periodicity {
            Some(p) => println!("No {} habits found.", p),
            None => println!("No habits found. Run 'habit-tracker add' first."),
        }
        return Ok(());
    }

    print!("{}", render_table(&habits));
    Ok(())
}

fn render_table(habits: &[Habit]) -> String {
    let mut out = format!(
        "{:<15} {:<12} {:<15} {}\n",
        "Name", "Periodicity", "Category", "Created"
    );
    out.push_str(&"-".repeat(60));
    out.push('\n');

    for habit in habits {
        out.push_str(&format!(
            "{:<15} {:<12} {:<15} {}\n",
            capitalize(&habit.name),
            capitalize(habit.periodicity.as_str()),
            capitalize(&habit.category),
            format_timestamp(&habit.created_at),
        ));
    }
    out
}
