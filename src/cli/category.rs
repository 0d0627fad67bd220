use anyhow::Result;

use crate::error::HabitError;
use crate::habit::{capitalize, validate_label};
use crate::store::HabitStore;
use crate::tracker;

use super::confirm;

pub fn list(store: &HabitStore) -> Result<()> {
    let categories = store.list_categories()?;
    if categories.is_empty() {
        println!("No category found. Add a habit with a category first.");
        return Ok(());
    }

    println!("{:<20} {}", "Category", "Habits");
    println!("{}", "-".repeat(40));
    for category in categories {
        let habits = store.habits_in_category(&category)?;
        println!("{:<20} {}", capitalize(&category), habits.len());
    }
    Ok(())
}

pub fn delete(store: &HabitStore, category: &str, yes: bool) -> Result<()> {
    let category = validate_label("category", category)?;
    if store.habits_in_category(&category)?.is_empty() {
        return Err(HabitError::category_not_found(&category).into());
    }

    let prompt = format!(
        "Deleting '{}' also deletes all of its habits. Proceed?",
        category
    );
    if !confirm(&prompt, yes)? {
        println!("\nCategory '{}' was kept.\n", capitalize(&category));
        return Ok(());
    }

    let removed = tracker::delete_category(store, &category)?;
    println!(
        "\nDeleted category '{}' and {} habit(s): {}\n",
        capitalize(&category),
        removed.len(),
        removed
            .iter()
            .map(|name| capitalize(name))
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_category_is_reported_before_confirmation() {
        let store = HabitStore::open_in_memory().unwrap();
        let err = delete(&store, "nothing", false).unwrap_err();
        assert_eq!(
            err.downcast::<HabitError>().unwrap(),
            HabitError::category_not_found("nothing")
        );
    }
}
