//! Habit commands: add, remove, change periodicity, mark completed

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::error::HabitError;
use crate::habit::{capitalize, validate_label, Periodicity};
use crate::store::HabitStore;
use crate::streak::StreakOutcome;
use crate::tracker::{self, Completion};

use super::confirm;

pub fn add(
    store: &HabitStore,
    name: &str,
    periodicity: Periodicity,
    category: &str,
    now: NaiveDateTime,
) -> Result<()> {
    let name = validate_label("habit", name)?;
    let category = validate_label("category", category)?;

    tracker::add_habit(store, &name, periodicity, &category, now)?;
    println!(
        "\nAdded '{}' as a {} habit in '{}'.\n",
        capitalize(&name),
        capitalize(periodicity.as_str()),
        capitalize(&category)
    );
    Ok(())
}

pub fn remove(store: &HabitStore, name: &str, yes: bool) -> Result<()> {
    let name = validate_label("habit", name)?;
    if !store.habit_exists(&name)? {
        return Err(HabitError::habit_not_found(&name).into());
    }

    if !confirm(&format!("Delete habit '{}' and its log?", name), yes)? {
        println!("\nNo problem! '{}' was kept.\n", capitalize(&name));
        return Ok(());
    }

    tracker::remove_habit(store, &name)?;
    println!("\nDeleted '{}'.\n", capitalize(&name));
    Ok(())
}

pub fn change_periodicity(
    store: &HabitStore,
    name: &str,
    periodicity: Periodicity,
    yes: bool,
    now: NaiveDateTime,
) -> Result<()> {
    let name = validate_label("habit", name)?;
    if !store.habit_exists(&name)? {
        return Err(HabitError::habit_not_found(&name).into());
    }

    let prompt = "Changing the periodicity resets the streak and erases the log. Continue?";
    if !confirm(prompt, yes)? {
        println!(
            "\nPeriodicity of '{}' remains unchanged.\n",
            capitalize(&name)
        );
        return Ok(());
    }

    tracker::change_periodicity(store, &name, periodicity, now)?;
    println!(
        "\nChanged periodicity of '{}' to {}.\n",
        capitalize(&name),
        capitalize(periodicity.as_str())
    );
    Ok(())
}

pub fn complete(store: &HabitStore, name: &str, now: NaiveDateTime) -> Result<()> {
    let name = validate_label("habit", name)?;
    let completion = tracker::mark_completed(store, &name, now)?;
    println!("\n{}\n", completion_message(&name, &completion));
    Ok(())
}

fn completion_message(name: &str, completion: &Completion) -> String {
    let periodicity = completion.periodicity;
    match completion.outcome {
        StreakOutcome::AlreadyCompletedThisPeriod => {
            let period = match periodicity {
                Periodicity::Daily => "today, please try again tomorrow",
                Periodicity::Weekly => "this week, please try again next week",
                Periodicity::Monthly => "this month, please try again next month",
            };
            format!("You have already completed '{}' {}.", capitalize(name), period)
        }
        StreakOutcome::Continued { streak, .. } => format!(
            "Great! Your streak for '{}' is now {} {}.",
            capitalize(name),
            streak,
            periodicity.unit()
        ),
        StreakOutcome::Restarted { streak, .. } => format!(
            "Oops! You missed a period and your streak of {} was reset.\n\
             Your streak for '{}' is now {} {} because you completed it.",
            completion.previous_streak,
            capitalize(name),
            streak,
            periodicity.unit()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::parse_timestamp;

    fn completion(
        periodicity: Periodicity,
        outcome: StreakOutcome,
        previous_streak: u32,
    ) -> Completion {
        Completion {
            periodicity,
            outcome,
            previous_streak,
            streak: outcome.new_streak(previous_streak),
        }
    }

    #[test]
    fn test_completion_messages() {
        let now = parse_timestamp("2022-01-02 10:00").unwrap();

        let already = completion(Periodicity::Weekly, StreakOutcome::AlreadyCompletedThisPeriod, 1);
        assert!(completion_message("fishing", &already).contains("this week"));

        let cont = completion(
            Periodicity::Daily,
            StreakOutcome::Continued {
                streak: 2,
                completed_at: now,
            },
            1,
        );
        assert_eq!(
            completion_message("book", &cont),
            "Great! Your streak for 'Book' is now 2 Day(s)."
        );

        let restart = completion(
            Periodicity::Monthly,
            StreakOutcome::Restarted {
                streak: 1,
                completed_at: now,
            },
            5,
        );
        let message = completion_message("guitar", &restart);
        assert!(message.contains("streak of 5 was reset"));
        assert!(message.contains("now 1 Month(s)"));
    }

    #[test]
    fn test_missing_habit_is_reported_before_confirmation() {
        let store = HabitStore::open_in_memory().unwrap();
        let now = parse_timestamp("2022-01-01 10:00").unwrap();

        // With `yes` false a prompt would block on stdin; the lookup fails first
        let err = remove(&store, "ghost", false).unwrap_err();
        assert_eq!(
            err.downcast::<HabitError>().unwrap(),
            HabitError::habit_not_found("ghost")
        );

        let err = change_periodicity(&store, "ghost", Periodicity::Weekly, false, now).unwrap_err();
        assert_eq!(
            err.downcast::<HabitError>().unwrap(),
            HabitError::habit_not_found("ghost")
        );
    }

    #[test]
    fn test_add_rejects_invalid_names() {
        let store = HabitStore::open_in_memory().unwrap();
        let now = parse_timestamp("2022-01-01 10:00").unwrap();
        assert!(add(&store, "x", Periodicity::Daily, "career", now).is_err());
        assert!(add(&store, "coding", Periodicity::Daily, "car33r", now).is_err());
        assert!(store.list_habits(None).unwrap().is_empty());

        add(&store, "Coding", Periodicity::Daily, "Career", now).unwrap();
        let habit = store.get_habit("coding").unwrap().unwrap();
        assert_eq!(habit.category, "career");
    }
}
