use chrono::NaiveDateTime;
use habit_tracker::habit::parse_timestamp;
use habit_tracker::tracker::{
    add_habit, change_periodicity, delete_category, longest_streak, mark_completed, remove_habit,
};
use habit_tracker::{Config, HabitError, HabitStore, Periodicity, StreakOutcome};
use tempfile::TempDir;

fn ts(raw: &str) -> NaiveDateTime {
    parse_timestamp(raw).unwrap()
}

fn streak_of(store: &HabitStore, name: &str) -> u32 {
    store.get_current_streak(name).unwrap().unwrap()
}

fn seeded_store() -> HabitStore {
    let store = HabitStore::open_in_memory().unwrap();
    let created = ts("2022-01-01 00:00");
    add_habit(&store, "book", Periodicity::Daily, "knowledge", created).unwrap();
    add_habit(&store, "fishing", Periodicity::Weekly, "food", created).unwrap();
    add_habit(&store, "guitar", Periodicity::Monthly, "music", created).unwrap();
    store
}

#[test]
fn daily_book_scenario() {
    let store = seeded_store();

    let first = mark_completed(&store, "book", ts("2022-01-01 09:00")).unwrap();
    assert!(matches!(first.outcome, StreakOutcome::Continued { streak: 1, .. }));
    assert_eq!(streak_of(&store, "book"), 1);

    let again = mark_completed(&store, "book", ts("2022-01-01 18:00")).unwrap();
    assert_eq!(again.outcome, StreakOutcome::AlreadyCompletedThisPeriod);
    assert_eq!(streak_of(&store, "book"), 1);

    let next_day = mark_completed(&store, "book", ts("2022-01-02 09:00")).unwrap();
    assert!(matches!(next_day.outcome, StreakOutcome::Continued { streak: 2, .. }));
    assert_eq!(streak_of(&store, "book"), 2);

    let late = mark_completed(&store, "book", ts("2022-01-10 09:00")).unwrap();
    assert!(matches!(late.outcome, StreakOutcome::Restarted { streak: 1, .. }));
    assert_eq!(streak_of(&store, "book"), 1);

    // The broken streak of 2 is still the longest
    assert_eq!(longest_streak(&store, "book").unwrap(), 2);
}

#[test]
fn weekly_fishing_scenario() {
    let store = seeded_store();
    assert_eq!(streak_of(&store, "fishing"), 0);

    mark_completed(&store, "fishing", ts("2022-01-01 09:00")).unwrap();
    assert_eq!(streak_of(&store, "fishing"), 1);

    let next_day = mark_completed(&store, "fishing", ts("2022-01-02 09:00")).unwrap();
    assert_eq!(next_day.outcome, StreakOutcome::AlreadyCompletedThisPeriod);
    assert_eq!(streak_of(&store, "fishing"), 1);

    let next_week = mark_completed(&store, "fishing", ts("2022-01-08 09:00")).unwrap();
    assert!(matches!(next_week.outcome, StreakOutcome::Continued { streak: 2, .. }));
    assert_eq!(streak_of(&store, "fishing"), 2);

    let missed = mark_completed(&store, "fishing", ts("2022-01-28 09:00")).unwrap();
    assert!(matches!(missed.outcome, StreakOutcome::Restarted { streak: 1, .. }));
}

#[test]
fn monthly_guitar_scenario() {
    let store = seeded_store();

    mark_completed(&store, "guitar", ts("2022-01-01 09:00")).unwrap();
    assert_eq!(streak_of(&store, "guitar"), 1);

    let ten_days = mark_completed(&store, "guitar", ts("2022-01-10 09:00")).unwrap();
    assert_eq!(ten_days.outcome, StreakOutcome::AlreadyCompletedThisPeriod);
    assert_eq!(streak_of(&store, "guitar"), 1);

    let next_month = mark_completed(&store, "guitar", ts("2022-02-10 09:00")).unwrap();
    assert!(matches!(next_month.outcome, StreakOutcome::Continued { streak: 2, .. }));
    assert_eq!(streak_of(&store, "guitar"), 2);
}

#[test]
fn longest_streak_never_shrinks_while_logging() {
    let store = seeded_store();
    let days = [
        "2022-01-01 09:00",
        "2022-01-02 09:00",
        "2022-01-03 09:00",
        "2022-01-03 21:00",
        "2022-01-07 09:00",
        "2022-01-08 09:00",
    ];

    let mut previous = longest_streak(&store, "book").unwrap();
    for day in days {
        mark_completed(&store, "book", ts(day)).unwrap();
        let longest = longest_streak(&store, "book").unwrap();
        assert!(longest >= previous);
        let max_logged = store
            .log_entries("book")
            .unwrap()
            .iter()
            .map(|e| e.streak)
            .max()
            .unwrap();
        assert_eq!(longest, max_logged);
        previous = longest;
    }
    assert_eq!(previous, 3);
    assert_eq!(streak_of(&store, "book"), 2);
}

#[test]
fn changing_periodicity_resets_habit() {
    let store = seeded_store();
    mark_completed(&store, "book", ts("2022-01-01 09:00")).unwrap();
    mark_completed(&store, "book", ts("2022-01-02 09:00")).unwrap();

    change_periodicity(&store, "book", Periodicity::Weekly, ts("2022-01-02 10:00")).unwrap();

    let habit = store.get_habit("book").unwrap().unwrap();
    assert_eq!(habit.periodicity, Periodicity::Weekly);
    assert_eq!(habit.streak, 0);
    assert!(habit.last_completed_at.is_none());

    let log = store.log_entries("book").unwrap();
    assert_eq!(log.len(), 1);
    assert!(!log[0].completed);
    assert_eq!(log[0].streak, 0);
}

#[test]
fn removal_and_category_deletion() {
    let store = seeded_store();
    add_habit(&store, "netflix", Periodicity::Daily, "entertainment", ts("2022-01-01 00:00"))
        .unwrap();
    assert_eq!(store.list_categories().unwrap().len(), 4);

    delete_category(&store, "entertainment").unwrap();
    assert_eq!(store.list_categories().unwrap().len(), 3);
    assert!(!store.habit_exists("netflix").unwrap());

    remove_habit(&store, "book").unwrap();
    assert!(!store.habit_exists("book").unwrap());
    assert!(store.log_entries("book").unwrap().is_empty());

    let err = remove_habit(&store, "book").unwrap_err();
    assert_eq!(
        err.downcast::<HabitError>().unwrap(),
        HabitError::habit_not_found("book")
    );
}

#[test]
fn store_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("habits.db");

    {
        let store = HabitStore::open(&db_path).unwrap();
        add_habit(&store, "coding", Periodicity::Daily, "career", ts("2022-01-01 13:00")).unwrap();
        mark_completed(&store, "coding", ts("2022-01-01 14:00")).unwrap();
    }

    let store = HabitStore::open(&db_path).unwrap();
    let habit = store.get_habit("coding").unwrap().unwrap();
    assert_eq!(habit.streak, 1);
    assert_eq!(habit.last_completed_at, Some(ts("2022-01-01 14:00")));
    assert_eq!(store.log_entries("coding").unwrap().len(), 2);
}

#[test]
fn config_file_points_at_database() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("custom.db");
    let config_path = dir.path().join("habit-tracker.yaml");
    std::fs::write(
        &config_path,
        format!("database:\n  path: {}\n", db_path.display()),
    )
    .unwrap();

    let config = Config::load(config_path.to_str().unwrap()).unwrap();
    assert_eq!(config.database_path(), db_path);
    assert_eq!(config.logging.level, "warn");
}
