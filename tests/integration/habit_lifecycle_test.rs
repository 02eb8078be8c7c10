//! Integration tests for the habit lifecycle.

use chrono::NaiveDate;
use habitgarden::{Database, FixedClock, HabitColor, HabitInput, HabitTracker, TrackerError};
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn tracker_at(date: NaiveDate) -> HabitTracker {
    let db = Database::open_in_memory().expect("Failed to create database");
    HabitTracker::with_clock(db, Uuid::new_v4(), Box::new(FixedClock::on_date(date)))
}

fn make_input(title: &str) -> HabitInput {
    HabitInput {
        title: title.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_add_fetch_and_order() {
    let mut tracker = tracker_at(day(2024, 3, 15));

    tracker.add_habit(make_input("Stretch")).unwrap();
    tracker.add_habit(make_input("Read")).unwrap();
    tracker.add_habit(make_input("Meditate")).unwrap();

    // A fresh load returns the same manual order
    tracker.fetch_habits().unwrap();
    let titles: Vec<&str> = tracker.habits().iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles, vec!["Stretch", "Read", "Meditate"]);
}

#[test]
fn test_blank_title_is_rejected() {
    let mut tracker = tracker_at(day(2024, 3, 15));

    let result = tracker.add_habit(make_input("   "));
    assert!(matches!(result, Err(TrackerError::Habit(_))));
    assert!(tracker.habits().is_empty());
}

#[test]
fn test_edit_habit_fields() {
    let mut tracker = tracker_at(day(2024, 3, 15));
    let mut habit = tracker.add_habit(make_input("Run")).unwrap();

    habit.title = "Morning run".to_string();
    habit.color = HabitColor::Orange;
    habit.description = Some("5k before breakfast".to_string());
    tracker.update_habit(habit.clone()).unwrap();

    tracker.fetch_habits().unwrap();
    let loaded = tracker.habit(habit.id).unwrap();
    assert_eq!(loaded.title, "Morning run");
    assert_eq!(loaded.color, HabitColor::Orange);
    assert_eq!(loaded.description.as_deref(), Some("5k before breakfast"));
}

#[test]
fn test_delete_cascades_completions_in_store() {
    let today = day(2024, 3, 15);
    let mut tracker = tracker_at(today);
    let keep = tracker.add_habit(make_input("Stretch")).unwrap();
    let retired = tracker.add_habit(make_input("Read")).unwrap();

    tracker.toggle_completion(keep.id, "2024-03-15").unwrap();
    tracker.toggle_completion(retired.id, "2024-03-15").unwrap();

    tracker.delete_habit(retired.id).unwrap();

    // The store no longer has the deleted habit's completion either
    tracker.fetch_completions("2024-03-01", "2024-03-31").unwrap();
    assert_eq!(tracker.completions().len(), 1);
    assert_eq!(tracker.completions()[0].habit_id, keep.id);
}

#[test]
fn test_delete_unknown_habit() {
    let mut tracker = tracker_at(day(2024, 3, 15));
    let result = tracker.delete_habit(Uuid::new_v4());
    assert!(matches!(result, Err(TrackerError::HabitNotFound(_))));
}

#[test]
fn test_reorder_persists_across_reload() {
    let mut tracker = tracker_at(day(2024, 3, 15));
    let first = tracker.add_habit(make_input("Stretch")).unwrap();
    let second = tracker.add_habit(make_input("Read")).unwrap();

    tracker
        .update_positions(&[(first.id, 1), (second.id, 0)])
        .unwrap();

    tracker.fetch_habits().unwrap();
    assert_eq!(tracker.habits()[0].id, second.id);
    assert_eq!(tracker.habits()[1].id, first.id);
}

#[test]
fn test_two_users_do_not_see_each_other() {
    let db_path = tempfile::tempdir().unwrap();
    let path = db_path.path().join("habits.db");

    let first_user = Uuid::new_v4();
    let second_user = Uuid::new_v4();

    let mut first = HabitTracker::with_clock(
        Database::open(&path).unwrap(),
        first_user,
        Box::new(FixedClock::on_date(day(2024, 3, 15))),
    );
    first.add_habit(make_input("Stretch")).unwrap();

    let mut second = HabitTracker::with_clock(
        Database::open(&path).unwrap(),
        second_user,
        Box::new(FixedClock::on_date(day(2024, 3, 15))),
    );
    second.fetch_habits().unwrap();
    assert!(second.habits().is_empty());
}
