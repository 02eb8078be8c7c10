//! Integration tests for completion toggling and point awards.

use chrono::NaiveDate;
use habitgarden::{Database, FixedClock, HabitInput, HabitTracker};
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
fn test_double_toggle_round_trip() {
    let today = day(2024, 3, 15);
    let mut tracker = tracker_at(today);
    let habit = tracker.add_habit(make_input("Stretch")).unwrap();

    tracker.toggle_completion(habit.id, "2024-03-15").unwrap();
    assert!(tracker.is_completed(habit.id, today));

    tracker.toggle_completion(habit.id, "2024-03-15").unwrap();
    assert!(!tracker.is_completed(habit.id, today));

    tracker.toggle_completion(habit.id, "2024-03-15").unwrap();
    assert!(tracker.is_completed(habit.id, today));
}

#[test]
fn test_removal_awards_no_points() {
    let today = day(2024, 3, 15);
    let mut tracker = tracker_at(today);
    let habit = tracker.add_habit(make_input("Stretch")).unwrap();

    // Single habit completed today: 10 base + 5 streak + 20 perfect day
    tracker.toggle_completion(habit.id, "2024-03-15").unwrap();
    assert_eq!(tracker.gamification().unwrap().points, 35);

    // Un-completing is a one-way ratchet: points stay
    tracker.toggle_completion(habit.id, "2024-03-15").unwrap();
    let after_removal = tracker.gamification().unwrap();
    assert_eq!(after_removal.points, 35);
    assert_eq!(after_removal.total_completions, 1);
}

#[test]
fn test_points_accumulate_across_a_streak() {
    let today = day(2024, 3, 15);
    let mut tracker = tracker_at(today);
    let habit = tracker.add_habit(make_input("Stretch")).unwrap();

    // Backfill: a two-day-old date first earns base points only
    tracker.toggle_completion(habit.id, "2024-03-13").unwrap();
    assert_eq!(tracker.gamification().unwrap().points, 10);

    // Yesterday: streak of 2 anchored at yesterday
    tracker.toggle_completion(habit.id, "2024-03-14").unwrap();
    assert_eq!(tracker.gamification().unwrap().points, 30);

    // Today: streak of 3, and the only habit is done today (perfect day)
    tracker.toggle_completion(habit.id, "2024-03-15").unwrap();

    let summary = tracker.gamification().unwrap();
    assert_eq!(summary.points, 30 + 10 + 15 + 20);
    assert_eq!(summary.total_completions, 3);
    assert_eq!(summary.level, 1);
    assert_eq!(tracker.streak(habit.id), 3);
}

#[test]
fn test_perfect_day_requires_every_habit() {
    let today = day(2024, 3, 15);
    let mut tracker = tracker_at(today);
    let first = tracker.add_habit(make_input("Stretch")).unwrap();
    let second = tracker.add_habit(make_input("Read")).unwrap();

    // Only one of two habits done: no perfect-day bonus
    tracker.toggle_completion(first.id, "2024-03-15").unwrap();
    assert_eq!(tracker.gamification().unwrap().points, 15);

    // Completing the second finishes the day: 15 + 20
    tracker.toggle_completion(second.id, "2024-03-15").unwrap();
    assert_eq!(tracker.gamification().unwrap().points, 15 + 35);
}

#[test]
fn test_habit_stats_bundle() {
    let today = day(2024, 3, 15); // a Friday
    let mut tracker = tracker_at(today);
    let habit = tracker.add_habit(make_input("Stretch")).unwrap();

    for date in ["2024-03-11", "2024-03-13", "2024-03-14", "2024-03-15"] {
        tracker.toggle_completion(habit.id, date).unwrap();
    }

    let monday = day(2024, 3, 11);
    let stats = tracker.habit_stats(habit.id, monday);

    assert_eq!(stats.current_streak, 3);
    assert_eq!(stats.best_streak, 3);
    assert_eq!(stats.weekly_completion, 57); // 4 of 7 days
    assert_eq!(stats.total_completions, 4);
}

#[test]
fn test_completions_survive_in_store_across_window_reloads() {
    let today = day(2024, 3, 15);
    let mut tracker = tracker_at(today);
    let habit = tracker.add_habit(make_input("Stretch")).unwrap();

    tracker.toggle_completion(habit.id, "2024-03-15").unwrap();

    // Narrow the window away, then load a range covering the date again
    tracker.fetch_completions("2024-01-01", "2024-01-31").unwrap();
    assert!(!tracker.is_completed(habit.id, today));

    tracker.fetch_completions("2024-03-01", "2024-03-31").unwrap();
    assert!(tracker.is_completed(habit.id, today));
}
