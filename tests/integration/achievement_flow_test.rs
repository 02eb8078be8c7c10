//! Integration tests for achievement unlocks and claiming.

use chrono::NaiveDate;
use habitgarden::{AchievementType, Database, FixedClock, HabitInput, HabitTracker};
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

fn unlocked_types(tracker: &HabitTracker) -> Vec<AchievementType> {
    tracker
        .achievements()
        .unwrap()
        .iter()
        .map(|a| a.achievement_type)
        .collect()
}

#[test]
fn test_first_completion_unlocks_first_steps() {
    let mut tracker = tracker_at(day(2024, 3, 15));
    let habit = tracker.add_habit(make_input("Stretch")).unwrap();

    assert!(tracker.achievements().unwrap().is_empty());

    tracker.toggle_completion(habit.id, "2024-03-15").unwrap();

    let types = unlocked_types(&tracker);
    assert!(types.contains(&AchievementType::FirstCompletion));
}

#[test]
fn test_streak_3_unlocks_exactly_once() {
    let mut tracker = tracker_at(day(2024, 3, 15));
    let first = tracker.add_habit(make_input("Stretch")).unwrap();
    let second = tracker.add_habit(make_input("Read")).unwrap();

    for date in ["2024-03-13", "2024-03-14", "2024-03-15"] {
        tracker.toggle_completion(first.id, date).unwrap();
    }

    let types = unlocked_types(&tracker);
    assert_eq!(
        types
            .iter()
            .filter(|t| **t == AchievementType::Streak3)
            .count(),
        1
    );

    // A second habit reaching a 3-day streak later adds nothing
    for date in ["2024-03-13", "2024-03-14", "2024-03-15"] {
        tracker.toggle_completion(second.id, date).unwrap();
    }

    let types = unlocked_types(&tracker);
    assert_eq!(
        types
            .iter()
            .filter(|t| **t == AchievementType::Streak3)
            .count(),
        1
    );
}

#[test]
fn test_completion_count_threshold() {
    let mut tracker = tracker_at(day(2024, 3, 20));
    let habit = tracker.add_habit(make_input("Stretch")).unwrap();

    // Ten completions over ten days
    for offset in 11..=20 {
        tracker
            .toggle_completion(habit.id, &format!("2024-03-{:02}", offset))
            .unwrap();
    }

    let types = unlocked_types(&tracker);
    assert!(types.contains(&AchievementType::Completions10));
    assert_eq!(tracker.gamification().unwrap().total_completions, 10);
}

#[test]
fn test_unlocking_breaks_no_claims() {
    let mut tracker = tracker_at(day(2024, 3, 15));
    let habit = tracker.add_habit(make_input("Stretch")).unwrap();

    tracker.toggle_completion(habit.id, "2024-03-15").unwrap();

    // Unlocked but not claimed
    let unclaimed = tracker.unclaimed_achievements().unwrap();
    assert_eq!(unclaimed.len(), 1);
    assert!(unclaimed[0].is_unclaimed());
}

#[test]
fn test_claim_removes_from_unclaimed_exactly_once() {
    let mut tracker = tracker_at(day(2024, 3, 15));
    let habit = tracker.add_habit(make_input("Stretch")).unwrap();

    tracker.toggle_completion(habit.id, "2024-03-15").unwrap();
    let unclaimed = tracker.unclaimed_achievements().unwrap();
    let achievement_id = unclaimed[0].id;

    let claimed = tracker.claim_achievement(achievement_id).unwrap();
    assert!(claimed.claimed_at.is_some());
    assert!(tracker.unclaimed_achievements().unwrap().is_empty());

    // Claiming again is a no-op that keeps the original stamp
    let reclaimed = tracker.claim_achievement(achievement_id).unwrap();
    assert_eq!(reclaimed.claimed_at, claimed.claimed_at);
    assert!(tracker.unclaimed_achievements().unwrap().is_empty());
}

#[test]
fn test_claiming_unknown_achievement_fails() {
    let tracker = tracker_at(day(2024, 3, 15));
    assert!(tracker.claim_achievement(Uuid::new_v4()).is_err());
}

#[test]
fn test_perfect_week_for_all_habits() {
    let monday = day(2024, 3, 11);
    let mut tracker = tracker_at(day(2024, 3, 17)); // the Sunday of that week
    let first = tracker.add_habit(make_input("Stretch")).unwrap();
    let second = tracker.add_habit(make_input("Read")).unwrap();

    for offset in 0..7 {
        let date = (monday + chrono::Duration::days(offset))
            .format("%Y-%m-%d")
            .to_string();
        tracker.toggle_completion(first.id, &date).unwrap();
        tracker.toggle_completion(second.id, &date).unwrap();
    }

    let types = unlocked_types(&tracker);
    assert!(types.contains(&AchievementType::PerfectWeek));
}
