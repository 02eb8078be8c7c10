//! Unit tests for streak calculations.

use chrono::{Duration, NaiveDate};
use habitgarden::stats::streaks::{best_streak, current_streak};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive days ending at `end`, oldest first.
fn run_ending(end: NaiveDate, len: i64) -> Vec<NaiveDate> {
    (0..len).rev().map(|i| end - Duration::days(i)).collect()
}

#[test]
fn test_no_completions_no_streaks() {
    let today = day(2024, 3, 15);
    assert_eq!(current_streak(&[], today), 0);
    assert_eq!(best_streak(&[]), 0);
}

#[test]
fn test_n_consecutive_days_ending_today() {
    let today = day(2024, 3, 15);
    for n in 1..30 {
        let dates = run_ending(today, n);
        assert_eq!(
            current_streak(&dates, today),
            n as u32,
            "run of {} days should be a streak of {}",
            n,
            n
        );
    }
}

#[test]
fn test_streak_ending_yesterday_still_counts() {
    let today = day(2024, 3, 15);
    let dates = run_ending(today - Duration::days(1), 5);
    assert_eq!(current_streak(&dates, today), 5);
}

#[test]
fn test_streak_resets_after_two_missed_days() {
    let today = day(2024, 3, 15);

    // A long historical run that ended two days ago counts for nothing now
    let dates = run_ending(today - Duration::days(2), 25);
    assert_eq!(current_streak(&dates, today), 0);
}

#[test]
fn test_streak_does_not_cross_gaps() {
    let today = day(2024, 3, 15);
    let mut dates = run_ending(today, 3);
    dates.extend(run_ending(today - Duration::days(5), 4));

    assert_eq!(current_streak(&dates, today), 3);
    assert_eq!(best_streak(&dates), 4);
}

#[test]
fn test_best_streak_is_monotonic_as_history_grows() {
    let today = day(2024, 3, 15);
    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut previous_best = 0;

    // Add days in a scattered pattern; the best streak may grow as gaps close
    // but must never shrink
    for offset in [0, 2, 1, 7, 6, 5, 4, 3, 20, 19] {
        dates.push(today - Duration::days(offset));
        let best = best_streak(&dates);
        assert!(
            best >= previous_best,
            "best streak shrank from {} to {}",
            previous_best,
            best
        );
        previous_best = best;
    }

    // Offsets 0..=7 are all present by the end
    assert_eq!(previous_best, 8);
}

#[test]
fn test_single_completion_is_streak_of_one() {
    let only = day(2024, 3, 10);
    assert_eq!(best_streak(&[only]), 1);
    assert_eq!(current_streak(&[only], only), 1);
}

#[test]
fn test_future_dates_do_not_inflate_the_streak() {
    let today = day(2024, 3, 15);
    let mut dates = run_ending(today, 2);
    dates.push(today + Duration::days(3));

    assert_eq!(current_streak(&dates, today), 2);
}
