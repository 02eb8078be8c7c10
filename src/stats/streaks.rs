//! Streak and completion-rate calculations.
//!
//! Pure functions over completion dates plus a caller-supplied reference day.
//! All comparisons are calendar-day identity; callers strip any time
//! component before reaching this module.

use chrono::{Datelike, Duration, NaiveDate};

/// Days in a tracked week.
pub const DAYS_PER_WEEK: u32 = 7;

/// Current streak: consecutive completed days ending at `today` or yesterday.
///
/// A missed `today` does not break an active streak while yesterday is still
/// completed; a gap of two days does. Duplicate dates are tolerated.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let mut sorted: Vec<NaiveDate> = dates.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a)); // most recent first
    sorted.dedup();

    let yesterday = today - Duration::days(1);

    // If today is completed, start counting from today.
    // If not but yesterday is, start from yesterday (streak continues).
    let mut expected = if sorted.contains(&today) {
        today
    } else if sorted.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    for &date in &sorted {
        if date == expected {
            streak += 1;
            expected -= Duration::days(1);
        } else if date < expected {
            // Passed the expected day: the streak is broken
            break;
        }
        // dates newer than the anchor are skipped
    }

    streak
}

/// Longest run of consecutive completed days anywhere in the history.
///
/// A single completion is a streak of 1; an empty history is 0.
pub fn best_streak(dates: &[NaiveDate]) -> u32 {
    let mut sorted: Vec<NaiveDate> = dates.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    if sorted.is_empty() {
        return 0;
    }

    let mut best = 1u32;
    let mut run = 1u32;

    for pair in sorted.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            run += 1;
            best = best.max(run);
        } else {
            run = 1;
        }
    }

    best
}

/// Percent of the week starting at `week_start` with a completion (0-100).
///
/// Counts completions in `[week_start, week_start + 6]` inclusive and rounds
/// to the nearest integer percent.
pub fn weekly_completion(dates: &[NaiveDate], week_start: NaiveDate) -> u8 {
    let week_end = week_start + Duration::days(6);

    let mut in_week: Vec<NaiveDate> = dates
        .iter()
        .copied()
        .filter(|d| *d >= week_start && *d <= week_end)
        .collect();
    in_week.sort_unstable();
    in_week.dedup();

    ((in_week.len() as f64 / f64::from(DAYS_PER_WEEK)) * 100.0).round() as u8
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// First and last day of the calendar month containing `date`.
pub fn month_span(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let next_first = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    }
    .unwrap_or(first);

    (first, next_first - Duration::days(1))
}
