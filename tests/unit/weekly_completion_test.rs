//! Unit tests for weekly completion percentages.

use chrono::{Duration, NaiveDate};
use habitgarden::stats::streaks::{week_start, weekly_completion};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_three_of_seven_rounds_to_43() {
    let monday = day(2024, 3, 11);
    let dates = vec![
        monday,
        monday + Duration::days(3),
        monday + Duration::days(5),
    ];
    assert_eq!(weekly_completion(&dates, monday), 43);
}

#[test]
fn test_every_count_of_days() {
    let monday = day(2024, 3, 11);
    let expected = [0u8, 14, 29, 43, 57, 71, 86, 100];

    for count in 0..=7usize {
        let dates: Vec<NaiveDate> = (0..count as i64)
            .map(|i| monday + Duration::days(i))
            .collect();
        assert_eq!(weekly_completion(&dates, monday), expected[count]);
    }
}

#[test]
fn test_window_is_inclusive_on_both_ends() {
    let monday = day(2024, 3, 11);
    let sunday = monday + Duration::days(6);

    assert_eq!(weekly_completion(&[monday], monday), 14);
    assert_eq!(weekly_completion(&[sunday], monday), 14);
    assert_eq!(weekly_completion(&[monday - Duration::days(1)], monday), 0);
    assert_eq!(weekly_completion(&[sunday + Duration::days(1)], monday), 0);
}

#[test]
fn test_week_start_spans_monday_to_sunday() {
    let monday = day(2024, 3, 11);
    for offset in 0..7 {
        assert_eq!(week_start(monday + Duration::days(offset)), monday);
    }
    assert_eq!(week_start(monday + Duration::days(7)), monday + Duration::days(7));
}
