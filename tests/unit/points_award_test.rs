//! Unit tests for the point award formula.

use habitgarden::gamification::engine::{
    completion_points, BASE_COMPLETION_POINTS, MAX_STREAK_BONUS, PERFECT_DAY_BONUS,
    STREAK_BONUS_PER_DAY,
};

#[test]
fn test_first_completion_earns_fifteen() {
    // Streak 1 after the completion, no perfect day
    assert_eq!(completion_points(1, false), 15);
}

#[test]
fn test_streak_bonus_scales_linearly() {
    for streak in 0..=10 {
        let expected = BASE_COMPLETION_POINTS + (streak * STREAK_BONUS_PER_DAY).min(MAX_STREAK_BONUS);
        assert_eq!(completion_points(streak, false), expected);
    }
}

#[test]
fn test_streak_bonus_caps_at_fifty() {
    assert_eq!(completion_points(10, false), BASE_COMPLETION_POINTS + MAX_STREAK_BONUS);
    assert_eq!(completion_points(500, false), BASE_COMPLETION_POINTS + MAX_STREAK_BONUS);
}

#[test]
fn test_perfect_day_adds_twenty() {
    for streak in [0, 1, 7, 100] {
        assert_eq!(
            completion_points(streak, true),
            completion_points(streak, false) + PERFECT_DAY_BONUS
        );
    }
}
