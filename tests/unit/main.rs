//! Unit test modules.

mod points_award_test;
mod streak_test;
mod weekly_completion_test;
