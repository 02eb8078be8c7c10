//! Derived metrics over the completion ledger.

pub mod streaks;

pub use streaks::{
    best_streak, current_streak, month_span, week_start, weekly_completion, DAYS_PER_WEEK,
};
