//! Habits module.
//!
//! Habit records and the manager that persists them:
//! - Habit types with display colors and manual ordering
//! - Title validation and position assignment
//! - Cascade-deleting completions with their habit

pub mod manager;
pub mod types;

// Re-exports for convenience
pub use manager::{HabitError, HabitManager};
pub use types::{Completion, Habit, HabitColor, HabitInput, HabitStats};
