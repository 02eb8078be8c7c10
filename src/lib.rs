//! HabitGarden - Habit Tracking Engine
//!
//! A personal habit tracking engine built in Rust. Provides habit and
//! completion persistence in SQLite, streak and weekly-completion metrics,
//! and a gamification layer with points, quadratic levels, and one-time
//! achievement unlocks with explicit claiming.

pub mod clock;
pub mod completions;
pub mod gamification;
pub mod habits;
pub mod stats;
pub mod storage;
pub mod tracker;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use gamification::engine::RulesEngine;
pub use gamification::types::{Achievement, AchievementType, GamificationSummary};
pub use habits::manager::HabitManager;
pub use habits::types::{Habit, HabitColor, HabitInput, HabitStats};
pub use storage::database::Database;
pub use tracker::{HabitTracker, TrackerError};
