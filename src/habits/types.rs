//! Habit and completion type definitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A habit tracked by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier
    pub id: Uuid,
    /// User who owns this habit
    pub user_id: Uuid,
    /// Display title
    pub title: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// Display color
    pub color: HabitColor,
    /// Optional icon name
    pub icon: Option<String>,
    /// Manual ordering position (habits without one sort last)
    pub position: Option<i32>,
    /// When the habit was created
    pub created_at: DateTime<Utc>,
    /// When the habit was last updated
    pub updated_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit from user input.
    pub fn new(user_id: Uuid, input: HabitInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: input.title.trim().to_string(),
            description: input.description,
            color: input.color.unwrap_or_default(),
            icon: input.icon,
            position: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User input for creating or editing a habit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitInput {
    /// Display title (required, must not be blank)
    pub title: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// Display color (defaults to blue)
    pub color: Option<HabitColor>,
    /// Optional icon name
    pub icon: Option<String>,
}

/// Display color for a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitColor {
    Yellow,
    Pink,
    #[default]
    Blue,
    Green,
    Orange,
    Purple,
}

impl HabitColor {
    /// All selectable colors, in display order.
    pub const ALL: [HabitColor; 6] = [
        HabitColor::Yellow,
        HabitColor::Pink,
        HabitColor::Blue,
        HabitColor::Green,
        HabitColor::Orange,
        HabitColor::Purple,
    ];

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitColor::Yellow => "yellow",
            HabitColor::Pink => "pink",
            HabitColor::Blue => "blue",
            HabitColor::Green => "green",
            HabitColor::Orange => "orange",
            HabitColor::Purple => "purple",
        }
    }

    /// Parse a stored color, falling back to the default for unknown values.
    pub fn from_str_or_default(value: &str) -> Self {
        match value {
            "yellow" => HabitColor::Yellow,
            "pink" => HabitColor::Pink,
            "blue" => HabitColor::Blue,
            "green" => HabitColor::Green,
            "orange" => HabitColor::Orange,
            "purple" => HabitColor::Purple,
            _ => HabitColor::default(),
        }
    }
}

impl std::fmt::Display for HabitColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single completion of a habit on a calendar day.
///
/// The date is date-only on purpose: streak math operates on calendar-day
/// identity, never on timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Unique identifier
    pub id: Uuid,
    /// Habit this completion belongs to
    pub habit_id: Uuid,
    /// User who owns this completion
    pub user_id: Uuid,
    /// Calendar day the habit was completed
    pub date: NaiveDate,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// Derived statistics for one habit, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HabitStats {
    /// Consecutive completed days ending at today or yesterday
    pub current_streak: u32,
    /// Longest run of consecutive completed days ever
    pub best_streak: u32,
    /// Percent of the reference week completed (0-100)
    pub weekly_completion: u8,
    /// Completions in the loaded window
    pub total_completions: u32,
}
