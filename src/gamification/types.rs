//! Gamification type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::levels;

/// Per-user gamification counters.
///
/// Points and total completions only ever grow; removing a completion never
/// takes anything back. Level is derived from points on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamificationProfile {
    /// User this profile belongs to
    pub user_id: Uuid,
    /// Cumulative points
    pub points: u32,
    /// Lifetime completion count
    pub total_completions: u32,
    /// When the profile row was created
    pub created_at: DateTime<Utc>,
    /// When the profile row was last updated
    pub updated_at: DateTime<Utc>,
}

impl GamificationProfile {
    /// Current level, derived from points.
    pub fn level(&self) -> u32 {
        levels::level_for_points(self.points)
    }
}

/// Snapshot of gamification state for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamificationSummary {
    /// Cumulative points
    pub points: u32,
    /// Current level
    pub level: u32,
    /// Lifetime completion count
    pub total_completions: u32,
    /// Points at which the next level starts
    pub points_for_next_level: u32,
    /// Percent of the current level band earned (0-100)
    pub progress_to_next_level: u8,
}

impl GamificationSummary {
    /// Build a summary from a profile.
    pub fn for_profile(profile: &GamificationProfile) -> Self {
        let level = profile.level();
        Self {
            points: profile.points,
            level,
            total_completions: profile.total_completions,
            points_for_next_level: levels::points_for_next_level(level),
            progress_to_next_level: levels::progress_to_next_level(profile.points),
        }
    }
}

/// An unlocked achievement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    /// Unique identifier
    pub id: Uuid,
    /// User this achievement belongs to
    pub user_id: Uuid,
    /// Which milestone was reached
    pub achievement_type: AchievementType,
    /// When the milestone was first crossed
    pub unlocked_at: DateTime<Utc>,
    /// When the user acknowledged it (None = unclaimed)
    pub claimed_at: Option<DateTime<Utc>>,
}

impl Achievement {
    /// Whether the achievement is still waiting to be claimed.
    pub fn is_unclaimed(&self) -> bool {
        self.claimed_at.is_none()
    }
}

/// One-time unlockable milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementType {
    FirstCompletion,
    #[serde(rename = "streak_3")]
    Streak3,
    #[serde(rename = "streak_7")]
    Streak7,
    #[serde(rename = "streak_14")]
    Streak14,
    #[serde(rename = "streak_30")]
    Streak30,
    #[serde(rename = "streak_50")]
    Streak50,
    #[serde(rename = "streak_100")]
    Streak100,
    #[serde(rename = "completions_10")]
    Completions10,
    #[serde(rename = "completions_50")]
    Completions50,
    #[serde(rename = "completions_100")]
    Completions100,
    #[serde(rename = "completions_500")]
    Completions500,
    #[serde(rename = "level_5")]
    Level5,
    #[serde(rename = "level_10")]
    Level10,
    #[serde(rename = "level_25")]
    Level25,
    #[serde(rename = "level_50")]
    Level50,
    PerfectWeek,
    PerfectMonth,
}

/// Progress values the unlock rules are evaluated against.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressSnapshot {
    /// Highest current streak across all habits
    pub max_streak: u32,
    /// Lifetime completion count
    pub total_completions: u32,
    /// Current level
    pub level: u32,
    /// Every habit completed every day of the current week
    pub perfect_week: bool,
    /// Every habit completed every day of the current month
    pub perfect_month: bool,
}

impl AchievementType {
    /// Every achievement type, in unlock-check order.
    pub const ALL: [AchievementType; 17] = [
        AchievementType::FirstCompletion,
        AchievementType::Streak3,
        AchievementType::Streak7,
        AchievementType::Streak14,
        AchievementType::Streak30,
        AchievementType::Streak50,
        AchievementType::Streak100,
        AchievementType::Completions10,
        AchievementType::Completions50,
        AchievementType::Completions100,
        AchievementType::Completions500,
        AchievementType::PerfectWeek,
        AchievementType::PerfectMonth,
        AchievementType::Level5,
        AchievementType::Level10,
        AchievementType::Level25,
        AchievementType::Level50,
    ];

    /// Whether the milestone is reached for the given progress.
    pub fn is_met(&self, progress: &ProgressSnapshot) -> bool {
        match self {
            AchievementType::FirstCompletion => progress.total_completions >= 1,
            AchievementType::Streak3 => progress.max_streak >= 3,
            AchievementType::Streak7 => progress.max_streak >= 7,
            AchievementType::Streak14 => progress.max_streak >= 14,
            AchievementType::Streak30 => progress.max_streak >= 30,
            AchievementType::Streak50 => progress.max_streak >= 50,
            AchievementType::Streak100 => progress.max_streak >= 100,
            AchievementType::Completions10 => progress.total_completions >= 10,
            AchievementType::Completions50 => progress.total_completions >= 50,
            AchievementType::Completions100 => progress.total_completions >= 100,
            AchievementType::Completions500 => progress.total_completions >= 500,
            AchievementType::Level5 => progress.level >= 5,
            AchievementType::Level10 => progress.level >= 10,
            AchievementType::Level25 => progress.level >= 25,
            AchievementType::Level50 => progress.level >= 50,
            AchievementType::PerfectWeek => progress.perfect_week,
            AchievementType::PerfectMonth => progress.perfect_month,
        }
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementType::FirstCompletion => "first_completion",
            AchievementType::Streak3 => "streak_3",
            AchievementType::Streak7 => "streak_7",
            AchievementType::Streak14 => "streak_14",
            AchievementType::Streak30 => "streak_30",
            AchievementType::Streak50 => "streak_50",
            AchievementType::Streak100 => "streak_100",
            AchievementType::Completions10 => "completions_10",
            AchievementType::Completions50 => "completions_50",
            AchievementType::Completions100 => "completions_100",
            AchievementType::Completions500 => "completions_500",
            AchievementType::Level5 => "level_5",
            AchievementType::Level10 => "level_10",
            AchievementType::Level25 => "level_25",
            AchievementType::Level50 => "level_50",
            AchievementType::PerfectWeek => "perfect_week",
            AchievementType::PerfectMonth => "perfect_month",
        }
    }

    /// Parse a stored achievement type.
    pub fn parse(value: &str) -> Option<Self> {
        AchievementType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == value)
    }

    /// Badge title shown to the user.
    pub fn display_name(&self) -> &'static str {
        match self {
            AchievementType::FirstCompletion => "First Steps",
            AchievementType::Streak3 => "On Fire",
            AchievementType::Streak7 => "Week Warrior",
            AchievementType::Streak14 => "Two Week Champion",
            AchievementType::Streak30 => "Month Master",
            AchievementType::Streak50 => "Streak Legend",
            AchievementType::Streak100 => "Century Streak",
            AchievementType::Completions10 => "Getting Started",
            AchievementType::Completions50 => "Habit Builder",
            AchievementType::Completions100 => "Century Club",
            AchievementType::Completions500 => "Habit Master",
            AchievementType::Level5 => "Level 5",
            AchievementType::Level10 => "Level 10",
            AchievementType::Level25 => "Level 25",
            AchievementType::Level50 => "Level 50",
            AchievementType::PerfectWeek => "Perfect Week",
            AchievementType::PerfectMonth => "Perfect Month",
        }
    }

    /// Badge description shown to the user.
    pub fn description(&self) -> &'static str {
        match self {
            AchievementType::FirstCompletion => "Complete your first habit",
            AchievementType::Streak3 => "3-day streak",
            AchievementType::Streak7 => "7-day streak",
            AchievementType::Streak14 => "14-day streak",
            AchievementType::Streak30 => "30-day streak",
            AchievementType::Streak50 => "50-day streak",
            AchievementType::Streak100 => "100-day streak",
            AchievementType::Completions10 => "10 total completions",
            AchievementType::Completions50 => "50 total completions",
            AchievementType::Completions100 => "100 total completions",
            AchievementType::Completions500 => "500 total completions",
            AchievementType::Level5 => "Reach level 5",
            AchievementType::Level10 => "Reach level 10",
            AchievementType::Level25 => "Reach level 25",
            AchievementType::Level50 => "Reach level 50",
            AchievementType::PerfectWeek => "Complete all habits for a week",
            AchievementType::PerfectMonth => "Complete all habits for a month",
        }
    }
}

impl std::fmt::Display for AchievementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
