//! Database schema definitions for HabitGarden.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Gamification profiles table (one row per user, created lazily)
CREATE TABLE IF NOT EXISTS profiles (
    id TEXT PRIMARY KEY,
    habit_points INTEGER NOT NULL DEFAULT 0,
    total_habit_completions INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Habits table
CREATE TABLE IF NOT EXISTS habits (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    color TEXT NOT NULL DEFAULT 'blue',
    icon TEXT,
    position INTEGER,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_habits_user_id ON habits(user_id);

-- Habit completions table
-- completion_date is a date-only string (YYYY-MM-DD); at most one row
-- per habit and calendar day.
CREATE TABLE IF NOT EXISTS habit_completions (
    id TEXT PRIMARY KEY,
    habit_id TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL,
    completion_date TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE(habit_id, completion_date)
);

CREATE INDEX IF NOT EXISTS idx_completions_user_date ON habit_completions(user_id, completion_date);
CREATE INDEX IF NOT EXISTS idx_completions_habit_id ON habit_completions(habit_id);

-- Habit achievements table (one row per user and achievement type)
CREATE TABLE IF NOT EXISTS habit_achievements (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    achievement_type TEXT NOT NULL,
    unlocked_at TEXT NOT NULL,
    claimed_at TEXT,
    UNIQUE(user_id, achievement_type)
);

CREATE INDEX IF NOT EXISTS idx_achievements_user_id ON habit_achievements(user_id);
"#;

/// SQL for schema version tracking (migrations)
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version
pub const CURRENT_VERSION: i32 = 1;
