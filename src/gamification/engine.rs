//! Point award and achievement unlock rules.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rusqlite::Connection;
use uuid::Uuid;

use super::achievements::AchievementStore;
use super::levels::level_for_points;
use super::profile::ProfileStore;
use super::types::{Achievement, AchievementType, GamificationSummary, ProgressSnapshot};
use crate::completions::store::CompletionStore;
use crate::habits::manager::{HabitError, HabitManager};
use crate::habits::types::Habit;
use crate::stats::streaks::{current_streak, month_span, week_start, DAYS_PER_WEEK};
use crate::storage::database::DatabaseError;

/// Points for marking a habit done.
pub const BASE_COMPLETION_POINTS: u32 = 10;
/// Extra points per day of the habit's current streak.
pub const STREAK_BONUS_PER_DAY: u32 = 5;
/// Cap on the streak bonus.
pub const MAX_STREAK_BONUS: u32 = 50;
/// Extra points when every habit is done for the day.
pub const PERFECT_DAY_BONUS: u32 = 20;

/// Points for a new completion.
///
/// `streak` is the habit's current streak with the new completion already
/// counted. Removing a completion never awards or revokes points.
pub fn completion_points(streak: u32, perfect_day: bool) -> u32 {
    let mut points = BASE_COMPLETION_POINTS;
    points += (streak * STREAK_BONUS_PER_DAY).min(MAX_STREAK_BONUS);
    if perfect_day {
        points += PERFECT_DAY_BONUS;
    }
    points
}

/// Result of a point award.
#[derive(Debug, Clone)]
pub struct AwardSummary {
    /// Points earned by this completion
    pub points_earned: u32,
    /// Cumulative points after the award
    pub total_points: u32,
    /// Level after the award
    pub level: u32,
    /// Achievements newly unlocked by this award
    pub unlocked: Vec<Achievement>,
}

/// Evaluates point awards and achievement unlocks for one user.
///
/// Every evaluation re-reads habits and the full completion ledger instead of
/// applying increments to cached values, so a previously missed update heals
/// on the next award. Callers wanting atomicity with the completion insert
/// hand the engine their transaction connection.
pub struct RulesEngine<'a> {
    conn: &'a Connection,
    user_id: Uuid,
}

impl<'a> RulesEngine<'a> {
    /// Create a rules engine bound to one user.
    pub fn new(conn: &'a Connection, user_id: Uuid) -> Self {
        Self { conn, user_id }
    }

    /// Award points for a completion that was just inserted and unlock any
    /// newly reached achievements.
    ///
    /// `today` anchors streak, perfect-day, and perfect-week checks; the
    /// completed date itself may lie in the past.
    pub fn award_completion(
        &self,
        habit_id: Uuid,
        today: NaiveDate,
    ) -> Result<AwardSummary, GamificationError> {
        let habits = HabitManager::new(self.conn).list_for_user(self.user_id)?;
        let completions = CompletionStore::new(self.conn).fetch_all_for_user(self.user_id)?;

        let mut dates_by_habit: HashMap<Uuid, Vec<NaiveDate>> = HashMap::new();
        for completion in &completions {
            dates_by_habit
                .entry(completion.habit_id)
                .or_default()
                .push(completion.date);
        }

        let streak = current_streak(habit_dates(&dates_by_habit, habit_id), today);
        let perfect_day = !habits.is_empty()
            && habits.iter().all(|habit| {
                dates_by_habit
                    .get(&habit.id)
                    .is_some_and(|dates| dates.contains(&today))
            });

        let points_earned = completion_points(streak, perfect_day);

        let profiles = ProfileStore::new(self.conn);
        let profile = profiles.get_or_create(self.user_id)?;
        let total_points = profile.points + points_earned;
        let total_completions = profile.total_completions + 1;
        profiles.update_counters(self.user_id, total_points, total_completions)?;

        let progress = ProgressSnapshot {
            max_streak: max_streak(&habits, &dates_by_habit, today),
            total_completions,
            level: level_for_points(total_points),
            perfect_week: perfect_week(&habits, &dates_by_habit, today),
            perfect_month: perfect_month(&habits, &dates_by_habit, today),
        };

        let unlocked = self.unlock_reached(&progress)?;

        Ok(AwardSummary {
            points_earned,
            total_points,
            level: level_for_points(total_points),
            unlocked,
        })
    }

    /// Unlock every achievement whose threshold is met and not yet recorded.
    fn unlock_reached(
        &self,
        progress: &ProgressSnapshot,
    ) -> Result<Vec<Achievement>, GamificationError> {
        let store = AchievementStore::new(self.conn);
        let already: HashSet<AchievementType> =
            store.unlocked_types(self.user_id)?.into_iter().collect();

        let mut unlocked = Vec::new();
        for achievement_type in AchievementType::ALL {
            if already.contains(&achievement_type) || !achievement_type.is_met(progress) {
                continue;
            }
            // The uniqueness constraint makes a concurrent duplicate a no-op
            if let Some(achievement) = store.unlock(self.user_id, achievement_type)? {
                tracing::info!(achievement = achievement_type.as_str(), "achievement unlocked");
                unlocked.push(achievement);
            }
        }

        Ok(unlocked)
    }

    /// Gamification summary for display.
    pub fn summary(&self) -> Result<GamificationSummary, GamificationError> {
        let profile = ProfileStore::new(self.conn).get_or_create(self.user_id)?;
        Ok(GamificationSummary::for_profile(&profile))
    }
}

fn habit_dates(dates_by_habit: &HashMap<Uuid, Vec<NaiveDate>>, habit_id: Uuid) -> &[NaiveDate] {
    dates_by_habit
        .get(&habit_id)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Highest current streak across all habits.
fn max_streak(
    habits: &[Habit],
    dates_by_habit: &HashMap<Uuid, Vec<NaiveDate>>,
    today: NaiveDate,
) -> u32 {
    habits
        .iter()
        .map(|habit| current_streak(habit_dates(dates_by_habit, habit.id), today))
        .max()
        .unwrap_or(0)
}

/// Every habit completed on every day of the span.
///
/// With at most one completion per habit and day, a completion count equal to
/// habit-count x span-days means full coverage.
fn perfect_span(
    habits: &[Habit],
    dates_by_habit: &HashMap<Uuid, Vec<NaiveDate>>,
    start: NaiveDate,
    end: NaiveDate,
    span_days: u32,
) -> bool {
    if habits.is_empty() {
        return false;
    }

    let in_span: usize = habits
        .iter()
        .map(|habit| {
            habit_dates(dates_by_habit, habit.id)
                .iter()
                .filter(|date| **date >= start && **date <= end)
                .count()
        })
        .sum();

    in_span == habits.len() * span_days as usize
}

/// Every habit completed every day of the Monday-Sunday week containing `today`.
fn perfect_week(
    habits: &[Habit],
    dates_by_habit: &HashMap<Uuid, Vec<NaiveDate>>,
    today: NaiveDate,
) -> bool {
    let start = week_start(today);
    let end = start + chrono::Duration::days(6);
    perfect_span(habits, dates_by_habit, start, end, DAYS_PER_WEEK)
}

/// Every habit completed every day of the calendar month containing `today`.
fn perfect_month(
    habits: &[Habit],
    dates_by_habit: &HashMap<Uuid, Vec<NaiveDate>>,
    today: NaiveDate,
) -> bool {
    let (start, end) = month_span(today);
    let span_days = (end - start).num_days() as u32 + 1;
    perfect_span(habits, dates_by_habit, start, end, span_days)
}

/// Gamification errors.
#[derive(Debug, thiserror::Error)]
pub enum GamificationError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Habit error: {0}")]
    Habit(#[from] HabitError),
}
