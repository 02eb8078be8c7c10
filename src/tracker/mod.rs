//! Habit tracker service.
//!
//! `HabitTracker` is the single object frontends talk to. It owns the
//! database handle, the clock, and the loaded state: the user's habit list
//! and a window of completions. Derived metrics are computed from the loaded
//! window; the gamification flow recomputes from the store instead.

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::completions::store::CompletionStore;
use crate::gamification::achievements::AchievementStore;
use crate::gamification::engine::{GamificationError, RulesEngine};
use crate::gamification::types::{Achievement, GamificationSummary};
use crate::habits::manager::{HabitError, HabitManager};
use crate::habits::types::{Completion, Habit, HabitInput, HabitStats};
use crate::stats::streaks;
use crate::storage::config::TrackerSettings;
use crate::storage::database::{Database, DatabaseError};

/// Service for habit tracking, completion toggling, and gamification reads.
pub struct HabitTracker {
    db: Database,
    user_id: Uuid,
    clock: Box<dyn Clock>,
    settings: TrackerSettings,
    habits: Vec<Habit>,
    completions: Vec<Completion>,
}

impl HabitTracker {
    /// Create a tracker for a user on the system clock.
    pub fn new(db: Database, user_id: Uuid) -> Self {
        Self::with_clock(db, user_id, Box::new(SystemClock))
    }

    /// Create a tracker with an explicit clock.
    pub fn with_clock(db: Database, user_id: Uuid, clock: Box<dyn Clock>) -> Self {
        Self {
            db,
            user_id,
            clock,
            settings: TrackerSettings::default(),
            habits: Vec::new(),
            completions: Vec::new(),
        }
    }

    /// Override tracker settings.
    pub fn with_settings(mut self, settings: TrackerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// User this tracker is bound to.
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    // ========== Habit Management ==========

    /// Loaded habits, in display order.
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    /// Look up a loaded habit by ID.
    pub fn habit(&self, id: Uuid) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    /// Load the user's habits from the store.
    pub fn fetch_habits(&mut self) -> Result<(), TrackerError> {
        let manager = HabitManager::new(self.db.connection());
        self.habits = manager.list_for_user(self.user_id)?;
        Ok(())
    }

    /// Create a habit and append it to the loaded list.
    pub fn add_habit(&mut self, input: HabitInput) -> Result<Habit, TrackerError> {
        let manager = HabitManager::new(self.db.connection());
        let habit = manager.create(self.user_id, input)?;
        self.habits.push(habit.clone());
        Ok(habit)
    }

    /// Update a habit in the store and the loaded list.
    pub fn update_habit(&mut self, habit: Habit) -> Result<(), TrackerError> {
        let manager = HabitManager::new(self.db.connection());
        manager.update(&habit)?;

        if let Some(loaded) = self.habits.iter_mut().find(|h| h.id == habit.id) {
            *loaded = habit;
        }
        Ok(())
    }

    /// Delete a habit; its completions go with it.
    pub fn delete_habit(&mut self, id: Uuid) -> Result<(), TrackerError> {
        let manager = HabitManager::new(self.db.connection());
        if !manager.delete(id)? {
            return Err(TrackerError::HabitNotFound(id));
        }

        self.habits.retain(|h| h.id != id);
        self.completions.retain(|c| c.habit_id != id);
        Ok(())
    }

    /// Apply manual ordering positions.
    ///
    /// The loaded list is updated optimistically; on a storage failure the
    /// habit list is re-fetched so local state matches the store again.
    pub fn update_positions(&mut self, updates: &[(Uuid, i32)]) -> Result<(), TrackerError> {
        if updates.is_empty() {
            return Ok(());
        }

        for (id, position) in updates {
            if let Some(habit) = self.habits.iter_mut().find(|h| h.id == *id) {
                habit.position = Some(*position);
            }
        }

        let result: Result<(), HabitError> = updates.iter().try_for_each(|(id, position)| {
            HabitManager::new(self.db.connection()).set_position(*id, *position)
        });

        if let Err(err) = result {
            tracing::warn!("failed to update habit positions: {}", err);
            self.fetch_habits()?;
            return Err(err.into());
        }

        self.habits
            .sort_by(|a, b| match (a.position, b.position) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => b.created_at.cmp(&a.created_at),
            });
        Ok(())
    }

    // ========== Completion Management ==========

    /// Loaded completion window.
    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    /// Load completions for a date range, replacing the current window.
    ///
    /// Dates are `YYYY-MM-DD` strings; malformed input is logged and ignored
    /// without touching the loaded window. Anything previously loaded outside
    /// the new range disappears from view, so callers must request a range
    /// wide enough for the calculation at hand.
    pub fn fetch_completions(&mut self, start_date: &str, end_date: &str) -> Result<(), TrackerError> {
        let (start, end) = match (parse_day(start_date), parse_day(end_date)) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                tracing::warn!(
                    "Invalid completion range, expected YYYY-MM-DD: {} .. {}",
                    start_date,
                    end_date
                );
                return Ok(());
            }
        };

        let store = CompletionStore::new(self.db.connection());
        self.completions = store.fetch_range(self.user_id, start, end)?;
        Ok(())
    }

    /// Load the default completion window ending today.
    pub fn fetch_recent_completions(&mut self) -> Result<(), TrackerError> {
        let today = self.clock.today();
        let start = today - Duration::days(i64::from(self.settings.fetch_window_days));

        let store = CompletionStore::new(self.db.connection());
        self.completions = store.fetch_range(self.user_id, start, today)?;
        Ok(())
    }

    /// Toggle the completion state of a habit on a date.
    ///
    /// Removing a completion adjusts no points; adding one runs the point
    /// award and achievement unlock flow in a single transaction with the
    /// insert. On a storage failure the window around the date is re-fetched
    /// before the error is reported, so the loaded state tracks the store.
    pub fn toggle_completion(&mut self, habit_id: Uuid, date: &str) -> Result<(), TrackerError> {
        let day = parse_day(date).ok_or_else(|| TrackerError::InvalidDate(date.to_string()))?;

        if self.habit(habit_id).is_none() {
            // The loaded list may be stale; trust the store before refusing
            let manager = HabitManager::new(self.db.connection());
            if manager.get(habit_id)?.is_none() {
                return Err(TrackerError::HabitNotFound(habit_id));
            }
        }

        let existing = self
            .completions
            .iter()
            .find(|c| c.habit_id == habit_id && c.date == day)
            .cloned();

        let result = match existing {
            Some(completion) => self.remove_completion(&completion),
            None => self.record_completion(habit_id, day),
        };

        if let Err(err) = result {
            tracing::warn!("failed to toggle completion: {}", err);
            self.resync_window(day);
            return Err(err);
        }

        Ok(())
    }

    /// Whether a habit is completed on a date, per the loaded window.
    ///
    /// Dates outside the loaded range report false; load the relevant range
    /// first.
    pub fn is_completed(&self, habit_id: Uuid, date: NaiveDate) -> bool {
        self.completions
            .iter()
            .any(|c| c.habit_id == habit_id && c.date == date)
    }

    fn remove_completion(&mut self, completion: &Completion) -> Result<(), TrackerError> {
        let store = CompletionStore::new(self.db.connection());
        store.delete(completion.id)?;

        // No points come back off: the award ratchet is one-way
        self.completions.retain(|c| c.id != completion.id);
        Ok(())
    }

    fn record_completion(&mut self, habit_id: Uuid, day: NaiveDate) -> Result<(), TrackerError> {
        // The window may have missed a row written elsewhere; adopt it
        // instead of awarding twice.
        {
            let store = CompletionStore::new(self.db.connection());
            if let Some(found) = store.find(habit_id, day)? {
                self.completions.push(found);
                return Ok(());
            }
        }

        let today = self.clock.today();
        let user_id = self.user_id;

        let tx = self.db.transaction()?;

        let inserted = CompletionStore::new(&tx).insert_new(habit_id, user_id, day)?;
        let completion = match inserted {
            Some(completion) => completion,
            None => {
                // Insert conflict: the day was completed concurrently
                let found = CompletionStore::new(&tx).find(habit_id, day)?;
                tx.commit()
                    .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
                if let Some(found) = found {
                    self.completions.push(found);
                }
                return Ok(());
            }
        };

        let award = RulesEngine::new(&tx, user_id).award_completion(habit_id, today)?;
        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tracing::debug!(
            points = award.points_earned,
            unlocked = award.unlocked.len(),
            "completion recorded"
        );

        self.completions.push(completion);
        Ok(())
    }

    /// Replace the loaded window with the store's rows around `day`.
    fn resync_window(&mut self, day: NaiveDate) {
        let span = i64::from(self.settings.resync_window_days);
        let start = day - Duration::days(span);
        let end = day + Duration::days(span);

        let store = CompletionStore::new(self.db.connection());
        match store.fetch_range(self.user_id, start, end) {
            Ok(rows) => self.completions = rows,
            Err(err) => tracing::warn!("failed to resynchronize completions: {}", err),
        }
    }

    // ========== Stats ==========

    /// Current streak for a habit, from the loaded window.
    pub fn streak(&self, habit_id: Uuid) -> u32 {
        streaks::current_streak(&self.habit_dates(habit_id), self.clock.today())
    }

    /// Best streak for a habit, from the loaded window.
    pub fn best_streak(&self, habit_id: Uuid) -> u32 {
        streaks::best_streak(&self.habit_dates(habit_id))
    }

    /// Percent of the given week completed for a habit (0-100).
    pub fn weekly_completion(&self, habit_id: Uuid, week_start: NaiveDate) -> u8 {
        streaks::weekly_completion(&self.habit_dates(habit_id), week_start)
    }

    /// Combined stats bundle for one habit.
    pub fn habit_stats(&self, habit_id: Uuid, week_start: NaiveDate) -> HabitStats {
        let dates = self.habit_dates(habit_id);
        HabitStats {
            current_streak: streaks::current_streak(&dates, self.clock.today()),
            best_streak: streaks::best_streak(&dates),
            weekly_completion: streaks::weekly_completion(&dates, week_start),
            total_completions: dates.len() as u32,
        }
    }

    fn habit_dates(&self, habit_id: Uuid) -> Vec<NaiveDate> {
        self.completions
            .iter()
            .filter(|c| c.habit_id == habit_id)
            .map(|c| c.date)
            .collect()
    }

    // ========== Gamification ==========

    /// Points, level, and progress summary.
    pub fn gamification(&self) -> Result<GamificationSummary, TrackerError> {
        let engine = RulesEngine::new(self.db.connection(), self.user_id);
        Ok(engine.summary()?)
    }

    /// All achievements, most recently unlocked first.
    pub fn achievements(&self) -> Result<Vec<Achievement>, TrackerError> {
        let store = AchievementStore::new(self.db.connection());
        Ok(store.list_for_user(self.user_id)?)
    }

    /// Achievements not yet claimed.
    pub fn unclaimed_achievements(&self) -> Result<Vec<Achievement>, TrackerError> {
        Ok(self
            .achievements()?
            .into_iter()
            .filter(Achievement::is_unclaimed)
            .collect())
    }

    /// Claim an achievement. Claiming twice keeps the first claim time.
    pub fn claim_achievement(&self, id: Uuid) -> Result<Achievement, TrackerError> {
        let store = AchievementStore::new(self.db.connection());
        Ok(store.claim(id, self.clock.now())?)
    }
}

/// Strict `YYYY-MM-DD` parse.
fn parse_day(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Tracker errors.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Invalid date format, expected YYYY-MM-DD: {0}")]
    InvalidDate(String),

    #[error("Habit not found: {0}")]
    HabitNotFound(Uuid),

    #[error("Habit error: {0}")]
    Habit(#[from] HabitError),

    #[error("Gamification error: {0}")]
    Gamification(#[from] GamificationError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}
