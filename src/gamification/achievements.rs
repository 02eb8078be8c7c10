//! Achievement storage operations.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::types::{Achievement, AchievementType};
use crate::storage::database::DatabaseError;

/// Store for achievement records.
pub struct AchievementStore<'a> {
    conn: &'a Connection,
}

impl<'a> AchievementStore<'a> {
    /// Create a new achievement store with the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Record an unlock unless the user already has this achievement.
    ///
    /// The (user, type) uniqueness constraint is the guard; `None` means the
    /// achievement was already unlocked.
    pub fn unlock(
        &self,
        user_id: Uuid,
        achievement_type: AchievementType,
    ) -> Result<Option<Achievement>, DatabaseError> {
        let achievement = Achievement {
            id: Uuid::new_v4(),
            user_id,
            achievement_type,
            unlocked_at: Utc::now(),
            claimed_at: None,
        };

        let inserted = self
            .conn
            .execute(
                "INSERT INTO habit_achievements (id, user_id, achievement_type, unlocked_at, claimed_at)
                 VALUES (?1, ?2, ?3, ?4, NULL)
                 ON CONFLICT(user_id, achievement_type) DO NOTHING",
                params![
                    achievement.id.to_string(),
                    achievement.user_id.to_string(),
                    achievement.achievement_type.as_str(),
                    achievement.unlocked_at.to_rfc3339(),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(if inserted > 0 { Some(achievement) } else { None })
    }

    /// Get an achievement by ID.
    pub fn get(&self, id: Uuid) -> Result<Option<Achievement>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, user_id, achievement_type, unlocked_at, claimed_at
                 FROM habit_achievements WHERE id = ?1",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut rows = stmt
            .query(params![id.to_string()])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if let Some(row) = rows
            .next()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
        {
            Ok(Some(row_to_achievement(row)?))
        } else {
            Ok(None)
        }
    }

    /// Get all achievements for a user, most recently unlocked first.
    pub fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Achievement>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, user_id, achievement_type, unlocked_at, claimed_at
                 FROM habit_achievements
                 WHERE user_id = ?1
                 ORDER BY unlocked_at DESC",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut rows = stmt
            .query(params![user_id.to_string()])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut achievements = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
        {
            achievements.push(row_to_achievement(row)?);
        }

        Ok(achievements)
    }

    /// Achievement types the user has already unlocked.
    pub fn unlocked_types(&self, user_id: Uuid) -> Result<Vec<AchievementType>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT achievement_type FROM habit_achievements WHERE user_id = ?1")
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut rows = stmt
            .query(params![user_id.to_string()])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut types = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
        {
            let type_str: String = row
                .get(0)
                .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            if let Some(ty) = AchievementType::parse(&type_str) {
                types.push(ty);
            }
        }

        Ok(types)
    }

    /// Stamp an achievement as claimed.
    ///
    /// Claiming an already-claimed achievement is a no-op; the stored claim
    /// timestamp is kept. An unknown ID is an error.
    pub fn claim(&self, id: Uuid, claimed_at: DateTime<Utc>) -> Result<Achievement, DatabaseError> {
        self.conn
            .execute(
                "UPDATE habit_achievements SET claimed_at = ?2
                 WHERE id = ?1 AND claimed_at IS NULL",
                params![id.to_string(), claimed_at.to_rfc3339()],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        self.get(id)?
            .ok_or_else(|| DatabaseError::NotFound(format!("Achievement {}", id)))
    }
}

fn row_to_achievement(row: &rusqlite::Row<'_>) -> Result<Achievement, DatabaseError> {
    let id_str: String = row
        .get(0)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    let user_id_str: String = row
        .get(1)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    let type_str: String = row
        .get(2)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    let unlocked_str: String = row
        .get(3)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    let claimed_str: Option<String> = row
        .get(4)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

    Ok(Achievement {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| DatabaseError::DeserializationError(format!("Invalid UUID: {}", e)))?,
        user_id: Uuid::parse_str(&user_id_str)
            .map_err(|e| DatabaseError::DeserializationError(format!("Invalid user UUID: {}", e)))?,
        achievement_type: AchievementType::parse(&type_str).ok_or_else(|| {
            DatabaseError::DeserializationError(format!("Unknown achievement type: {}", type_str))
        })?,
        unlocked_at: DateTime::parse_from_rfc3339(&unlocked_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DatabaseError::DeserializationError(format!("Invalid unlock date: {}", e)))?,
        claimed_at: claimed_str
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| {
                        DatabaseError::DeserializationError(format!("Invalid claim date: {}", e))
                    })
            })
            .transpose()?,
    })
}
