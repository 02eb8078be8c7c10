//! Gamification profile storage operations.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::types::GamificationProfile;
use crate::storage::database::DatabaseError;

/// Store for per-user gamification counters.
pub struct ProfileStore<'a> {
    conn: &'a Connection,
}

impl<'a> ProfileStore<'a> {
    /// Create a new profile store with the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Get a profile by user ID.
    pub fn get(&self, user_id: Uuid) -> Result<Option<GamificationProfile>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, habit_points, total_habit_completions, created_at, updated_at
                 FROM profiles WHERE id = ?1",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut rows = stmt
            .query(params![user_id.to_string()])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if let Some(row) = rows
            .next()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
        {
            Ok(Some(row_to_profile(row)?))
        } else {
            Ok(None)
        }
    }

    /// Get the profile for a user, creating a zeroed row if none exists.
    pub fn get_or_create(&self, user_id: Uuid) -> Result<GamificationProfile, DatabaseError> {
        if let Some(profile) = self.get(user_id)? {
            return Ok(profile);
        }

        let now = Utc::now();
        let profile = GamificationProfile {
            user_id,
            points: 0,
            total_completions: 0,
            created_at: now,
            updated_at: now,
        };

        self.conn
            .execute(
                "INSERT INTO profiles (id, habit_points, total_habit_completions, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    profile.user_id.to_string(),
                    profile.points,
                    profile.total_completions,
                    profile.created_at.to_rfc3339(),
                    profile.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(profile)
    }

    /// Write new counter values for a user.
    ///
    /// Counters only ever grow; callers add to the stored values rather than
    /// replacing them with recomputed ones.
    pub fn update_counters(
        &self,
        user_id: Uuid,
        points: u32,
        total_completions: u32,
    ) -> Result<(), DatabaseError> {
        let rows_affected = self
            .conn
            .execute(
                "UPDATE profiles
                 SET habit_points = ?2, total_habit_completions = ?3, updated_at = ?4
                 WHERE id = ?1",
                params![
                    user_id.to_string(),
                    points,
                    total_completions,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if rows_affected == 0 {
            return Err(DatabaseError::NotFound(format!("Profile {}", user_id)));
        }

        Ok(())
    }
}

fn row_to_profile(row: &rusqlite::Row<'_>) -> Result<GamificationProfile, DatabaseError> {
    let id_str: String = row
        .get(0)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    let points: i64 = row
        .get(1)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    let total: i64 = row
        .get(2)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    let created_str: String = row
        .get(3)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    let updated_str: String = row
        .get(4)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

    Ok(GamificationProfile {
        user_id: Uuid::parse_str(&id_str)
            .map_err(|e| DatabaseError::DeserializationError(format!("Invalid UUID: {}", e)))?,
        points: points.max(0) as u32,
        total_completions: total.max(0) as u32,
        created_at: DateTime::parse_from_rfc3339(&created_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DatabaseError::DeserializationError(format!("Invalid created date: {}", e)))?,
        updated_at: DateTime::parse_from_rfc3339(&updated_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DatabaseError::DeserializationError(format!("Invalid updated date: {}", e)))?,
    })
}
