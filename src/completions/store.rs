//! Completion ledger storage operations.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::habits::types::Completion;
use crate::storage::database::DatabaseError;

/// Date-only storage format for completion dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Store for completion records.
pub struct CompletionStore<'a> {
    conn: &'a Connection,
}

impl<'a> CompletionStore<'a> {
    /// Create a new completion store with the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a completion unless one already exists for (habit, date).
    ///
    /// The uniqueness constraint is the guard: a conflicting insert is not an
    /// error, it means the day was already completed, and `None` is returned.
    pub fn insert_new(
        &self,
        habit_id: Uuid,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Completion>, DatabaseError> {
        let completion = Completion {
            id: Uuid::new_v4(),
            habit_id,
            user_id,
            date,
            created_at: Utc::now(),
        };

        let inserted = self
            .conn
            .execute(
                "INSERT INTO habit_completions (id, habit_id, user_id, completion_date, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(habit_id, completion_date) DO NOTHING",
                params![
                    completion.id.to_string(),
                    completion.habit_id.to_string(),
                    completion.user_id.to_string(),
                    completion.date.format(DATE_FORMAT).to_string(),
                    completion.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(if inserted > 0 { Some(completion) } else { None })
    }

    /// Delete a completion by ID.
    pub fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let deleted = self
            .conn
            .execute(
                "DELETE FROM habit_completions WHERE id = ?1",
                params![id.to_string()],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Ok(deleted > 0)
    }

    /// Find the completion for a habit on a specific day, if any.
    pub fn find(
        &self,
        habit_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Completion>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, habit_id, user_id, completion_date, created_at
                 FROM habit_completions
                 WHERE habit_id = ?1 AND completion_date = ?2",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut rows = stmt
            .query(params![
                habit_id.to_string(),
                date.format(DATE_FORMAT).to_string()
            ])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        if let Some(row) = rows
            .next()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
        {
            Ok(Some(row_to_completion(row)?))
        } else {
            Ok(None)
        }
    }

    /// Fetch all completions for a user within a date range, newest first.
    pub fn fetch_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Completion>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, habit_id, user_id, completion_date, created_at
                 FROM habit_completions
                 WHERE user_id = ?1 AND completion_date >= ?2 AND completion_date <= ?3
                 ORDER BY completion_date DESC",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut rows = stmt
            .query(params![
                user_id.to_string(),
                start.format(DATE_FORMAT).to_string(),
                end.format(DATE_FORMAT).to_string(),
            ])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut completions = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
        {
            completions.push(row_to_completion(row)?);
        }

        Ok(completions)
    }

    /// Fetch every completion for a user, newest first.
    ///
    /// The rules engine recomputes streaks and totals from the full ledger
    /// rather than trusting a loaded window.
    pub fn fetch_all_for_user(&self, user_id: Uuid) -> Result<Vec<Completion>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, habit_id, user_id, completion_date, created_at
                 FROM habit_completions
                 WHERE user_id = ?1
                 ORDER BY completion_date DESC",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut rows = stmt
            .query(params![user_id.to_string()])
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut completions = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?
        {
            completions.push(row_to_completion(row)?);
        }

        Ok(completions)
    }

    /// Count completions for a user.
    pub fn count_for_user(&self, user_id: Uuid) -> Result<u32, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM habit_completions WHERE user_id = ?1",
                params![user_id.to_string()],
                |row| row.get(0),
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(count as u32)
    }
}

/// Parse a database row into a Completion.
fn row_to_completion(row: &rusqlite::Row<'_>) -> Result<Completion, DatabaseError> {
    let id_str: String = row
        .get(0)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    let habit_id_str: String = row
        .get(1)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    let user_id_str: String = row
        .get(2)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    let date_str: String = row
        .get(3)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    let created_at_str: String = row
        .get(4)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

    Ok(Completion {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| DatabaseError::DeserializationError(format!("Invalid UUID: {}", e)))?,
        habit_id: Uuid::parse_str(&habit_id_str)
            .map_err(|e| DatabaseError::DeserializationError(format!("Invalid habit UUID: {}", e)))?,
        user_id: Uuid::parse_str(&user_id_str)
            .map_err(|e| DatabaseError::DeserializationError(format!("Invalid user UUID: {}", e)))?,
        date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
            .map_err(|e| DatabaseError::DeserializationError(format!("Invalid date: {}", e)))?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DatabaseError::DeserializationError(format!("Invalid created date: {}", e)))?,
    })
}
