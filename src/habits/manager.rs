//! Habit CRUD and ordering.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::types::{Habit, HabitColor, HabitInput};

/// Manager for habit records.
pub struct HabitManager<'a> {
    conn: &'a Connection,
}

impl<'a> HabitManager<'a> {
    /// Create a new habit manager with a database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new habit for a user.
    ///
    /// The habit is appended to the end of the user's manual ordering.
    pub fn create(&self, user_id: Uuid, input: HabitInput) -> Result<Habit, HabitError> {
        if input.title.trim().is_empty() {
            return Err(HabitError::ValidationError(
                "Habit title is required".to_string(),
            ));
        }

        let next_position: i32 = self.conn.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM habits WHERE user_id = ?1",
            params![user_id.to_string()],
            |row| row.get(0),
        )?;

        let mut habit = Habit::new(user_id, input);
        habit.position = Some(next_position);

        self.conn.execute(
            "INSERT INTO habits
             (id, user_id, title, description, color, icon, position, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                habit.id.to_string(),
                habit.user_id.to_string(),
                habit.title,
                habit.description,
                habit.color.as_str(),
                habit.icon,
                habit.position,
                habit.created_at.to_rfc3339(),
                habit.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(habit)
    }

    /// Get a habit by ID.
    pub fn get(&self, id: Uuid) -> Result<Option<Habit>, HabitError> {
        self.conn
            .query_row(
                "SELECT id, user_id, title, description, color, icon, position,
                        created_at, updated_at
                 FROM habits WHERE id = ?1",
                params![id.to_string()],
                parse_habit_row,
            )
            .optional()
            .map_err(HabitError::from)
    }

    /// Get all habits for a user.
    ///
    /// Ordered by manual position (habits without one last), then newest first.
    pub fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Habit>, HabitError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, description, color, icon, position,
                    created_at, updated_at
             FROM habits
             WHERE user_id = ?1
             ORDER BY position IS NULL, position ASC, created_at DESC",
        )?;

        let rows = stmt.query_map(params![user_id.to_string()], parse_habit_row)?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(HabitError::from)
    }

    /// Update a habit.
    pub fn update(&self, habit: &Habit) -> Result<(), HabitError> {
        if habit.title.trim().is_empty() {
            return Err(HabitError::ValidationError(
                "Habit title cannot be empty".to_string(),
            ));
        }

        let now = Utc::now();

        let rows_affected = self.conn.execute(
            "UPDATE habits SET
             title = ?1, description = ?2, color = ?3, icon = ?4, position = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                habit.title.trim(),
                habit.description,
                habit.color.as_str(),
                habit.icon,
                habit.position,
                now.to_rfc3339(),
                habit.id.to_string(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(HabitError::NotFound(habit.id));
        }

        Ok(())
    }

    /// Delete a habit.
    ///
    /// Completions cascade at the storage layer.
    pub fn delete(&self, id: Uuid) -> Result<bool, HabitError> {
        let deleted = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1", params![id.to_string()])?;
        Ok(deleted > 0)
    }

    /// Set a habit's manual ordering position.
    pub fn set_position(&self, id: Uuid, position: i32) -> Result<(), HabitError> {
        let now = Utc::now();

        let rows_affected = self.conn.execute(
            "UPDATE habits SET position = ?1, updated_at = ?2 WHERE id = ?3",
            params![position, now.to_rfc3339(), id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(HabitError::NotFound(id));
        }

        Ok(())
    }

    /// Count habits for a user.
    pub fn count_for_user(&self, user_id: Uuid) -> Result<usize, HabitError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM habits WHERE user_id = ?1",
            params![user_id.to_string()],
            |row| row.get(0),
        )?;

        Ok(count as usize)
    }
}

/// Parse a database row into a Habit.
fn parse_habit_row(row: &rusqlite::Row) -> rusqlite::Result<Habit> {
    let id_str: String = row.get(0)?;
    let user_id_str: String = row.get(1)?;
    let color_str: String = row.get(4)?;
    let created_at_str: String = row.get(7)?;
    let updated_at_str: String = row.get(8)?;

    Ok(Habit {
        id: Uuid::parse_str(&id_str).unwrap_or_default(),
        user_id: Uuid::parse_str(&user_id_str).unwrap_or_default(),
        title: row.get(2)?,
        description: row.get(3)?,
        color: HabitColor::from_str_or_default(&color_str),
        icon: row.get(5)?,
        position: row.get(6)?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

/// Habit management errors.
#[derive(Debug, thiserror::Error)]
pub enum HabitError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Habit not found: {0}")]
    NotFound(Uuid),
}
