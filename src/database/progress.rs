// ABOUTME: Per-(client, day) completion tracking with atomic upserts
// ABOUTME: Derives left-joined per-program progress views via the catalog gateway
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

use super::catalog::CatalogGateway;
use super::{format_timestamp, parse_timestamp_opt};
use crate::errors::{AppError, AppResult};
use crate::models::{DayProgress, DayProgressEntry};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Tracks food/exercise sub-task and whole-day completion for clients
pub struct ProgressTracker {
    pool: SqlitePool,
    catalog: Arc<dyn CatalogGateway>,
}

fn row_to_progress(row: &SqliteRow) -> AppResult<DayProgress> {
    let client_id: String = row.get("client_id");
    let completed_at: Option<String> = row.get("completed_at");
    Ok(DayProgress {
        id: row.get("id"),
        client_id: Uuid::parse_str(&client_id)
            .map_err(|e| AppError::database(format!("Invalid client_id in progress: {e}")))?,
        day_id: row.get("day_id"),
        food_completed: row.get("food_completed"),
        exercise_completed: row.get("exercise_completed"),
        completed_at: parse_timestamp_opt(completed_at.as_deref())?,
    })
}

impl ProgressTracker {
    /// Create a new progress tracker over the shared pool
    #[must_use]
    pub fn new(pool: SqlitePool, catalog: Arc<dyn CatalogGateway>) -> Self {
        Self { pool, catalog }
    }

    /// Reject reports against days the catalog does not know
    async fn require_day(&self, day_id: i64) -> AppResult<()> {
        if self.catalog.day_exists(day_id).await? {
            Ok(())
        } else {
            Err(AppError::invalid_input(format!(
                "day {day_id} does not exist"
            )))
        }
    }

    /// Mark the whole day complete for a client
    ///
    /// Creates the row with both sub-task flags false when absent; the flags
    /// are untouched either way. Upsert keyed by (client, day), so repeated
    /// reports never duplicate the row.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the day does not exist.
    pub async fn mark_day_completed(&self, client_id: Uuid, day_id: i64) -> AppResult<DayProgress> {
        self.require_day(day_id).await?;

        let now = format_timestamp(Utc::now());
        let row = sqlx::query(
            r"
            INSERT INTO program_progress (client_id, day_id, completed_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(client_id, day_id) DO UPDATE SET completed_at = excluded.completed_at
            RETURNING id, client_id, day_id, food_completed, exercise_completed, completed_at
            ",
        )
        .bind(client_id.to_string())
        .bind(day_id)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to mark day complete: {e}")))?;

        row_to_progress(&row)
    }

    /// Check off the food sub-task for a (client, day) pair
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the day does not exist.
    pub async fn mark_food_completed(
        &self,
        client_id: Uuid,
        day_id: i64,
    ) -> AppResult<DayProgress> {
        self.require_day(day_id).await?;
        self.set_flag(client_id, day_id, "food_completed").await
    }

    /// Check off the exercise sub-task for a (client, day) pair
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the day does not exist.
    pub async fn mark_exercise_completed(
        &self,
        client_id: Uuid,
        day_id: i64,
    ) -> AppResult<DayProgress> {
        self.require_day(day_id).await?;
        self.set_flag(client_id, day_id, "exercise_completed").await
    }

    /// Upsert setting exactly one sub-task flag, leaving the other flag and
    /// `completed_at` untouched
    async fn set_flag(&self, client_id: Uuid, day_id: i64, flag: &str) -> AppResult<DayProgress> {
        // Column name is one of the two fixed flags above, never input
        let query = format!(
            r"
            INSERT INTO program_progress (client_id, day_id, {flag})
            VALUES (?1, ?2, 1)
            ON CONFLICT(client_id, day_id) DO UPDATE SET {flag} = 1
            RETURNING id, client_id, day_id, food_completed, exercise_completed, completed_at
            "
        );
        let row = sqlx::query(&query)
            .bind(client_id.to_string())
            .bind(day_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to mark {flag}: {e}")))?;

        row_to_progress(&row)
    }

    /// Fetch the progress row for a (client, day) pair
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the client has never reported on that day.
    pub async fn get_progress(&self, client_id: Uuid, day_id: i64) -> AppResult<DayProgress> {
        let row = sqlx::query(
            r"
            SELECT id, client_id, day_id, food_completed, exercise_completed, completed_at
            FROM program_progress
            WHERE client_id = ?1 AND day_id = ?2
            ",
        )
        .bind(client_id.to_string())
        .bind(day_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get progress: {e}")))?;

        row.map_or_else(
            || {
                Err(AppError::not_found(format!(
                    "no progress for client {client_id} on day {day_id}"
                )))
            },
            |row| row_to_progress(&row),
        )
    }

    /// Per-program progress view for a client, ordered by day number
    ///
    /// Every day of the program appears exactly once; days the client never
    /// reported on come back with both flags false and no completion
    /// timestamp. A program with zero days yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if a catalog or storage query fails.
    pub async fn get_program_progress(
        &self,
        client_id: Uuid,
        program_id: i64,
    ) -> AppResult<Vec<DayProgressEntry>> {
        let days = self.catalog.days_by_program(program_id).await?;
        if days.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r"
            SELECT id, client_id, day_id, food_completed, exercise_completed, completed_at
            FROM program_progress
            WHERE client_id = ?1
            ",
        )
        .bind(client_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list progress: {e}")))?;

        let mut by_day: HashMap<i64, DayProgress> = HashMap::with_capacity(rows.len());
        for row in &rows {
            let progress = row_to_progress(row)?;
            by_day.insert(progress.day_id, progress);
        }

        Ok(days
            .into_iter()
            .map(|day| {
                let progress = by_day.remove(&day.id);
                DayProgressEntry {
                    day_id: day.id,
                    day_number: day.day_number,
                    food_completed: progress.as_ref().is_some_and(|p| p.food_completed),
                    exercise_completed: progress.as_ref().is_some_and(|p| p.exercise_completed),
                    completed_at: progress.and_then(|p| p.completed_at),
                }
            })
            .collect())
    }
}
