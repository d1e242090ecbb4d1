// ABOUTME: Core database management with schema setup for SQLite
// ABOUTME: Owns the connection pool and the row/timestamp conversion helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

/// Trainer analytics aggregation
pub mod analytics;
/// Catalog gateway contract and SQLite implementation
pub mod catalog;
/// Program invitation lifecycle
pub mod invitations;
/// Per-(client, day) progress tracking
pub mod progress;

pub use analytics::AnalyticsAggregator;
pub use catalog::{CatalogGateway, NewDay, NewExercise, NewFood, NewProgram};
pub use invitations::InvitationManager;
pub use progress::ProgressTracker;

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;
use tracing::info;

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and run schema setup
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails, or
    /// schema setup fails.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains(":memory:")
            && !database_url.contains('?')
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create all tables if they do not exist yet
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails.
    pub async fn migrate(&self) -> AppResult<()> {
        info!("Running database migrations...");

        let statements = [
            r"
            CREATE TABLE IF NOT EXISTS programs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                trainer_id TEXT NOT NULL,
                name TEXT NOT NULL,
                days INTEGER NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS exercises (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                sets INTEGER NOT NULL,
                repetitions INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS foods (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                calories REAL NOT NULL,
                protein REAL NOT NULL,
                fats REAL NOT NULL,
                carbohydrates REAL NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS days (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                program_id INTEGER NOT NULL REFERENCES programs(id),
                day_number INTEGER NOT NULL,
                exercise_id INTEGER NOT NULL REFERENCES exercises(id),
                food_id INTEGER NOT NULL REFERENCES foods(id),
                note TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT,
                UNIQUE(program_id, day_number)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS program_invitations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                program_id INTEGER NOT NULL,
                email TEXT NOT NULL,
                message TEXT NOT NULL DEFAULT '',
                access_days INTEGER NOT NULL,
                token TEXT NOT NULL UNIQUE,
                client_id TEXT,
                accepted_at TEXT,
                access_expires TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS program_progress (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                client_id TEXT NOT NULL,
                day_id INTEGER NOT NULL,
                food_completed INTEGER NOT NULL DEFAULT 0,
                exercise_completed INTEGER NOT NULL DEFAULT 0,
                completed_at TEXT,
                UNIQUE(client_id, day_id)
            )
            ",
            r"
            CREATE INDEX IF NOT EXISTS idx_days_program ON days(program_id, day_number)
            ",
            r"
            CREATE INDEX IF NOT EXISTS idx_progress_client ON program_progress(client_id)
            ",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }
}

/// Format a timestamp for storage: RFC 3339, UTC, whole seconds
///
/// Whole-second precision keeps stored values identical to the expiry
/// timestamps SQLite computes with `strftime` inside conditional updates.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a stored RFC 3339 timestamp
///
/// # Errors
///
/// Returns `Database` when the stored text is not valid RFC 3339.
pub fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid stored timestamp {raw:?}: {e}")))
}

/// Parse an optional stored timestamp column
///
/// # Errors
///
/// Returns `Database` when a present value is not valid RFC 3339.
pub fn parse_timestamp_opt(raw: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    raw.map(parse_timestamp).transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_round_trip_at_second_precision() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 45).unwrap();
        let stored = format_timestamp(ts);
        assert_eq!(stored, "2024-01-01T12:30:45Z");
        assert_eq!(parse_timestamp(&stored).unwrap(), ts);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
    }
}
