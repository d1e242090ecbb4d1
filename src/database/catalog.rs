// ABOUTME: Catalog gateway contract plus the SQLite implementation
// ABOUTME: Owns program/day/exercise/food records, existence checks, and transactional deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

use super::{format_timestamp, parse_timestamp, parse_timestamp_opt, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{Day, DayDetails, Exercise, Food, Program};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

/// Read contract the invitation and progress components depend on
///
/// Kept as a trait so core tests can substitute an in-memory fake instead
/// of inlining existence queries at every call site.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Does a program with this id exist
    async fn program_exists(&self, program_id: i64) -> AppResult<bool>;
    /// Does an exercise with this id exist
    async fn exercise_exists(&self, exercise_id: i64) -> AppResult<bool>;
    /// Does a food record with this id exist
    async fn food_exists(&self, food_id: i64) -> AppResult<bool>;
    /// Does a day with this id exist
    async fn day_exists(&self, day_id: i64) -> AppResult<bool>;
    /// Fetch a program's public record
    async fn get_program(&self, program_id: i64) -> AppResult<Option<Program>>;
    /// All days of a program, ordered by day number ascending
    async fn days_by_program(&self, program_id: i64) -> AppResult<Vec<Day>>;
    /// Number of programs owned by a trainer
    async fn program_count_by_trainer(&self, trainer_id: Uuid) -> AppResult<i64>;
}

/// Input for creating a program
#[derive(Debug, Clone, Deserialize)]
pub struct NewProgram {
    /// Owning trainer
    pub trainer_id: Uuid,
    /// Display name
    pub name: String,
    /// Planned length in days
    pub days: i64,
    /// Free-text description
    #[serde(default)]
    pub description: String,
}

/// Input for creating an exercise
#[derive(Debug, Clone, Deserialize)]
pub struct NewExercise {
    /// Display name
    pub name: String,
    /// Instructions
    #[serde(default)]
    pub description: String,
    /// Number of sets
    pub sets: i64,
    /// Repetitions per set
    pub repetitions: i64,
}

/// Input for creating a food record
#[derive(Debug, Clone, Deserialize)]
pub struct NewFood {
    /// Display name
    pub name: String,
    /// Preparation notes
    #[serde(default)]
    pub description: String,
    /// Energy in kcal
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Fats in grams
    pub fats: f64,
    /// Carbohydrates in grams
    pub carbohydrates: f64,
}

/// Input for creating or updating a day
#[derive(Debug, Clone, Deserialize)]
pub struct NewDay {
    /// Owning program
    pub program_id: i64,
    /// Position within the program, 1-based
    pub day_number: i64,
    /// Referenced exercise
    pub exercise_id: i64,
    /// Referenced food record
    pub food_id: i64,
    /// Trainer note
    #[serde(default)]
    pub note: String,
}

fn row_to_program(row: &SqliteRow) -> AppResult<Program> {
    let trainer_id: String = row.get("trainer_id");
    let created_at: String = row.get("created_at");
    let updated_at: Option<String> = row.get("updated_at");
    Ok(Program {
        id: row.get("id"),
        trainer_id: Uuid::parse_str(&trainer_id)
            .map_err(|e| AppError::database(format!("Invalid trainer_id in programs: {e}")))?,
        name: row.get("name"),
        days: row.get("days"),
        description: row.get("description"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp_opt(updated_at.as_deref())?,
    })
}

fn row_to_day(row: &SqliteRow) -> AppResult<Day> {
    let created_at: String = row.get("created_at");
    let updated_at: Option<String> = row.get("updated_at");
    Ok(Day {
        id: row.get("id"),
        program_id: row.get("program_id"),
        day_number: row.get("day_number"),
        exercise_id: row.get("exercise_id"),
        food_id: row.get("food_id"),
        note: row.get("note"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp_opt(updated_at.as_deref())?,
    })
}

fn row_to_exercise(row: &SqliteRow) -> AppResult<Exercise> {
    let created_at: String = row.get("created_at");
    let updated_at: Option<String> = row.get("updated_at");
    Ok(Exercise {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        sets: row.get("sets"),
        repetitions: row.get("repetitions"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp_opt(updated_at.as_deref())?,
    })
}

fn row_to_food(row: &SqliteRow) -> AppResult<Food> {
    let created_at: String = row.get("created_at");
    let updated_at: Option<String> = row.get("updated_at");
    Ok(Food {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        calories: row.get("calories"),
        protein: row.get("protein"),
        fats: row.get("fats"),
        carbohydrates: row.get("carbohydrates"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp_opt(updated_at.as_deref())?,
    })
}

impl Database {
    /// Create a program
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_program(&self, input: &NewProgram) -> AppResult<Program> {
        let now = format_timestamp(Utc::now());
        let row = sqlx::query(
            r"
            INSERT INTO programs (trainer_id, name, days, description, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            ",
        )
        .bind(input.trainer_id.to_string())
        .bind(&input.name)
        .bind(input.days)
        .bind(&input.description)
        .bind(&now)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create program: {e}")))?;

        Ok(Program {
            id: row.get("id"),
            trainer_id: input.trainer_id,
            name: input.name.clone(),
            days: input.days,
            description: input.description.clone(),
            created_at: parse_timestamp(&now)?,
            updated_at: None,
        })
    }

    /// Create an exercise
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_exercise(&self, input: &NewExercise) -> AppResult<Exercise> {
        let now = format_timestamp(Utc::now());
        let row = sqlx::query(
            r"
            INSERT INTO exercises (name, description, sets, repetitions, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id
            ",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.sets)
        .bind(input.repetitions)
        .bind(&now)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create exercise: {e}")))?;

        Ok(Exercise {
            id: row.get("id"),
            name: input.name.clone(),
            description: input.description.clone(),
            sets: input.sets,
            repetitions: input.repetitions,
            created_at: parse_timestamp(&now)?,
            updated_at: None,
        })
    }

    /// Create a food record
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_food(&self, input: &NewFood) -> AppResult<Food> {
        let now = format_timestamp(Utc::now());
        let row = sqlx::query(
            r"
            INSERT INTO foods (name, description, calories, protein, fats, carbohydrates, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id
            ",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.calories)
        .bind(input.protein)
        .bind(input.fats)
        .bind(input.carbohydrates)
        .bind(&now)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create food: {e}")))?;

        Ok(Food {
            id: row.get("id"),
            name: input.name.clone(),
            description: input.description.clone(),
            calories: input.calories,
            protein: input.protein,
            fats: input.fats,
            carbohydrates: input.carbohydrates,
            created_at: parse_timestamp(&now)?,
            updated_at: None,
        })
    }

    /// Validate that every catalog reference on a day input exists
    async fn validate_day_references(&self, input: &NewDay) -> AppResult<()> {
        if !self.program_exists(input.program_id).await? {
            return Err(AppError::invalid_input(format!(
                "program {} does not exist",
                input.program_id
            )));
        }
        if !self.exercise_exists(input.exercise_id).await? {
            return Err(AppError::invalid_input(format!(
                "exercise {} does not exist",
                input.exercise_id
            )));
        }
        if !self.food_exists(input.food_id).await? {
            return Err(AppError::invalid_input(format!(
                "food {} does not exist",
                input.food_id
            )));
        }
        Ok(())
    }

    /// Create a day after validating its program/exercise/food references
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when a referenced id is absent.
    pub async fn create_day(&self, input: &NewDay) -> AppResult<Day> {
        self.validate_day_references(input).await?;

        let now = format_timestamp(Utc::now());
        let row = sqlx::query(
            r"
            INSERT INTO days (program_id, day_number, exercise_id, food_id, note, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id
            ",
        )
        .bind(input.program_id)
        .bind(input.day_number)
        .bind(input.exercise_id)
        .bind(input.food_id)
        .bind(&input.note)
        .bind(&now)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to create day: {e}")))?;

        Ok(Day {
            id: row.get("id"),
            program_id: input.program_id,
            day_number: input.day_number,
            exercise_id: input.exercise_id,
            food_id: input.food_id,
            note: input.note.clone(),
            created_at: parse_timestamp(&now)?,
            updated_at: None,
        })
    }

    /// Update a day, re-validating its references
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing day id, `InvalidInput` for a bad
    /// reference.
    pub async fn update_day(&self, day_id: i64, input: &NewDay) -> AppResult<Day> {
        self.validate_day_references(input).await?;

        let now = format_timestamp(Utc::now());
        let row = sqlx::query(
            r"
            UPDATE days
            SET program_id = ?1, day_number = ?2, exercise_id = ?3, food_id = ?4,
                note = ?5, updated_at = ?6
            WHERE id = ?7
            RETURNING id, program_id, day_number, exercise_id, food_id, note,
                      created_at, updated_at
            ",
        )
        .bind(input.program_id)
        .bind(input.day_number)
        .bind(input.exercise_id)
        .bind(input.food_id)
        .bind(&input.note)
        .bind(&now)
        .bind(day_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to update day: {e}")))?;

        row.map_or_else(
            || Err(AppError::not_found(format!("day {day_id} not found"))),
            |row| row_to_day(&row),
        )
    }

    /// Delete a day by id
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the id is absent.
    pub async fn delete_day(&self, day_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM days WHERE id = ?1")
            .bind(day_id)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to delete day: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("day {day_id} not found")));
        }
        Ok(())
    }

    /// Delete a program and all of its days in one transaction
    ///
    /// A partial delete (days gone, program row still present, or the
    /// reverse) is never observable: any failure rolls back both.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the program id is absent.
    pub async fn delete_program(&self, program_id: i64) -> AppResult<()> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query("DELETE FROM days WHERE program_id = ?1")
            .bind(program_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete program days: {e}")))?;

        let result = sqlx::query("DELETE FROM programs WHERE id = ?1")
            .bind(program_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete program: {e}")))?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the day deletes
            return Err(AppError::not_found(format!(
                "program {program_id} not found"
            )));
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit program delete: {e}")))?;
        Ok(())
    }

    /// Resolve a (program, day number) pair to the day with its exercise
    /// and food records
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the pair is absent.
    pub async fn get_day_details(&self, program_id: i64, day_number: i64) -> AppResult<DayDetails> {
        let row = sqlx::query(
            r"
            SELECT id, program_id, day_number, exercise_id, food_id, note,
                   created_at, updated_at
            FROM days
            WHERE program_id = ?1 AND day_number = ?2
            ",
        )
        .bind(program_id)
        .bind(day_number)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get day: {e}")))?;

        let Some(row) = row else {
            return Err(AppError::not_found(format!(
                "day {day_number} of program {program_id} not found"
            )));
        };
        let day = row_to_day(&row)?;
        self.day_details_for(day).await
    }

    /// All days of a program with exercise and food detail, in day order
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub async fn days_with_details(&self, program_id: i64) -> AppResult<Vec<DayDetails>> {
        let days = self.days_by_program(program_id).await?;
        let mut details = Vec::with_capacity(days.len());
        for day in days {
            details.push(self.day_details_for(day).await?);
        }
        Ok(details)
    }

    async fn day_details_for(&self, day: Day) -> AppResult<DayDetails> {
        let exercise_row = sqlx::query(
            r"
            SELECT id, name, description, sets, repetitions, created_at, updated_at
            FROM exercises WHERE id = ?1
            ",
        )
        .bind(day.exercise_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get exercise: {e}")))?;

        let food_row = sqlx::query(
            r"
            SELECT id, name, description, calories, protein, fats, carbohydrates,
                   created_at, updated_at
            FROM foods WHERE id = ?1
            ",
        )
        .bind(day.food_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get food: {e}")))?;

        Ok(DayDetails {
            day,
            exercise: row_to_exercise(&exercise_row)?,
            food: row_to_food(&food_row)?,
        })
    }

    async fn id_exists(&self, table: &str, id: i64) -> AppResult<bool> {
        // Table names come from the fixed call sites below, never from input
        let query = format!("SELECT 1 FROM {table} WHERE id = ?1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed existence check on {table}: {e}")))?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl CatalogGateway for Database {
    async fn program_exists(&self, program_id: i64) -> AppResult<bool> {
        self.id_exists("programs", program_id).await
    }

    async fn exercise_exists(&self, exercise_id: i64) -> AppResult<bool> {
        self.id_exists("exercises", exercise_id).await
    }

    async fn food_exists(&self, food_id: i64) -> AppResult<bool> {
        self.id_exists("foods", food_id).await
    }

    async fn day_exists(&self, day_id: i64) -> AppResult<bool> {
        self.id_exists("days", day_id).await
    }

    async fn get_program(&self, program_id: i64) -> AppResult<Option<Program>> {
        let row = sqlx::query(
            r"
            SELECT id, trainer_id, name, days, description, created_at, updated_at
            FROM programs WHERE id = ?1
            ",
        )
        .bind(program_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get program: {e}")))?;

        row.map(|row| row_to_program(&row)).transpose()
    }

    async fn days_by_program(&self, program_id: i64) -> AppResult<Vec<Day>> {
        let rows = sqlx::query(
            r"
            SELECT id, program_id, day_number, exercise_id, food_id, note,
                   created_at, updated_at
            FROM days
            WHERE program_id = ?1
            ORDER BY day_number ASC
            ",
        )
        .bind(program_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to list days: {e}")))?;

        rows.iter().map(row_to_day).collect()
    }

    async fn program_count_by_trainer(&self, trainer_id: Uuid) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM programs WHERE trainer_id = ?1")
            .bind(trainer_id.to_string())
            .fetch_one(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to count programs: {e}")))?;
        Ok(row.get("n"))
    }
}
