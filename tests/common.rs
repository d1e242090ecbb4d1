// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory database, resource wiring, and catalog seeding helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs, dead_code)]

use coachtrack::config::ServerConfig;
use coachtrack::database::{Database, NewDay, NewExercise, NewFood, NewProgram};
use coachtrack::models::{Day, Program};
use coachtrack::server::ServerResources;
use std::sync::Arc;
use uuid::Uuid;

/// Fresh in-memory database with the schema applied
pub async fn test_database() -> Database {
    Database::new("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

/// Fresh resources over an in-memory database
pub async fn test_resources() -> Arc<ServerResources> {
    let database = test_database().await;
    let config = ServerConfig {
        http_port: 0,
        database_url: "sqlite::memory:".into(),
    };
    Arc::new(ServerResources::new(database, config))
}

/// Create a program owned by `trainer_id` with `day_count` consecutive days,
/// each referencing one fresh exercise and one fresh food record
pub async fn seed_program(db: &Database, trainer_id: Uuid, day_count: i64) -> (Program, Vec<Day>) {
    let program = db
        .create_program(&NewProgram {
            trainer_id,
            name: format!("program-{}", Uuid::new_v4()),
            days: day_count,
            description: "test program".into(),
        })
        .await
        .expect("Failed to create program");

    let mut days = Vec::new();
    for day_number in 1..=day_count {
        days.push(seed_day(db, program.id, day_number).await);
    }
    (program, days)
}

/// Create one day plus the exercise and food it references
pub async fn seed_day(db: &Database, program_id: i64, day_number: i64) -> Day {
    let exercise = db
        .create_exercise(&NewExercise {
            name: format!("squats-{day_number}"),
            description: "back squats".into(),
            sets: 3,
            repetitions: 10,
        })
        .await
        .expect("Failed to create exercise");

    let food = db
        .create_food(&NewFood {
            name: format!("oats-{day_number}"),
            description: "oats with berries".into(),
            calories: 350.0,
            protein: 12.0,
            fats: 6.0,
            carbohydrates: 60.0,
        })
        .await
        .expect("Failed to create food");

    db.create_day(&NewDay {
        program_id,
        day_number,
        exercise_id: exercise.id,
        food_id: food.id,
        note: String::new(),
    })
    .await
    .expect("Failed to create day")
}
