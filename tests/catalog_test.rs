// ABOUTME: Integration tests for the day catalog and transactional program deletion
// ABOUTME: Covers reference validation, day detail, day ordering, and rollback behavior
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use coachtrack::database::{CatalogGateway, NewDay};
use coachtrack::errors::AppError;
use sqlx::Row;
use uuid::Uuid;

#[tokio::test]
async fn day_creation_validates_every_reference() {
    let db = common::test_database().await;
    let (program, days) = common::seed_program(&db, Uuid::new_v4(), 1).await;

    let bad_program = NewDay {
        program_id: 9999,
        day_number: 2,
        exercise_id: days[0].exercise_id,
        food_id: days[0].food_id,
        note: String::new(),
    };
    assert!(matches!(
        db.create_day(&bad_program).await.unwrap_err(),
        AppError::InvalidInput(_)
    ));

    let bad_exercise = NewDay {
        program_id: program.id,
        day_number: 2,
        exercise_id: 9999,
        food_id: days[0].food_id,
        note: String::new(),
    };
    assert!(matches!(
        db.create_day(&bad_exercise).await.unwrap_err(),
        AppError::InvalidInput(_)
    ));

    let bad_food = NewDay {
        program_id: program.id,
        day_number: 2,
        exercise_id: days[0].exercise_id,
        food_id: 9999,
        note: String::new(),
    };
    assert!(matches!(
        db.create_day(&bad_food).await.unwrap_err(),
        AppError::InvalidInput(_)
    ));
}

#[tokio::test]
async fn updating_a_missing_day_is_not_found() {
    let db = common::test_database().await;
    let (program, days) = common::seed_program(&db, Uuid::new_v4(), 1).await;

    let input = NewDay {
        program_id: program.id,
        day_number: 1,
        exercise_id: days[0].exercise_id,
        food_id: days[0].food_id,
        note: "updated".into(),
    };
    assert!(matches!(
        db.update_day(9999, &input).await.unwrap_err(),
        AppError::NotFound(_)
    ));

    let updated = db.update_day(days[0].id, &input).await.unwrap();
    assert_eq!(updated.note, "updated");
    assert!(updated.updated_at.is_some());
}

#[tokio::test]
async fn deleting_a_day_twice_is_not_found() {
    let db = common::test_database().await;
    let (_, days) = common::seed_program(&db, Uuid::new_v4(), 1).await;

    db.delete_day(days[0].id).await.unwrap();
    assert!(matches!(
        db.delete_day(days[0].id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn day_details_resolve_by_program_and_number() {
    let db = common::test_database().await;
    let (program, days) = common::seed_program(&db, Uuid::new_v4(), 2).await;

    let details = db.get_day_details(program.id, 2).await.unwrap();
    assert_eq!(details.day.id, days[1].id);
    assert_eq!(details.exercise.id, days[1].exercise_id);
    assert_eq!(details.food.id, days[1].food_id);

    assert!(matches!(
        db.get_day_details(program.id, 3).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn days_listing_is_ordered_by_day_number() {
    let db = common::test_database().await;
    let (program, _) = common::seed_program(&db, Uuid::new_v4(), 4).await;

    let listed = db.days_by_program(program.id).await.unwrap();
    let numbers: Vec<i64> = listed.iter().map(|d| d.day_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);

    let detailed = db.days_with_details(program.id).await.unwrap();
    assert_eq!(detailed.len(), 4);
    assert_eq!(detailed[0].day.day_number, 1);
}

#[tokio::test]
async fn program_deletion_removes_days_in_one_transaction() {
    let db = common::test_database().await;
    let trainer = Uuid::new_v4();
    let (program, _) = common::seed_program(&db, trainer, 3).await;
    let (kept, _) = common::seed_program(&db, trainer, 2).await;

    db.delete_program(program.id).await.unwrap();

    assert!(db.get_program(program.id).await.unwrap().is_none());
    assert!(db.days_by_program(program.id).await.unwrap().is_empty());
    // Unrelated programs keep their days
    assert_eq!(db.days_by_program(kept.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn failed_program_deletion_rolls_back_day_deletes() {
    let db = common::test_database().await;

    // Orphan day rows for a program id that has no program row: the delete
    // must report NotFound and leave them untouched rather than half-delete.
    let (_, days) = common::seed_program(&db, Uuid::new_v4(), 1).await;
    sqlx::query("UPDATE days SET program_id = 4242 WHERE id = ?1")
        .bind(days[0].id)
        .execute(db.pool())
        .await
        .unwrap();

    assert!(matches!(
        db.delete_program(4242).await.unwrap_err(),
        AppError::NotFound(_)
    ));

    let row = sqlx::query("SELECT COUNT(*) AS n FROM days WHERE program_id = 4242")
        .fetch_one(db.pool())
        .await
        .unwrap();
    let count: i64 = row.get("n");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn existence_checks_cover_all_catalog_tables() {
    let db = common::test_database().await;
    let (program, days) = common::seed_program(&db, Uuid::new_v4(), 1).await;

    assert!(db.program_exists(program.id).await.unwrap());
    assert!(db.day_exists(days[0].id).await.unwrap());
    assert!(db.exercise_exists(days[0].exercise_id).await.unwrap());
    assert!(db.food_exists(days[0].food_id).await.unwrap());

    assert!(!db.program_exists(9999).await.unwrap());
    assert!(!db.day_exists(9999).await.unwrap());
}

#[tokio::test]
async fn program_count_is_per_trainer() {
    let db = common::test_database().await;
    let trainer = Uuid::new_v4();
    common::seed_program(&db, trainer, 1).await;
    common::seed_program(&db, trainer, 1).await;
    common::seed_program(&db, Uuid::new_v4(), 1).await;

    assert_eq!(db.program_count_by_trainer(trainer).await.unwrap(), 2);
}

#[tokio::test]
async fn file_backed_database_is_created_on_first_connect() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coachtrack.db");
    let url = format!("sqlite:{}", path.display());

    let db = coachtrack::database::Database::new(&url).await.unwrap();
    common::seed_program(&db, Uuid::new_v4(), 1).await;

    assert!(path.exists());
}
