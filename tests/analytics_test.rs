// ABOUTME: Integration tests for trainer analytics rollups
// ABOUTME: Covers ratio arithmetic, completed-client counting, and empty-state tolerance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use uuid::Uuid;

#[tokio::test]
async fn rollup_counts_ratios_and_completed_clients() {
    let resources = common::test_resources().await;
    let trainer = Uuid::new_v4();
    let (_, days_a) = common::seed_program(&resources.database, trainer, 2).await;
    let (_, days_b) = common::seed_program(&resources.database, trainer, 2).await;

    let all_days: Vec<i64> = days_a.iter().chain(days_b.iter()).map(|d| d.id).collect();

    // Client one tracks all four days but completes only three
    let client_one = Uuid::new_v4();
    for (i, day_id) in all_days.iter().enumerate() {
        if i < 3 {
            resources
                .progress
                .mark_day_completed(client_one, *day_id)
                .await
                .unwrap();
        } else {
            resources
                .progress
                .mark_food_completed(client_one, *day_id)
                .await
                .unwrap();
        }
    }

    // Client two completes all four
    let client_two = Uuid::new_v4();
    for day_id in &all_days {
        resources
            .progress
            .mark_day_completed(client_two, *day_id)
            .await
            .unwrap();
    }

    let analytics = resources.analytics.trainer_analytics(trainer).await.unwrap();

    assert_eq!(analytics.program_count, 2);
    assert_eq!(analytics.client_count, 2);
    assert_eq!(analytics.completed_clients, 1);
    assert!((analytics.average_progress - 0.875).abs() < 1e-9);

    let one = analytics
        .clients_progress
        .iter()
        .find(|c| c.client_id == client_one)
        .unwrap();
    assert_eq!(one.completed_days, 3);
    assert_eq!(one.total_days, 4);
    assert!((one.progress - 0.75).abs() < 1e-9);

    let two = analytics
        .clients_progress
        .iter()
        .find(|c| c.client_id == client_two)
        .unwrap();
    assert!((two.progress - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn trainer_with_no_programs_gets_all_zero_analytics() {
    let resources = common::test_resources().await;
    let analytics = resources
        .analytics
        .trainer_analytics(Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(analytics.program_count, 0);
    assert_eq!(analytics.client_count, 0);
    assert_eq!(analytics.completed_clients, 0);
    assert!(analytics.average_progress.abs() < f64::EPSILON);
    assert!(analytics.clients_progress.is_empty());
}

#[tokio::test]
async fn trainer_with_programs_but_no_clients_gets_zero_client_stats() {
    let resources = common::test_resources().await;
    let trainer = Uuid::new_v4();
    common::seed_program(&resources.database, trainer, 3).await;

    let analytics = resources.analytics.trainer_analytics(trainer).await.unwrap();

    assert_eq!(analytics.program_count, 1);
    assert_eq!(analytics.client_count, 0);
    assert!(analytics.average_progress.abs() < f64::EPSILON);
}

#[tokio::test]
async fn rollup_ignores_other_trainers_programs() {
    let resources = common::test_resources().await;
    let trainer = Uuid::new_v4();
    let other = Uuid::new_v4();
    common::seed_program(&resources.database, trainer, 1).await;
    let (_, other_days) = common::seed_program(&resources.database, other, 1).await;

    // Activity under the other trainer must not leak into this rollup
    resources
        .progress
        .mark_day_completed(Uuid::new_v4(), other_days[0].id)
        .await
        .unwrap();

    let analytics = resources.analytics.trainer_analytics(trainer).await.unwrap();
    assert_eq!(analytics.program_count, 1);
    assert_eq!(analytics.client_count, 0);
}
