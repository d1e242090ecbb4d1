// ABOUTME: Completion reporting and progress query route handlers
// ABOUTME: Reports upsert a single row per (client, day); queries never invent rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

use crate::auth::CallerIdentity;
use crate::errors::AppError;
use crate::server::ServerResources;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Body of the three completion-report endpoints
#[derive(Debug, Deserialize)]
pub struct CompletionReport {
    /// Reporting client
    pub client_id: Uuid,
    /// Day the report attaches to
    pub day_id: i64,
}

/// Query string of `GET /program/day/progress`
#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    /// Reporting client
    pub client_id: Uuid,
    /// Day to look up
    pub day_id: i64,
}

/// Query string of `GET /program/:program_id/progress`
#[derive(Debug, Deserialize)]
pub struct ProgramProgressQuery {
    /// Client whose view to derive
    pub client_id: Uuid,
}

/// Progress reporting and query routes
pub struct ProgressRoutes;

impl ProgressRoutes {
    /// Create all progress routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/program/day/complete", post(Self::handle_complete_day))
            .route("/program/day/food", post(Self::handle_complete_food))
            .route(
                "/program/day/exercise",
                post(Self::handle_complete_exercise),
            )
            .route("/program/day/progress", get(Self::handle_progress_status))
            .route(
                "/program/:program_id/progress",
                get(Self::handle_program_progress),
            )
            .with_state(resources)
    }

    /// `POST /program/day/complete` - mark a whole day done
    async fn handle_complete_day(
        State(resources): State<Arc<ServerResources>>,
        _identity: CallerIdentity,
        Json(report): Json<CompletionReport>,
    ) -> Result<Response, AppError> {
        let progress = resources
            .progress
            .mark_day_completed(report.client_id, report.day_id)
            .await?;
        Ok((StatusCode::CREATED, Json(progress)).into_response())
    }

    /// `POST /program/day/food` - check off the food sub-task
    async fn handle_complete_food(
        State(resources): State<Arc<ServerResources>>,
        _identity: CallerIdentity,
        Json(report): Json<CompletionReport>,
    ) -> Result<Response, AppError> {
        let progress = resources
            .progress
            .mark_food_completed(report.client_id, report.day_id)
            .await?;
        Ok(Json(progress).into_response())
    }

    /// `POST /program/day/exercise` - check off the exercise sub-task
    async fn handle_complete_exercise(
        State(resources): State<Arc<ServerResources>>,
        _identity: CallerIdentity,
        Json(report): Json<CompletionReport>,
    ) -> Result<Response, AppError> {
        let progress = resources
            .progress
            .mark_exercise_completed(report.client_id, report.day_id)
            .await?;
        Ok(Json(progress).into_response())
    }

    /// `GET /program/day/progress?client_id&day_id`
    async fn handle_progress_status(
        State(resources): State<Arc<ServerResources>>,
        _identity: CallerIdentity,
        Query(query): Query<ProgressQuery>,
    ) -> Result<Response, AppError> {
        let progress = resources
            .progress
            .get_progress(query.client_id, query.day_id)
            .await?;
        Ok(Json(progress).into_response())
    }

    /// `GET /program/:program_id/progress?client_id` - left-joined day view
    async fn handle_program_progress(
        State(resources): State<Arc<ServerResources>>,
        _identity: CallerIdentity,
        Path(program_id): Path<i64>,
        Query(query): Query<ProgramProgressQuery>,
    ) -> Result<Response, AppError> {
        let view = resources
            .progress
            .get_program_progress(query.client_id, program_id)
            .await?;
        Ok(Json(view).into_response())
    }
}
