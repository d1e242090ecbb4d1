// ABOUTME: Day catalog route handlers - day CRUD, day detail, transactional program deletion
// ABOUTME: All mutation endpoints require the trainer capability
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

use crate::auth::CallerIdentity;
use crate::database::NewDay;
use crate::errors::AppError;
use crate::server::ServerResources;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use std::sync::Arc;

/// Day catalog routes
pub struct CatalogRoutes;

impl CatalogRoutes {
    /// Create all catalog routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/program/day", post(Self::handle_create_day))
            .route("/program/day/:id", put(Self::handle_update_day))
            .route("/program/day/:id", delete(Self::handle_delete_day))
            .route(
                "/program/:program_id/day/:day",
                get(Self::handle_day_details),
            )
            .route("/program/:program_id/days", get(Self::handle_days))
            .route("/program/:program_id", delete(Self::handle_delete_program))
            .with_state(resources)
    }

    /// `POST /program/day` - create a day referencing existing catalog rows
    async fn handle_create_day(
        State(resources): State<Arc<ServerResources>>,
        identity: CallerIdentity,
        Json(input): Json<NewDay>,
    ) -> Result<Response, AppError> {
        identity.require_trainer()?;
        let day = resources.database.create_day(&input).await?;
        Ok((StatusCode::CREATED, Json(day)).into_response())
    }

    /// `PUT /program/day/:id` - edit a day, re-validating references
    async fn handle_update_day(
        State(resources): State<Arc<ServerResources>>,
        identity: CallerIdentity,
        Path(day_id): Path<i64>,
        Json(input): Json<NewDay>,
    ) -> Result<Response, AppError> {
        identity.require_trainer()?;
        let day = resources.database.update_day(day_id, &input).await?;
        Ok(Json(day).into_response())
    }

    /// `DELETE /program/day/:id`
    async fn handle_delete_day(
        State(resources): State<Arc<ServerResources>>,
        identity: CallerIdentity,
        Path(day_id): Path<i64>,
    ) -> Result<Response, AppError> {
        identity.require_trainer()?;
        resources.database.delete_day(day_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// `GET /program/:program_id/day/:day` - day detail by day number
    async fn handle_day_details(
        State(resources): State<Arc<ServerResources>>,
        identity: CallerIdentity,
        Path((program_id, day_number)): Path<(i64, i64)>,
    ) -> Result<Response, AppError> {
        identity.require_trainer()?;
        let details = resources
            .database
            .get_day_details(program_id, day_number)
            .await?;
        Ok(Json(details).into_response())
    }

    /// `GET /program/:program_id/days` - all days with detail, in day order
    async fn handle_days(
        State(resources): State<Arc<ServerResources>>,
        identity: CallerIdentity,
        Path(program_id): Path<i64>,
    ) -> Result<Response, AppError> {
        identity.require_trainer()?;
        let days = resources.database.days_with_details(program_id).await?;
        Ok(Json(days).into_response())
    }

    /// `DELETE /program/:program_id` - remove a program and its days atomically
    async fn handle_delete_program(
        State(resources): State<Arc<ServerResources>>,
        identity: CallerIdentity,
        Path(program_id): Path<i64>,
    ) -> Result<Response, AppError> {
        identity.require_trainer()?;
        resources.database.delete_program(program_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
