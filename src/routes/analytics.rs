// ABOUTME: Trainer analytics route handler
// ABOUTME: The rollup is always computed for the authenticated trainer, never an arbitrary id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

use crate::auth::CallerIdentity;
use crate::errors::AppError;
use crate::server::ServerResources;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

/// Analytics routes
pub struct AnalyticsRoutes;

impl AnalyticsRoutes {
    /// Create all analytics routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/trainer-analytics", get(Self::handle_trainer_analytics))
            .with_state(resources)
    }

    /// `GET /trainer-analytics` - rollup for the calling trainer
    async fn handle_trainer_analytics(
        State(resources): State<Arc<ServerResources>>,
        identity: CallerIdentity,
    ) -> Result<Response, AppError> {
        identity.require_trainer()?;
        let analytics = resources
            .analytics
            .trainer_analytics(identity.user_id)
            .await?;
        Ok(Json(analytics).into_response())
    }
}
