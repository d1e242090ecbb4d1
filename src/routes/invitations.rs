// ABOUTME: Invitation lifecycle route handlers - create, accept, amend access, preview
// ABOUTME: Acceptance binds the invitation to the authenticated caller, never a body-supplied id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

use crate::auth::CallerIdentity;
use crate::errors::AppError;
use crate::server::ServerResources;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Body of `POST /program/invite`
#[derive(Debug, Deserialize)]
pub struct CreateInviteRequest {
    /// Target program
    pub program_id: i64,
    /// Invitee email
    pub email: String,
    /// Message shown to the invitee
    #[serde(default)]
    pub message: String,
    /// Requested access window in days
    pub access_days: i64,
}

/// Body of `POST /program/invite/accept`
#[derive(Debug, Deserialize)]
pub struct AcceptInviteRequest {
    /// Invitation token
    pub token: String,
}

/// Body of `PUT /program/:program_id/client/:client_id/access`
#[derive(Debug, Deserialize)]
pub struct AmendAccessRequest {
    /// New access window in days
    pub access_days: i64,
}

/// Query string of `GET /program/invite/preview`
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    /// Invitation token
    pub token: String,
}

/// Invitation routes
pub struct InvitationRoutes;

impl InvitationRoutes {
    /// Create all invitation routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/program/invite", post(Self::handle_create))
            .route("/program/invite/accept", post(Self::handle_accept))
            .route(
                "/program/:program_id/client/:client_id/access",
                put(Self::handle_amend_access),
            )
            .route("/program/invite/preview", get(Self::handle_preview))
            .with_state(resources)
    }

    /// `POST /program/invite` - trainer invites a client to a program
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        identity: CallerIdentity,
        Json(req): Json<CreateInviteRequest>,
    ) -> Result<Response, AppError> {
        identity.require_trainer()?;
        let invitation = resources
            .invitations
            .create_invitation(req.program_id, &req.email, &req.message, req.access_days)
            .await?;
        Ok((StatusCode::CREATED, Json(invitation)).into_response())
    }

    /// `POST /program/invite/accept` - redeem a token as the calling client
    async fn handle_accept(
        State(resources): State<Arc<ServerResources>>,
        identity: CallerIdentity,
        Json(req): Json<AcceptInviteRequest>,
    ) -> Result<Response, AppError> {
        let invitation = resources
            .invitations
            .redeem_invitation(&req.token, identity.user_id)
            .await?;
        Ok(Json(invitation).into_response())
    }

    /// `PUT /program/:program_id/client/:client_id/access` - amend duration
    async fn handle_amend_access(
        State(resources): State<Arc<ServerResources>>,
        identity: CallerIdentity,
        Path((program_id, client_id)): Path<(i64, Uuid)>,
        Json(req): Json<AmendAccessRequest>,
    ) -> Result<Response, AppError> {
        identity.require_trainer()?;
        let invitation = resources
            .invitations
            .amend_access_duration(program_id, client_id, req.access_days)
            .await?;
        Ok(Json(invitation).into_response())
    }

    /// `GET /program/invite/preview?token=` - unauthenticated program preview
    ///
    /// Deliberately ignores expiry; see `InvitationManager::program_from_token`.
    async fn handle_preview(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<PreviewQuery>,
    ) -> Result<Response, AppError> {
        let program = resources.invitations.program_from_token(&query.token).await?;
        Ok(Json(program).into_response())
    }
}
