// ABOUTME: Shared server resources and HTTP server assembly
// ABOUTME: All components are constructed once at startup and injected, no global state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

use crate::config::ServerConfig;
use crate::database::{
    AnalyticsAggregator, CatalogGateway, Database, InvitationManager, ProgressTracker,
};
use crate::errors::{AppError, AppResult};
use crate::routes::analytics::AnalyticsRoutes;
use crate::routes::catalog::CatalogRoutes;
use crate::routes::invitations::InvitationRoutes;
use crate::routes::progress::ProgressRoutes;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared resources handed to every route module
pub struct ServerResources {
    /// Storage and catalog owner
    pub database: Arc<Database>,
    /// Catalog read contract used by the core components
    pub catalog: Arc<dyn CatalogGateway>,
    /// Invitation lifecycle
    pub invitations: InvitationManager,
    /// Completion tracking
    pub progress: ProgressTracker,
    /// Trainer rollups
    pub analytics: AnalyticsAggregator,
    /// Loaded configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Wire all components over one shared pool
    #[must_use]
    pub fn new(database: Database, config: ServerConfig) -> Self {
        let database = Arc::new(database);
        let catalog: Arc<dyn CatalogGateway> = database.clone();
        let pool = database.pool().clone();
        Self {
            invitations: InvitationManager::new(pool.clone(), catalog.clone()),
            progress: ProgressTracker::new(pool.clone(), catalog.clone()),
            analytics: AnalyticsAggregator::new(pool, catalog.clone()),
            database,
            catalog,
            config,
        }
    }
}

/// Build the complete application router
#[must_use]
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(CatalogRoutes::routes(resources.clone()))
        .merge(ProgressRoutes::routes(resources.clone()))
        .merge(InvitationRoutes::routes(resources.clone()))
        .merge(AnalyticsRoutes::routes(resources.clone()))
        .layer(TraceLayer::new_for_http())
}

/// Bind the HTTP listener and serve until shutdown
///
/// # Errors
///
/// Returns an error if binding or serving fails.
pub async fn serve(resources: Arc<ServerResources>) -> AppResult<()> {
    let addr = format!("0.0.0.0:{}", resources.config.http_port);
    let router = build_router(&resources);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!("HTTP server listening on {addr}");

    axum::serve(listener, router)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}
