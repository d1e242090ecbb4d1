// ABOUTME: Trainer-facing analytics rollups computed from progress rows
// ABOUTME: Pure read aggregation - tolerates trainers with zero programs or clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

use super::catalog::CatalogGateway;
use crate::errors::{AppError, AppResult};
use crate::models::{ClientProgress, TrainerAnalytics};
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

/// Aggregates progress data into per-trainer statistics
pub struct AnalyticsAggregator {
    pool: SqlitePool,
    catalog: Arc<dyn CatalogGateway>,
}

impl AnalyticsAggregator {
    /// Create a new aggregator over the shared pool
    #[must_use]
    pub fn new(pool: SqlitePool, catalog: Arc<dyn CatalogGateway>) -> Self {
        Self { pool, catalog }
    }

    /// Compute the analytics rollup for one trainer
    ///
    /// Per-client ratio is `completed_days / total_days` over the days the
    /// client has tracked under this trainer's programs (0 when nothing is
    /// tracked). Clients at exactly 1.0 count as completed; the average is
    /// the arithmetic mean of the ratios, 0 when there are no clients.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage query fails.
    pub async fn trainer_analytics(&self, trainer_id: Uuid) -> AppResult<TrainerAnalytics> {
        let program_count = self.catalog.program_count_by_trainer(trainer_id).await?;

        let rows = sqlx::query(
            r"
            SELECT p.client_id,
                   SUM(CASE WHEN p.completed_at IS NOT NULL THEN 1 ELSE 0 END) AS completed_days,
                   COUNT(d.id) AS total_days
            FROM program_progress p
            JOIN days d ON p.day_id = d.id
            JOIN programs wp ON d.program_id = wp.id
            WHERE wp.trainer_id = ?1
            GROUP BY p.client_id
            ORDER BY p.client_id
            ",
        )
        .bind(trainer_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to aggregate progress: {e}")))?;

        let mut clients_progress = Vec::with_capacity(rows.len());
        let mut completed_clients = 0_i64;
        let mut progress_sum = 0.0_f64;

        for row in rows {
            let client_id: String = row.get("client_id");
            let client_id = Uuid::parse_str(&client_id)
                .map_err(|e| AppError::database(format!("Invalid client_id in progress: {e}")))?;
            let completed_days: i64 = row.get("completed_days");
            let total_days: i64 = row.get("total_days");

            let progress = if total_days > 0 {
                completed_days as f64 / total_days as f64
            } else {
                0.0
            };
            if (progress - 1.0).abs() < f64::EPSILON {
                completed_clients += 1;
            }
            progress_sum += progress;

            clients_progress.push(ClientProgress {
                client_id,
                completed_days,
                total_days,
                progress,
            });
        }

        let client_count = clients_progress.len() as i64;
        let average_progress = if clients_progress.is_empty() {
            0.0
        } else {
            progress_sum / clients_progress.len() as f64
        };

        Ok(TrainerAnalytics {
            program_count,
            client_count,
            completed_clients,
            average_progress,
            clients_progress,
        })
    }
}
