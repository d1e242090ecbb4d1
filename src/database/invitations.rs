// ABOUTME: Program invitation lifecycle - creation, token redemption, access amendment
// ABOUTME: Redemption and amendment are single conditional updates computing expiry in SQL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

use super::catalog::CatalogGateway;
use super::{format_timestamp, parse_timestamp, parse_timestamp_opt};
use crate::errors::{AppError, AppResult};
use crate::models::{Program, ProgramInvitation};
use chrono::Utc;
use rand::RngCore;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

/// Bytes of entropy behind each invitation token (256 bits, hex-encoded)
const TOKEN_ENTROPY_BYTES: usize = 32;

/// Manages program invitations
pub struct InvitationManager {
    pool: SqlitePool,
    catalog: Arc<dyn CatalogGateway>,
}

fn row_to_invitation(row: &SqliteRow) -> AppResult<ProgramInvitation> {
    let client_id: Option<String> = row.get("client_id");
    let accepted_at: Option<String> = row.get("accepted_at");
    let access_expires: Option<String> = row.get("access_expires");
    let created_at: String = row.get("created_at");
    let updated_at: Option<String> = row.get("updated_at");

    Ok(ProgramInvitation {
        id: row.get("id"),
        program_id: row.get("program_id"),
        email: row.get("email"),
        message: row.get("message"),
        access_days: row.get("access_days"),
        token: row.get("token"),
        client_id: client_id
            .map(|raw| {
                Uuid::parse_str(&raw)
                    .map_err(|e| AppError::database(format!("Invalid client_id in invitation: {e}")))
            })
            .transpose()?,
        accepted_at: parse_timestamp_opt(accepted_at.as_deref())?,
        access_expires: parse_timestamp_opt(access_expires.as_deref())?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp_opt(updated_at.as_deref())?,
    })
}

const INVITATION_COLUMNS: &str = "id, program_id, email, message, access_days, token, \
     client_id, accepted_at, access_expires, created_at, updated_at";

impl InvitationManager {
    /// Create a new invitation manager over the shared pool
    #[must_use]
    pub fn new(pool: SqlitePool, catalog: Arc<dyn CatalogGateway>) -> Self {
        Self { pool, catalog }
    }

    /// Generate a fresh opaque token, never derived from user input
    fn generate_token() -> String {
        let mut bytes = [0u8; TOKEN_ENTROPY_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Create an unredeemed invitation against an existing program
    ///
    /// Program existence is validated eagerly so a trainer learns about a
    /// stale program id at creation time rather than when the invitee tries
    /// to redeem.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty email, a non-positive duration,
    /// or a nonexistent program.
    pub async fn create_invitation(
        &self,
        program_id: i64,
        email: &str,
        message: &str,
        access_days: i64,
    ) -> AppResult<ProgramInvitation> {
        if email.is_empty() {
            return Err(AppError::invalid_input("email is required"));
        }
        if access_days <= 0 {
            return Err(AppError::invalid_input("access_days must be positive"));
        }
        if !self.catalog.program_exists(program_id).await? {
            return Err(AppError::invalid_input(format!(
                "program {program_id} does not exist"
            )));
        }

        let token = Self::generate_token();
        let now = format_timestamp(Utc::now());
        let row = sqlx::query(
            r"
            INSERT INTO program_invitations (program_id, email, message, access_days, token, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id
            ",
        )
        .bind(program_id)
        .bind(email)
        .bind(message)
        .bind(access_days)
        .bind(&token)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create invitation: {e}")))?;

        Ok(ProgramInvitation {
            id: row.get("id"),
            program_id,
            email: email.to_owned(),
            message: message.to_owned(),
            access_days,
            token,
            client_id: None,
            accepted_at: None,
            access_expires: None,
            created_at: parse_timestamp(&now)?,
            updated_at: None,
        })
    }

    /// Redeem an invitation token for a client
    ///
    /// The redeeming write is one conditional UPDATE: the expiry is computed
    /// inside SQL from the row's own `access_days`, so two near-simultaneous
    /// redemptions can never interleave a stale read into the stored triple.
    /// Re-presenting the token with the same client is a deterministic
    /// overwrite; presenting it with a different client is rejected rather
    /// than silently reassigning access.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown token, `InvalidInput` when the
    /// token is already bound to another client.
    pub async fn redeem_invitation(
        &self,
        token: &str,
        client_id: Uuid,
    ) -> AppResult<ProgramInvitation> {
        if token.is_empty() {
            return Err(AppError::invalid_input("token is required"));
        }

        let now = format_timestamp(Utc::now());
        let query = format!(
            r"
            UPDATE program_invitations
            SET client_id = ?1,
                accepted_at = ?2,
                access_expires = strftime('%Y-%m-%dT%H:%M:%SZ', ?2, '+' || (access_days * 24) || ' hours'),
                updated_at = ?2
            WHERE token = ?3
              AND (client_id IS NULL OR client_id = ?1)
            RETURNING {INVITATION_COLUMNS}
            "
        );
        let row = sqlx::query(&query)
            .bind(client_id.to_string())
            .bind(&now)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to redeem invitation: {e}")))?;

        if let Some(row) = row {
            return row_to_invitation(&row);
        }

        // No row updated: either the token is unknown or it is bound to a
        // different client. Distinguish with a read-only lookup.
        let exists = sqlx::query("SELECT 1 FROM program_invitations WHERE token = ?1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up invitation: {e}")))?;

        if exists.is_some() {
            Err(AppError::invalid_input(
                "invitation already redeemed by another client",
            ))
        } else {
            Err(AppError::not_found("invitation not found"))
        }
    }

    /// Change the access duration of the invitation binding a client to a
    /// program
    ///
    /// When already accepted, the expiry is recomputed from the original
    /// acceptance timestamp, never from the amendment time: a duration edit
    /// changes how long the window is, not when it started. When a matched
    /// row has no acceptance yet, only `access_days` changes and the expiry
    /// stays absent.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no invitation matches the pair.
    pub async fn amend_access_duration(
        &self,
        program_id: i64,
        client_id: Uuid,
        new_days: i64,
    ) -> AppResult<ProgramInvitation> {
        if new_days <= 0 {
            return Err(AppError::invalid_input("access_days must be positive"));
        }

        let now = format_timestamp(Utc::now());
        let query = format!(
            r"
            UPDATE program_invitations
            SET access_days = ?1,
                access_expires = CASE
                    WHEN accepted_at IS NOT NULL
                    THEN strftime('%Y-%m-%dT%H:%M:%SZ', accepted_at, '+' || (?1 * 24) || ' hours')
                    ELSE NULL
                END,
                updated_at = ?2
            WHERE program_id = ?3 AND client_id = ?4
            RETURNING {INVITATION_COLUMNS}
            "
        );
        let row = sqlx::query(&query)
            .bind(new_days)
            .bind(&now)
            .bind(program_id)
            .bind(client_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to amend invitation: {e}")))?;

        row.map_or_else(
            || {
                Err(AppError::not_found(format!(
                    "no invitation for client {client_id} on program {program_id}"
                )))
            },
            |row| row_to_invitation(&row),
        )
    }

    /// Resolve a token to its program's public record
    ///
    /// Intentionally ignores expiry: a program's descriptive record stays
    /// visible for preview; only redemption changes who may act.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown token.
    pub async fn program_from_token(&self, token: &str) -> AppResult<Program> {
        if token.is_empty() {
            return Err(AppError::invalid_input("token is required"));
        }

        let row = sqlx::query(
            r"
            SELECT program_id FROM program_invitations WHERE token = ?1
            ",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to look up invitation: {e}")))?;

        let Some(row) = row else {
            return Err(AppError::not_found("invitation not found"));
        };
        let program_id: i64 = row.get("program_id");

        self.catalog
            .get_program(program_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("program {program_id} not found")))
    }
}
