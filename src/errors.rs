// ABOUTME: Unified error handling with standard error categories and HTTP responses
// ABOUTME: Maps storage and validation failures to the taxonomy the routes surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy
///
/// Storage errors are wrapped at the boundary nearest the store call
/// ("no rows" becomes `NotFound`); referential violations raised by
/// business rules are `InvalidInput`, never `Internal`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Requested entity (invitation token, program, day, progress row) is absent
    #[error("{0}")]
    NotFound(String),

    /// Missing or malformed identifiers/body, or a bad catalog reference
    #[error("{0}")]
    InvalidInput(String),

    /// Caller identity missing or lacking the required role
    #[error("{0}")]
    AuthRequired(String),

    /// Store or connectivity failure; never surfaced verbatim to callers
    #[error("database error: {0}")]
    Database(String),

    /// Anything else that should not leak detail to callers
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Entity not found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Invalid caller-supplied input
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Missing or insufficient caller identity
    pub fn auth_required(msg: impl Into<String>) -> Self {
        Self::AuthRequired(msg.into())
    }

    /// Storage-level failure
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Internal failure
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status code equivalent for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::AuthRequired(_) => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Store detail stays in the logs, never in the response body
        let message = match &self {
            Self::Database(detail) => {
                tracing::error!("database failure: {detail}");
                "internal server error".to_owned()
            }
            Self::Internal(detail) => {
                tracing::error!("internal failure: {detail}");
                "internal server error".to_owned()
            }
            Self::NotFound(m) | Self::InvalidInput(m) | Self::AuthRequired(m) => m.clone(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found("row not found"),
            other => Self::database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            AppError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::invalid_input("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::auth_required("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::database("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
