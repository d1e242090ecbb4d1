// ABOUTME: Caller identity extraction and role-based capability checks
// ABOUTME: Upstream auth verifies tokens; this layer only consumes the resulting identity headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

use crate::errors::AppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Header carrying the authenticated user id, injected by the auth proxy
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user role, injected by the auth proxy
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Closed role enumeration for authorization checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Owns programs, issues invitations, reads analytics
    Trainer,
    /// Redeems invitations and reports progress
    Client,
    /// Full access
    Admin,
}

impl UserRole {
    /// Canonical string form, matching the role header and storage
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trainer => "trainer",
            Self::Client => "client",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trainer" => Ok(Self::Trainer),
            "client" => Ok(Self::Client),
            "admin" => Ok(Self::Admin),
            other => Err(AppError::auth_required(format!("unknown role: {other}"))),
        }
    }
}

/// Identity of the authenticated caller, as established by upstream auth
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity {
    /// Authenticated user
    pub user_id: Uuid,
    /// Caller role
    pub role: UserRole,
}

impl CallerIdentity {
    /// Require the trainer capability (admins qualify)
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when the caller is neither trainer nor admin.
    pub fn require_trainer(&self) -> Result<(), AppError> {
        match self.role {
            UserRole::Trainer | UserRole::Admin => Ok(()),
            UserRole::Client => Err(AppError::auth_required("trainer role required")),
        }
    }

    /// Parse the identity headers from request parts
    fn from_parts_inner(parts: &Parts) -> Result<Self, AppError> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::auth_required("missing caller identity"))?;
        let user_id = Uuid::parse_str(user_id)
            .map_err(|_| AppError::auth_required("malformed caller identity"))?;

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::auth_required("missing caller role"))?
            .parse::<UserRole>()?;

        Ok(Self { user_id, role })
    }
}

#[async_trait::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts_inner(parts)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [UserRole::Trainer, UserRole::Client, UserRole::Admin] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn client_lacks_trainer_capability() {
        let identity = CallerIdentity {
            user_id: Uuid::new_v4(),
            role: UserRole::Client,
        };
        assert!(identity.require_trainer().is_err());

        let admin = CallerIdentity {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
        };
        assert!(admin.require_trainer().is_ok());
    }
}
