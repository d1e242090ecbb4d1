// ABOUTME: Environment-only server configuration
// ABOUTME: All settings are read once at startup and passed into components at construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

use crate::errors::{AppError, AppResult};
use std::env;

/// Default HTTP port when `HTTP_PORT` is unset
pub const DEFAULT_HTTP_PORT: u16 = 8081;
/// Default database URL when `DATABASE_URL` is unset
pub const DEFAULT_DATABASE_URL: &str = "sqlite:data/coachtrack.db";

/// Server configuration loaded from the environment
///
/// No package-level mutable state: the loaded config is handed to
/// `ServerResources` at construction so tests can inject distinct values
/// per run.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP listener binds to
    pub http_port: u16,
    /// Database connection URL
    pub database_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `HTTP_PORT` is set but not a valid port.
    pub fn from_env() -> AppResult<Self> {
        let http_port = match env::var("HTTP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::invalid_input(format!("invalid HTTP_PORT: {raw}")))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());

        Ok(Self {
            http_port,
            database_url,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_is_unset() {
        env::remove_var("HTTP_PORT");
        env::remove_var("DATABASE_URL");
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }
}
