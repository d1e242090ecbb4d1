// ABOUTME: Main library entry point for the CoachTrack coaching-program backend
// ABOUTME: Provides program invitations, day progress tracking, and trainer analytics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

#![deny(unsafe_code)]

//! # CoachTrack
//!
//! Backend core for coaching programs: trainers define multi-day
//! workout/nutrition programs, invite clients via opaque tokens, and clients
//! report daily completion which rolls up into trainer analytics.
//!
//! ## Architecture
//!
//! - **Catalog**: program/day/exercise/food records, existence checks, and
//!   transactional program deletion, behind the `CatalogGateway` trait
//! - **Invitations**: time-bounded invitations redeemed by token, with the
//!   access window anchored at the original acceptance time
//! - **Progress**: one upserted row per (client, day), with independent
//!   food/exercise flags and whole-day completion
//! - **Analytics**: per-trainer rollups of client completion ratios
//!
//! Caller identity (user id + role) is established by upstream auth and
//! consumed here as request headers; token verification is out of scope.

/// Caller identity extraction and role checks
pub mod auth;

/// Environment-only server configuration
pub mod config;

/// Storage, catalog, and the three core components
pub mod database;

/// Unified error handling with HTTP response mapping
pub mod errors;

/// Common data models
pub mod models;

/// HTTP routes, organized by domain
pub mod routes;

/// Server resource wiring and HTTP serving
pub mod server;
