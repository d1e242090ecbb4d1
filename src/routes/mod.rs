// ABOUTME: Route module organization for the CoachTrack HTTP surface
// ABOUTME: Each domain module contains route definitions and thin handlers delegating to managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

/// Trainer analytics routes
pub mod analytics;
/// Day catalog routes (day CRUD, day detail, program deletion)
pub mod catalog;
/// Invitation lifecycle routes
pub mod invitations;
/// Completion reporting and progress query routes
pub mod progress;
