// ABOUTME: Common data models for programs, days, invitations, progress, and analytics
// ABOUTME: JSON shapes are flat objects with optional fields omitted when absent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CoachTrack

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A trainer-authored workout/nutrition program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Catalog identifier
    pub id: i64,
    /// Owning trainer
    pub trainer_id: Uuid,
    /// Display name
    pub name: String,
    /// Planned length in days
    pub days: i64,
    /// Free-text description
    pub description: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One ordinal unit of a program, pairing one exercise and one food record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Day {
    /// Catalog identifier
    pub id: i64,
    /// Owning program
    pub program_id: i64,
    /// Position within the program, 1-based
    pub day_number: i64,
    /// Referenced exercise record
    pub exercise_id: i64,
    /// Referenced food record
    pub food_id: i64,
    /// Trainer note for the day
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single exercise definition from the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    /// Catalog identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Instructions
    pub description: String,
    /// Number of sets
    pub sets: i64,
    /// Repetitions per set
    pub repetitions: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single food/meal definition from the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    /// Catalog identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Preparation notes
    pub description: String,
    /// Energy in kcal
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Fats in grams
    pub fats: f64,
    /// Carbohydrates in grams
    pub carbohydrates: f64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A day together with its exercise and food records, as presented to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayDetails {
    /// The day row itself
    pub day: Day,
    /// The referenced exercise
    pub exercise: Exercise,
    /// The referenced food
    pub food: Food,
}

/// A time-bounded invitation for a client to join a program
///
/// `client_id`, `accepted_at`, and `access_expires` are all absent until the
/// invitation is redeemed, then all set together. `access_expires` always
/// equals `accepted_at` plus the current `access_days`, recomputed from the
/// original acceptance time when the duration is amended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramInvitation {
    /// Row identifier
    pub id: i64,
    /// Target program
    pub program_id: i64,
    /// Invitee email address
    pub email: String,
    /// Free-text message shown to the invitee
    pub message: String,
    /// Requested access window in days
    pub access_days: i64,
    /// Opaque unguessable token, generated once at creation
    pub token: String,
    /// Redeeming client, set at acceptance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Uuid>,
    /// Acceptance timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
    /// End of the client's access window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_expires: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Per-(client, day) completion record
///
/// The two sub-task flags and `completed_at` are independent: a client can
/// check off food or exercise without marking the whole day done, and vice
/// versa. At most one row exists per (client, day) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayProgress {
    /// Row identifier
    pub id: i64,
    /// Reporting client
    pub client_id: Uuid,
    /// Day the report attaches to
    pub day_id: i64,
    /// Food sub-task checked off
    pub food_completed: bool,
    /// Exercise sub-task checked off
    pub exercise_completed: bool,
    /// Whole-day completion timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// One entry of a per-program progress view, left-joined against the
/// program's day list so never-attempted days show all-false fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayProgressEntry {
    /// Day identifier
    pub day_id: i64,
    /// Position within the program
    pub day_number: i64,
    /// Food sub-task checked off
    pub food_completed: bool,
    /// Exercise sub-task checked off
    pub exercise_completed: bool,
    /// Whole-day completion timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Per-client completion statistics under one trainer's programs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProgress {
    /// The client
    pub client_id: Uuid,
    /// Days marked complete
    pub completed_days: i64,
    /// Days tracked across the trainer's programs
    pub total_days: i64,
    /// `completed_days / total_days`, 0 when nothing is tracked
    pub progress: f64,
}

/// Trainer-facing analytics rollup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainerAnalytics {
    /// Programs owned by the trainer
    pub program_count: i64,
    /// Distinct clients with any recorded progress
    pub client_count: i64,
    /// Clients whose completion ratio equals 1.0
    pub completed_clients: i64,
    /// Mean of per-client ratios, 0 when there are no clients
    pub average_progress: f64,
    /// Per-client breakdown
    pub clients_progress: Vec<ClientProgress>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn unredeemed_invitation_omits_optional_fields() {
        let inv = ProgramInvitation {
            id: 1,
            program_id: 7,
            email: "client@example.com".into(),
            message: "welcome".into(),
            access_days: 7,
            token: "tok".into(),
            client_id: None,
            accepted_at: None,
            access_expires: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        let json = serde_json::to_value(&inv).expect("serialize");
        assert!(json.get("client_id").is_none());
        assert!(json.get("accepted_at").is_none());
        assert!(json.get("access_expires").is_none());
    }

    #[test]
    fn progress_omits_completed_at_until_set() {
        let progress = DayProgress {
            id: 1,
            client_id: Uuid::new_v4(),
            day_id: 3,
            food_completed: true,
            exercise_completed: false,
            completed_at: None,
        };
        let json = serde_json::to_value(&progress).expect("serialize");
        assert!(json.get("completed_at").is_none());
        assert_eq!(json["food_completed"], true);
    }
}
