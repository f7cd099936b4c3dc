//! Casting code submissions and their survey answers.

use castline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from the `casting_code_submissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: DbId,
    pub casting_code_id: DbId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub headshot_url: Option<String>,
    pub status_id: StatusId,
    pub external_actor_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public request body for `POST /public/casting-codes/{code}/submissions`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubmission {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub headshot_url: Option<String>,
    #[serde(default)]
    pub survey_answers: serde_json::Map<String, serde_json::Value>,
}

/// A submission with its survey answers, as listed for the studio.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubmissionWithSurvey {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub submission: Submission,
    pub survey_answers: Option<serde_json::Value>,
}

/// Request body for `PATCH /submissions/{id}`. `status` is a status name.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSubmissionStatus {
    pub status: String,
}
