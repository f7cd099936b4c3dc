//! Questionnaire response and answer models.

use castline_core::questionnaire::AnswerInput;
use castline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `questionnaire_responses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionnaireResponse {
    pub id: DbId,
    pub invitation_id: DbId,
    pub questionnaire_id: DbId,
    pub profile_id: DbId,
    pub submitted_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `question_answers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionAnswer {
    pub id: DbId,
    pub response_id: DbId,
    pub question_id: DbId,
    pub value: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /invitations/{id}/response`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub answers: Vec<AnswerInput>,
}

/// A submitted response with its answers.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseDetail {
    #[serde(flatten)]
    pub response: QuestionnaireResponse,
    pub answers: Vec<QuestionAnswer>,
}
