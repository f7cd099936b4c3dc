//! Questionnaire and question models and DTOs.

use castline_core::error::CoreError;
use castline_core::questionnaire::{QuestionDraft, QuestionSpec, QuestionType};
use castline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `questionnaires` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Questionnaire {
    pub id: DbId,
    pub studio_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `questionnaire_questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: DbId,
    pub questionnaire_id: DbId,
    pub question_text: String,
    pub question_type: String,
    pub options: serde_json::Value,
    pub is_required: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Question {
    /// The validation view of a stored question.
    pub fn spec(&self) -> Result<QuestionSpec, CoreError> {
        Ok(QuestionSpec {
            id: self.id,
            question_type: QuestionType::parse(&self.question_type)?,
            options: options_of(&self.options),
            is_required: self.is_required,
        })
    }
}

/// Decode a JSONB string array; anything else reads as no options.
pub(crate) fn options_of(value: &serde_json::Value) -> Vec<String> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

/// DTO for creating a questionnaire together with its questions.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuestionnaire {
    pub title: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub questions: Vec<QuestionDraft>,
}

/// DTO for `PUT /questionnaires/{id}`.
///
/// When `questions` is present the full question list is replaced.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuestionnaire {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub questions: Option<Vec<QuestionDraft>>,
}

/// A questionnaire with its ordered questions.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionnaireDetail {
    #[serde(flatten)]
    pub questionnaire: Questionnaire,
    pub questions: Vec<Question>,
}

/// Outcome of [`crate::repositories::QuestionnaireRepo::update`].
#[derive(Debug, Clone)]
pub enum QuestionnaireUpdate {
    Updated(QuestionnaireDetail),
    NotFound,
    /// Questions were to be replaced but a response already exists.
    Answered,
}
