//! Repository for questionnaire responses and their answers.

use castline_core::questionnaire::AnswerInput;
use castline_core::status::InvitationStatus;
use castline_core::types::DbId;
use sqlx::PgPool;

use crate::models::invitation::Invitation;
use crate::models::response::{QuestionAnswer, QuestionnaireResponse, ResponseDetail};

const COLUMNS: &str =
    "id, invitation_id, questionnaire_id, profile_id, submitted_at, created_at, updated_at";

const ANSWER_COLUMNS: &str = "id, response_id, question_id, value, created_at, updated_at";

pub struct ResponseRepo;

impl ResponseRepo {
    /// Store a response for an invitation.
    ///
    /// One transaction moves the invitation from pending to completed, then
    /// writes the response row and every answer. Returns `None`, writing
    /// nothing, when the invitation is no longer pending (declined or
    /// answered since it was read).
    pub async fn submit(
        pool: &PgPool,
        invitation: &Invitation,
        answers: &[AnswerInput],
    ) -> Result<Option<ResponseDetail>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Conflicts with the FOR UPDATE taken while questions are replaced.
        sqlx::query("SELECT id FROM questionnaires WHERE id = $1 FOR SHARE")
            .bind(invitation.questionnaire_id)
            .execute(&mut *tx)
            .await?;

        let claimed = sqlx::query(
            "UPDATE questionnaire_invitations SET status_id = $2, responded_at = NOW()
             WHERE id = $1 AND status_id = $3",
        )
        .bind(invitation.id)
        .bind(InvitationStatus::Completed.id())
        .bind(InvitationStatus::Pending.id())
        .execute(&mut *tx)
        .await?;
        if claimed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO questionnaire_responses (invitation_id, questionnaire_id, profile_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let response = sqlx::query_as::<_, QuestionnaireResponse>(&query)
            .bind(invitation.id)
            .bind(invitation.questionnaire_id)
            .bind(invitation.profile_id)
            .fetch_one(&mut *tx)
            .await?;

        let answer_query = format!(
            "INSERT INTO question_answers (response_id, question_id, value)
             VALUES ($1, $2, $3)
             RETURNING {ANSWER_COLUMNS}"
        );
        let mut stored = Vec::with_capacity(answers.len());
        for answer in answers {
            let row = sqlx::query_as::<_, QuestionAnswer>(&answer_query)
                .bind(response.id)
                .bind(answer.question_id)
                .bind(&answer.value)
                .fetch_one(&mut *tx)
                .await?;
            stored.push(row);
        }

        tx.commit().await?;
        Ok(Some(ResponseDetail {
            response,
            answers: stored,
        }))
    }

    /// The response for an invitation, with its answers.
    pub async fn find_by_invitation(
        pool: &PgPool,
        invitation_id: DbId,
    ) -> Result<Option<ResponseDetail>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM questionnaire_responses WHERE invitation_id = $1");
        let Some(response) = sqlx::query_as::<_, QuestionnaireResponse>(&query)
            .bind(invitation_id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let answers = sqlx::query_as::<_, QuestionAnswer>(
            "SELECT a.id, a.response_id, a.question_id, a.value, a.created_at, a.updated_at
             FROM question_answers a
             JOIN questionnaire_questions q ON q.id = a.question_id
             WHERE a.response_id = $1
             ORDER BY q.sort_order, q.id",
        )
        .bind(response.id)
        .fetch_all(pool)
        .await?;

        Ok(Some(ResponseDetail { response, answers }))
    }
}
