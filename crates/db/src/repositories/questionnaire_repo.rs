//! Repository for questionnaires and their questions.

use castline_core::questionnaire::QuestionDraft;
use castline_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::questionnaire::{
    CreateQuestionnaire, Question, Questionnaire, QuestionnaireDetail, QuestionnaireUpdate,
    UpdateQuestionnaire,
};

const COLUMNS: &str =
    "id, studio_id, title, description, is_active, created_by, created_at, updated_at";

const QUESTION_COLUMNS: &str = "id, questionnaire_id, question_text, question_type, options, \
    is_required, sort_order, created_at, updated_at";

/// Provides CRUD operations for questionnaires.
pub struct QuestionnaireRepo;

impl QuestionnaireRepo {
    /// Insert a questionnaire and its questions in one transaction.
    ///
    /// `questions` are expected to be validated and carry canonical type names.
    pub async fn create_with_questions(
        pool: &PgPool,
        studio_id: DbId,
        created_by: Option<DbId>,
        input: &CreateQuestionnaire,
        questions: &[QuestionDraft],
    ) -> Result<QuestionnaireDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO questionnaires (studio_id, title, description, is_active, created_by)
             VALUES ($1, $2, $3, COALESCE($4, TRUE), $5)
             RETURNING {COLUMNS}"
        );
        let questionnaire = sqlx::query_as::<_, Questionnaire>(&query)
            .bind(studio_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.is_active)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        let questions = insert_questions(&mut tx, questionnaire.id, questions).await?;

        tx.commit().await?;
        Ok(QuestionnaireDetail {
            questionnaire,
            questions,
        })
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Questionnaire>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM questionnaires WHERE id = $1");
        sqlx::query_as::<_, Questionnaire>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_studio(
        pool: &PgPool,
        studio_id: DbId,
    ) -> Result<Vec<Questionnaire>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questionnaires WHERE studio_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Questionnaire>(&query)
            .bind(studio_id)
            .fetch_all(pool)
            .await
    }

    /// Questions in display order.
    pub async fn list_questions(
        pool: &PgPool,
        questionnaire_id: DbId,
    ) -> Result<Vec<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {QUESTION_COLUMNS} FROM questionnaire_questions
             WHERE questionnaire_id = $1
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(questionnaire_id)
            .fetch_all(pool)
            .await
    }

    /// Apply an edit in one transaction.
    ///
    /// The questionnaire row is locked first so no response can be submitted
    /// concurrently. When `questions` is given the whole list is replaced;
    /// that is refused with [`QuestionnaireUpdate::Answered`] once any
    /// response exists, since dropping questions would cascade into
    /// submitted answers. Nothing is written unless the outcome is
    /// [`QuestionnaireUpdate::Updated`].
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateQuestionnaire,
        questions: Option<&[QuestionDraft]>,
    ) -> Result<QuestionnaireUpdate, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM questionnaires WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            tx.rollback().await?;
            return Ok(QuestionnaireUpdate::NotFound);
        }

        if let Some(drafts) = questions {
            let (answered,): (bool,) = sqlx::query_as(
                "SELECT EXISTS (SELECT 1 FROM questionnaire_responses WHERE questionnaire_id = $1)",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
            if answered {
                tx.rollback().await?;
                return Ok(QuestionnaireUpdate::Answered);
            }

            sqlx::query("DELETE FROM questionnaire_questions WHERE questionnaire_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_questions(&mut tx, id, drafts).await?;
        }

        let query = format!(
            "UPDATE questionnaires SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let questionnaire = sqlx::query_as::<_, Questionnaire>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "SELECT {QUESTION_COLUMNS} FROM questionnaire_questions
             WHERE questionnaire_id = $1
             ORDER BY sort_order, id"
        );
        let questions = sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(QuestionnaireUpdate::Updated(QuestionnaireDetail {
            questionnaire,
            questions,
        }))
    }

    pub async fn has_responses(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM questionnaire_responses WHERE questionnaire_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Delete a questionnaire with its questions, invitations and responses.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM questionnaires WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

async fn insert_questions(
    conn: &mut PgConnection,
    questionnaire_id: DbId,
    questions: &[QuestionDraft],
) -> Result<Vec<Question>, sqlx::Error> {
    let query = format!(
        "INSERT INTO questionnaire_questions
            (questionnaire_id, question_text, question_type, options, is_required, sort_order)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {QUESTION_COLUMNS}"
    );
    let mut inserted = Vec::with_capacity(questions.len());
    for (position, draft) in questions.iter().enumerate() {
        let sort_order = draft.sort_order.unwrap_or(position as i32);
        let question = sqlx::query_as::<_, Question>(&query)
            .bind(questionnaire_id)
            .bind(draft.question_text.trim())
            .bind(&draft.question_type)
            .bind(Json(&draft.options))
            .bind(draft.is_required)
            .bind(sort_order)
            .fetch_one(&mut *conn)
            .await?;
        inserted.push(question);
    }
    Ok(inserted)
}
