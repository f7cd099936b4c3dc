//! Repository for casting code submissions and their survey answers.

use castline_core::status::{StatusId, SubmissionStatus};
use castline_core::types::DbId;
use sqlx::PgPool;

use crate::models::external_actor::ExternalActor;
use crate::models::submission::{CreateSubmission, Submission, SubmissionWithSurvey};

const COLUMNS: &str = "id, casting_code_id, first_name, last_name, email, phone, message, \
    headshot_url, status_id, external_actor_id, created_at, updated_at";

const ACTOR_COLUMNS: &str = "id, studio_id, first_name, last_name, email, phone, notes, \
    status_id, invited_at, converted_at, converted_profile_id, converted_to_user_id, \
    created_at, updated_at";

pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Store a submission and its survey answers.
    ///
    /// The code row is locked while the submission count is checked against
    /// `max_submissions`, so concurrent submitters cannot overshoot the cap.
    /// Returns `None` when the cap has been reached.
    pub async fn create_with_survey(
        pool: &PgPool,
        casting_code_id: DbId,
        input: &CreateSubmission,
        survey_answers: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Option<SubmissionWithSurvey>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (max_submissions,): (Option<i32>,) =
            sqlx::query_as("SELECT max_submissions FROM casting_codes WHERE id = $1 FOR UPDATE")
                .bind(casting_code_id)
                .fetch_one(&mut *tx)
                .await?;

        if let Some(max) = max_submissions {
            let (count,): (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM casting_code_submissions WHERE casting_code_id = $1",
            )
            .bind(casting_code_id)
            .fetch_one(&mut *tx)
            .await?;
            if count >= i64::from(max) {
                return Ok(None);
            }
        }

        let query = format!(
            "INSERT INTO casting_code_submissions
                (casting_code_id, first_name, last_name, email, phone, message, headshot_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let submission = sqlx::query_as::<_, Submission>(&query)
            .bind(casting_code_id)
            .bind(input.first_name.trim())
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.message)
            .bind(&input.headshot_url)
            .fetch_one(&mut *tx)
            .await?;

        let survey_answers = if survey_answers.is_empty() {
            None
        } else {
            let answers = serde_json::Value::Object(survey_answers.clone());
            sqlx::query(
                "INSERT INTO casting_submission_surveys (submission_id, answers) VALUES ($1, $2)",
            )
            .bind(submission.id)
            .bind(&answers)
            .execute(&mut *tx)
            .await?;
            Some(answers)
        };

        tx.commit().await?;
        Ok(Some(SubmissionWithSurvey {
            submission,
            survey_answers,
        }))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM casting_code_submissions WHERE id = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a code's submissions with survey answers, newest first.
    pub async fn list_by_code(
        pool: &PgPool,
        casting_code_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SubmissionWithSurvey>, sqlx::Error> {
        sqlx::query_as::<_, SubmissionWithSurvey>(
            "SELECT s.id, s.casting_code_id, s.first_name, s.last_name, s.email, s.phone,
                    s.message, s.headshot_url, s.status_id, s.external_actor_id,
                    s.created_at, s.updated_at, v.answers AS survey_answers
             FROM casting_code_submissions s
             LEFT JOIN casting_submission_surveys v ON v.submission_id = s.id
             WHERE s.casting_code_id = $1
             ORDER BY s.created_at DESC, s.id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(casting_code_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status_id: StatusId,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "UPDATE casting_code_submissions SET status_id = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .bind(status_id)
            .fetch_optional(pool)
            .await
    }

    /// Turn a submission into an external actor of the code's studio.
    ///
    /// An actor with the same email in the studio is reused. The submission
    /// is linked to the actor and, if still pending, marked reviewed.
    pub async fn import_as_actor(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<(Submission, ExternalActor)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let found: Option<(DbId, String, Option<String>, String, Option<String>)> =
            sqlx::query_as(
                "SELECT c.studio_id, s.first_name, s.last_name, s.email, s.phone
                 FROM casting_code_submissions s
                 JOIN casting_codes c ON c.id = s.casting_code_id
                 WHERE s.id = $1
                 FOR UPDATE OF s",
            )
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some((studio_id, first_name, last_name, email, phone)) = found else {
            return Ok(None);
        };

        let query = format!(
            "INSERT INTO external_actors (studio_id, first_name, last_name, email, phone, notes)
             VALUES ($1, $2, $3, LOWER($4), $5, 'Imported from casting code submission')
             ON CONFLICT (studio_id, email) WHERE email IS NOT NULL
             DO UPDATE SET phone = COALESCE(external_actors.phone, EXCLUDED.phone)
             RETURNING {ACTOR_COLUMNS}"
        );
        let actor = sqlx::query_as::<_, ExternalActor>(&query)
            .bind(studio_id)
            .bind(&first_name)
            .bind(&last_name)
            .bind(&email)
            .bind(&phone)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "UPDATE casting_code_submissions SET
                external_actor_id = $2,
                status_id = CASE WHEN status_id = $3 THEN $4 ELSE status_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let submission = sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .bind(actor.id)
            .bind(SubmissionStatus::Pending.id())
            .bind(SubmissionStatus::Reviewed.id())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((submission, actor)))
    }
}
