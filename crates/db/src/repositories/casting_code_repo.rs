//! Repository for the `casting_codes` table.

use castline_core::types::DbId;
use sqlx::PgPool;

use crate::models::casting_code::{CastingCode, CreateCastingCode, UpdateCastingCode};

const COLUMNS: &str = "id, studio_id, casting_call_id, code, name, description, is_active, \
    expires_at, max_submissions, survey, created_by, created_at, updated_at";

pub struct CastingCodeRepo;

impl CastingCodeRepo {
    /// Insert a code. `code` must be normalized and `survey` validated.
    pub async fn create(
        pool: &PgPool,
        studio_id: DbId,
        created_by: Option<DbId>,
        code: &str,
        input: &CreateCastingCode,
        survey: &serde_json::Value,
    ) -> Result<CastingCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO casting_codes
                (studio_id, casting_call_id, code, name, description, is_active, expires_at,
                 max_submissions, survey, created_by)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, TRUE), $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CastingCode>(&query)
            .bind(studio_id)
            .bind(input.casting_call_id)
            .bind(code)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.is_active)
            .bind(input.expires_at)
            .bind(input.max_submissions)
            .bind(survey)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CastingCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM casting_codes WHERE id = $1");
        sqlx::query_as::<_, CastingCode>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up a code by its normalized text.
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<CastingCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM casting_codes WHERE code = $1");
        sqlx::query_as::<_, CastingCode>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_studio(
        pool: &PgPool,
        studio_id: DbId,
    ) -> Result<Vec<CastingCode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM casting_codes WHERE studio_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, CastingCode>(&query)
            .bind(studio_id)
            .fetch_all(pool)
            .await
    }

    /// Update a code. The code text itself is immutable.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCastingCode,
    ) -> Result<Option<CastingCode>, sqlx::Error> {
        let query = format!(
            "UPDATE casting_codes SET
                casting_call_id = COALESCE($2, casting_call_id),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                is_active = COALESCE($5, is_active),
                expires_at = COALESCE($6, expires_at),
                max_submissions = COALESCE($7, max_submissions),
                survey = COALESCE($8, survey)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CastingCode>(&query)
            .bind(id)
            .bind(input.casting_call_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.is_active)
            .bind(input.expires_at)
            .bind(input.max_submissions)
            .bind(&input.survey)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM casting_codes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_submissions(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM casting_code_submissions WHERE casting_code_id = $1",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
