//! Repository for the `casting_calls` table.

use castline_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use castline_core::status::CastingCallStatus;
use castline_core::types::DbId;
use sqlx::PgPool;

use crate::models::casting_call::{
    CastingCall, CreateCastingCall, OpenCallParams, UpdateCastingCall,
};

const COLUMNS: &str = "id, studio_id, project_id, region_id, title, description, role_name, \
    requirements, location, compensation, status_id, deadline, created_at, updated_at";

/// Provides CRUD operations for casting calls.
pub struct CastingCallRepo;

impl CastingCallRepo {
    /// Insert a casting call. Status defaults to 1 (Draft).
    pub async fn create(
        pool: &PgPool,
        studio_id: DbId,
        input: &CreateCastingCall,
    ) -> Result<CastingCall, sqlx::Error> {
        let query = format!(
            "INSERT INTO casting_calls
                (studio_id, project_id, region_id, title, description, role_name,
                 requirements, location, compensation, status_id, deadline)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 1), $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CastingCall>(&query)
            .bind(studio_id)
            .bind(input.project_id)
            .bind(input.region_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.role_name)
            .bind(&input.requirements)
            .bind(&input.location)
            .bind(&input.compensation)
            .bind(input.status_id)
            .bind(input.deadline)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CastingCall>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM casting_calls WHERE id = $1");
        sqlx::query_as::<_, CastingCall>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All of a studio's calls regardless of status, newest first.
    pub async fn list_by_studio(
        pool: &PgPool,
        studio_id: DbId,
    ) -> Result<Vec<CastingCall>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM casting_calls WHERE studio_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, CastingCall>(&query)
            .bind(studio_id)
            .fetch_all(pool)
            .await
    }

    /// Open calls whose deadline has not passed, soonest deadline first.
    pub async fn list_open(
        pool: &PgPool,
        params: &OpenCallParams,
    ) -> Result<Vec<CastingCall>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM casting_calls
             WHERE status_id = $1
               AND (deadline IS NULL OR deadline >= NOW())
               AND ($2::BIGINT IS NULL OR region_id = $2)
             ORDER BY deadline NULLS LAST, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, CastingCall>(&query)
            .bind(CastingCallStatus::Open.id())
            .bind(params.region_id)
            .bind(clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCastingCall,
    ) -> Result<Option<CastingCall>, sqlx::Error> {
        let query = format!(
            "UPDATE casting_calls SET
                project_id = COALESCE($2, project_id),
                region_id = COALESCE($3, region_id),
                title = COALESCE($4, title),
                description = COALESCE($5, description),
                role_name = COALESCE($6, role_name),
                requirements = COALESCE($7, requirements),
                location = COALESCE($8, location),
                compensation = COALESCE($9, compensation),
                status_id = COALESCE($10, status_id),
                deadline = COALESCE($11, deadline)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CastingCall>(&query)
            .bind(id)
            .bind(input.project_id)
            .bind(input.region_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.role_name)
            .bind(&input.requirements)
            .bind(&input.location)
            .bind(&input.compensation)
            .bind(input.status_id)
            .bind(input.deadline)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM casting_calls WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
