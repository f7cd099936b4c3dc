//! Repository for the `studios` table.

use castline_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use castline_core::types::DbId;
use sqlx::PgPool;

use crate::models::studio::{CreateStudio, Studio, UpdateStudio};

const COLUMNS: &str = "id, tenant_id, name, description, website, contact_email, logo_url, \
    location, created_at, updated_at";

/// Provides CRUD operations for studios.
pub struct StudioRepo;

impl StudioRepo {
    pub async fn create(pool: &PgPool, input: &CreateStudio) -> Result<Studio, sqlx::Error> {
        let query = format!(
            "INSERT INTO studios
                (tenant_id, name, description, website, contact_email, logo_url, location)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Studio>(&query)
            .bind(input.tenant_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.website)
            .bind(&input.contact_email)
            .bind(&input.logo_url)
            .bind(&input.location)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Studio>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM studios WHERE id = $1");
        sqlx::query_as::<_, Studio>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The studio owned by a tenant, if any.
    pub async fn find_by_tenant(
        pool: &PgPool,
        tenant_id: DbId,
    ) -> Result<Option<Studio>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM studios WHERE tenant_id = $1");
        sqlx::query_as::<_, Studio>(&query)
            .bind(tenant_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Studio>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM studios ORDER BY name, id LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Studio>(&query)
            .bind(clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStudio,
    ) -> Result<Option<Studio>, sqlx::Error> {
        let query = format!(
            "UPDATE studios SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                website = COALESCE($4, website),
                contact_email = COALESCE($5, contact_email),
                logo_url = COALESCE($6, logo_url),
                location = COALESCE($7, location)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Studio>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.website)
            .bind(&input.contact_email)
            .bind(&input.logo_url)
            .bind(&input.location)
            .fetch_optional(pool)
            .await
    }

    /// Delete a studio and everything it owns (projects, calls, actors,
    /// questionnaires, casting codes, field values).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM studios WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
