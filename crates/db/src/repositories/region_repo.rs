//! Repositories for the `regions` and `locations` tables.

use castline_core::types::DbId;
use sqlx::PgPool;

use crate::models::region::{CreateRegion, Location, Region, SaveLocation, UpdateRegion};

const REGION_COLUMNS: &str =
    "id, name, code, country, is_active, sort_order, created_at, updated_at";

const LOCATION_COLUMNS: &str = "id, region_id, name, created_at, updated_at";

/// Provides CRUD operations for regions.
pub struct RegionRepo;

impl RegionRepo {
    pub async fn create(pool: &PgPool, input: &CreateRegion) -> Result<Region, sqlx::Error> {
        let query = format!(
            "INSERT INTO regions (name, code, country, sort_order)
             VALUES ($1, $2, $3, COALESCE($4, 0))
             RETURNING {REGION_COLUMNS}"
        );
        sqlx::query_as::<_, Region>(&query)
            .bind(&input.name)
            .bind(&input.code)
            .bind(&input.country)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Region>, sqlx::Error> {
        let query = format!("SELECT {REGION_COLUMNS} FROM regions WHERE id = $1");
        sqlx::query_as::<_, Region>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List regions in display order.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Region>, sqlx::Error> {
        let query = format!(
            "SELECT {REGION_COLUMNS} FROM regions
             WHERE is_active OR $1
             ORDER BY sort_order, name"
        );
        sqlx::query_as::<_, Region>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRegion,
    ) -> Result<Option<Region>, sqlx::Error> {
        let query = format!(
            "UPDATE regions SET
                name = COALESCE($2, name),
                code = COALESCE($3, code),
                country = COALESCE($4, country),
                is_active = COALESCE($5, is_active),
                sort_order = COALESCE($6, sort_order)
             WHERE id = $1
             RETURNING {REGION_COLUMNS}"
        );
        sqlx::query_as::<_, Region>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.code)
            .bind(&input.country)
            .bind(input.is_active)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a region. Fails with a RESTRICT violation while region plans
    /// are still referenced by user subscriptions.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM regions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Provides CRUD operations for named locations inside a region.
pub struct LocationRepo;

impl LocationRepo {
    pub async fn create(
        pool: &PgPool,
        region_id: DbId,
        input: &SaveLocation,
    ) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations (region_id, name) VALUES ($1, $2) RETURNING {LOCATION_COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(region_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_region(
        pool: &PgPool,
        region_id: DbId,
    ) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!(
            "SELECT {LOCATION_COLUMNS} FROM locations WHERE region_id = $1 ORDER BY name"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(region_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &SaveLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET name = $2 WHERE id = $1 RETURNING {LOCATION_COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
