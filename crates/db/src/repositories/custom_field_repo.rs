//! Repositories for custom field definitions and their stored values.

use castline_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::custom_field::{
    CreateCustomField, CustomField, CustomFieldParams, FieldValue, FieldValueInput,
    UpdateCustomField,
};

const COLUMNS: &str = "id, entity_type, name, label, field_type, options, is_required, \
    is_active, sort_order, created_at, updated_at";

/// Provides CRUD operations for custom field definitions.
pub struct CustomFieldRepo;

impl CustomFieldRepo {
    /// Insert a definition. `field_type` must already be canonical.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCustomField,
    ) -> Result<CustomField, sqlx::Error> {
        let query = format!(
            "INSERT INTO custom_fields
                (entity_type, name, label, field_type, options, is_required, sort_order)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, FALSE), COALESCE($7, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomField>(&query)
            .bind(&input.entity_type)
            .bind(&input.name)
            .bind(input.label.trim())
            .bind(&input.field_type)
            .bind(Json(&input.options))
            .bind(input.is_required)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CustomField>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM custom_fields WHERE id = $1");
        sqlx::query_as::<_, CustomField>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &CustomFieldParams,
    ) -> Result<Vec<CustomField>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM custom_fields
             WHERE ($1::TEXT IS NULL OR entity_type = $1)
               AND ($2 OR is_active)
             ORDER BY entity_type, sort_order, id"
        );
        sqlx::query_as::<_, CustomField>(&query)
            .bind(&params.entity_type)
            .bind(params.include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Active definitions for one entity type, used when validating values.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
    ) -> Result<Vec<CustomField>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM custom_fields
             WHERE entity_type = $1 AND is_active
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, CustomField>(&query)
            .bind(entity_type)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCustomField,
    ) -> Result<Option<CustomField>, sqlx::Error> {
        let query = format!(
            "UPDATE custom_fields SET
                label = COALESCE($2, label),
                options = COALESCE($3, options),
                is_required = COALESCE($4, is_required),
                is_active = COALESCE($5, is_active),
                sort_order = COALESCE($6, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomField>(&query)
            .bind(id)
            .bind(&input.label)
            .bind(input.options.as_ref().map(Json))
            .bind(input.is_required)
            .bind(input.is_active)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a definition and every value stored for it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM custom_fields WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Table and owner column for one kind of field value.
#[derive(Clone, Copy)]
struct ValueTable {
    table: &'static str,
    owner: &'static str,
}

const PROFILE_VALUES: ValueTable = ValueTable {
    table: "profile_field_values",
    owner: "profile_id",
};

const STUDIO_VALUES: ValueTable = ValueTable {
    table: "studio_field_values",
    owner: "studio_id",
};

/// Reads and writes custom field values for profiles and studios.
pub struct FieldValueRepo;

impl FieldValueRepo {
    pub async fn list_for_profile(
        pool: &PgPool,
        profile_id: DbId,
    ) -> Result<Vec<FieldValue>, sqlx::Error> {
        list_values(pool, PROFILE_VALUES, profile_id).await
    }

    pub async fn list_for_studio(
        pool: &PgPool,
        studio_id: DbId,
    ) -> Result<Vec<FieldValue>, sqlx::Error> {
        list_values(pool, STUDIO_VALUES, studio_id).await
    }

    /// Upsert validated values for a profile; `null` deletes the value.
    pub async fn upsert_profile_values(
        pool: &PgPool,
        profile_id: DbId,
        values: &[FieldValueInput],
    ) -> Result<Vec<FieldValue>, sqlx::Error> {
        upsert_values(pool, PROFILE_VALUES, profile_id, values).await
    }

    /// Upsert validated values for a studio; `null` deletes the value.
    pub async fn upsert_studio_values(
        pool: &PgPool,
        studio_id: DbId,
        values: &[FieldValueInput],
    ) -> Result<Vec<FieldValue>, sqlx::Error> {
        upsert_values(pool, STUDIO_VALUES, studio_id, values).await
    }
}

async fn list_values(
    pool: &PgPool,
    target: ValueTable,
    owner_id: DbId,
) -> Result<Vec<FieldValue>, sqlx::Error> {
    let ValueTable { table, owner } = target;
    let query = format!(
        "SELECT v.id, v.{owner} AS owner_id, v.field_id, f.name, v.value,
                v.created_at, v.updated_at
         FROM {table} v
         JOIN custom_fields f ON f.id = v.field_id
         WHERE v.{owner} = $1
         ORDER BY f.sort_order, f.id"
    );
    sqlx::query_as::<_, FieldValue>(&query)
        .bind(owner_id)
        .fetch_all(pool)
        .await
}

async fn upsert_values(
    pool: &PgPool,
    target: ValueTable,
    owner_id: DbId,
    values: &[FieldValueInput],
) -> Result<Vec<FieldValue>, sqlx::Error> {
    let ValueTable { table, owner } = target;
    let delete = format!("DELETE FROM {table} WHERE {owner} = $1 AND field_id = $2");
    let upsert = format!(
        "INSERT INTO {table} ({owner}, field_id, value) VALUES ($1, $2, $3)
         ON CONFLICT ({owner}, field_id) DO UPDATE SET value = EXCLUDED.value"
    );

    let mut tx = pool.begin().await?;
    for input in values {
        if input.value.is_null() {
            sqlx::query(&delete)
                .bind(owner_id)
                .bind(input.field_id)
                .execute(&mut *tx)
                .await?;
        } else {
            sqlx::query(&upsert)
                .bind(owner_id)
                .bind(input.field_id)
                .bind(&input.value)
                .execute(&mut *tx)
                .await?;
        }
    }
    tx.commit().await?;

    list_values(pool, target, owner_id).await
}
