//! Handlers for custom field values on profiles and studios.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use castline_core::custom_field::{validate_field_value, EntityType, FieldSpec};
use castline_core::error::CoreError;
use castline_core::types::DbId;
use castline_db::models::custom_field::SetFieldValues;
use castline_db::repositories::{CustomFieldRepo, FieldValueRepo, ProfileRepo, StudioRepo};
use sqlx::PgPool;

use crate::access::{can_view_profile, profile_for_owner, studio_for_member};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Check every submitted value against the active definitions for `entity`.
///
/// Unknown or inactive field ids and duplicate ids are rejected.
async fn validate_values(
    pool: &PgPool,
    entity: EntityType,
    input: &SetFieldValues,
) -> AppResult<()> {
    let fields = CustomFieldRepo::list_for_entity(pool, entity.as_str()).await?;
    let specs = fields
        .iter()
        .map(|f| f.spec().map(|spec| (f.id, spec)))
        .collect::<Result<HashMap<DbId, FieldSpec>, CoreError>>()?;

    let mut seen = Vec::with_capacity(input.values.len());
    for value in &input.values {
        let spec = specs.get(&value.field_id).ok_or_else(|| {
            CoreError::Validation(format!(
                "Field {} is not an active {} field",
                value.field_id,
                entity.as_str()
            ))
        })?;
        if seen.contains(&value.field_id) {
            return Err(AppError::BadRequest(format!(
                "Field {} appears more than once",
                value.field_id
            )));
        }
        seen.push(value.field_id);
        validate_field_value(spec, &value.value)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// GET /api/v1/profiles/{id}/field-values
pub async fn list_profile_values(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ProfileRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|p| can_view_profile(&auth, p))
        .ok_or(AppError::Core(CoreError::not_found("Profile", id)))?;

    let values = FieldValueRepo::list_for_profile(&state.pool, id).await?;
    Ok(Json(DataResponse { data: values }))
}

/// PUT /api/v1/profiles/{id}/field-values
///
/// Upsert the given values; fields not mentioned are left alone.
pub async fn set_profile_values(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetFieldValues>,
) -> AppResult<impl IntoResponse> {
    profile_for_owner(&state.pool, &auth, id).await?;
    validate_values(&state.pool, EntityType::Profile, &input).await?;

    let values = FieldValueRepo::upsert_profile_values(&state.pool, id, &input.values).await?;

    tracing::info!(profile_id = id, user_id = auth.user_id, "Profile field values saved");

    Ok(Json(DataResponse { data: values }))
}

// ---------------------------------------------------------------------------
// Studios
// ---------------------------------------------------------------------------

/// GET /api/v1/studios/{id}/field-values
pub async fn list_studio_values(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    StudioRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Studio", id)))?;

    let values = FieldValueRepo::list_for_studio(&state.pool, id).await?;
    Ok(Json(DataResponse { data: values }))
}

/// PUT /api/v1/studios/{id}/field-values
pub async fn set_studio_values(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetFieldValues>,
) -> AppResult<impl IntoResponse> {
    studio_for_member(&state.pool, &auth, id).await?;
    validate_values(&state.pool, EntityType::Studio, &input).await?;

    let values = FieldValueRepo::upsert_studio_values(&state.pool, id, &input.values).await?;

    tracing::info!(studio_id = id, user_id = auth.user_id, "Studio field values saved");

    Ok(Json(DataResponse { data: values }))
}
