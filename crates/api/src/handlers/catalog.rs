//! Handlers for platform catalogs: skills, regions, locations and custom
//! field definitions.
//!
//! Everyone signed in can read the catalogs. Only admins change them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use castline_core::custom_field::{validate_field_definition, EntityType};
use castline_core::error::CoreError;
use castline_core::types::DbId;
use castline_core::validation::{optional_non_empty, require_non_empty};
use castline_db::models::custom_field::{CreateCustomField, CustomFieldParams, UpdateCustomField};
use castline_db::models::region::{CreateRegion, SaveLocation, UpdateRegion};
use castline_db::models::skill::CreateSkill;
use castline_db::repositories::{CustomFieldRepo, LocationRepo, RegionRepo, SkillRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Region codes are short uppercase identifiers such as `LA` or `NYC`.
fn validate_region_code(code: &str) -> AppResult<()> {
    let valid = (2..=10).contains(&code.len())
        && code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "code must be 2-10 uppercase letters, digits or dashes, got '{code}'"
        ))))
    }
}

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

/// GET /api/v1/skills
pub async fn list_skills(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let skills = SkillRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: skills }))
}

/// POST /api/v1/skills
pub async fn create_skill(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateSkill>,
) -> AppResult<impl IntoResponse> {
    require_non_empty(&input.name, "name")?;

    let skill = SkillRepo::create(&state.pool, &input).await?;

    tracing::info!(skill_id = skill.id, user_id = admin.user_id, "Skill created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: skill })))
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// GET /api/v1/regions
///
/// Inactive regions are listed only with `?include_inactive=true`.
pub async fn list_regions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let regions = RegionRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: regions }))
}

/// POST /api/v1/regions
pub async fn create_region(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateRegion>,
) -> AppResult<impl IntoResponse> {
    require_non_empty(&input.name, "name")?;
    validate_region_code(&input.code)?;

    let region = RegionRepo::create(&state.pool, &input).await?;

    tracing::info!(region_id = region.id, user_id = admin.user_id, "Region created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: region })))
}

/// GET /api/v1/regions/{id}
pub async fn get_region(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let region = RegionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Region", id)))?;
    Ok(Json(DataResponse { data: region }))
}

/// PUT /api/v1/regions/{id}
pub async fn update_region(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRegion>,
) -> AppResult<impl IntoResponse> {
    optional_non_empty(input.name.as_deref(), "name")?;
    if let Some(code) = input.code.as_deref() {
        validate_region_code(code)?;
    }

    let region = RegionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Region", id)))?;

    tracing::info!(region_id = id, user_id = admin.user_id, "Region updated");

    Ok(Json(DataResponse { data: region }))
}

/// DELETE /api/v1/regions/{id}
///
/// Refused while plans or subscriptions still reference the region.
pub async fn delete_region(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !RegionRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Region", id)));
    }

    tracing::info!(region_id = id, user_id = admin.user_id, "Region deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// GET /api/v1/regions/{id}/locations
pub async fn list_locations(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(region_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let locations = LocationRepo::list_by_region(&state.pool, region_id).await?;
    Ok(Json(DataResponse { data: locations }))
}

/// POST /api/v1/regions/{id}/locations
pub async fn create_location(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(region_id): Path<DbId>,
    Json(input): Json<SaveLocation>,
) -> AppResult<impl IntoResponse> {
    require_non_empty(&input.name, "name")?;
    RegionRepo::find_by_id(&state.pool, region_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Region", region_id)))?;

    let location = LocationRepo::create(&state.pool, region_id, &input).await?;

    tracing::info!(
        location_id = location.id,
        region_id,
        user_id = admin.user_id,
        "Location created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: location })))
}

/// PUT /api/v1/locations/{id}
pub async fn update_location(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SaveLocation>,
) -> AppResult<impl IntoResponse> {
    require_non_empty(&input.name, "name")?;

    let location = LocationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Location", id)))?;

    tracing::info!(location_id = id, user_id = admin.user_id, "Location updated");

    Ok(Json(DataResponse { data: location }))
}

/// DELETE /api/v1/locations/{id}
pub async fn delete_location(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !LocationRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Location", id)));
    }

    tracing::info!(location_id = id, user_id = admin.user_id, "Location deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Custom field definitions
// ---------------------------------------------------------------------------

/// GET /api/v1/custom-fields
///
/// Filter with `?entity_type=profile|studio&include_inactive=true`.
pub async fn list_custom_fields(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CustomFieldParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(entity) = params.entity_type.as_deref() {
        EntityType::parse(entity)?;
    }
    let fields = CustomFieldRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: fields }))
}

/// POST /api/v1/custom-fields
pub async fn create_custom_field(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCustomField>,
) -> AppResult<impl IntoResponse> {
    let entity = EntityType::parse(&input.entity_type)?;
    let field_type =
        validate_field_definition(&input.name, &input.label, &input.field_type, &input.options)?;
    let input = CreateCustomField {
        entity_type: entity.as_str().to_string(),
        field_type: field_type.as_str().to_string(),
        ..input
    };

    let field = CustomFieldRepo::create(&state.pool, &input).await?;

    tracing::info!(
        field_id = field.id,
        entity_type = %field.entity_type,
        user_id = admin.user_id,
        "Custom field created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: field })))
}

/// PUT /api/v1/custom-fields/{id}
///
/// Options are re-validated against the stored field type.
pub async fn update_custom_field(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCustomField>,
) -> AppResult<impl IntoResponse> {
    let existing = CustomFieldRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("CustomField", id)))?;

    if input.label.is_some() || input.options.is_some() {
        let spec = existing.spec()?;
        let label = input.label.as_deref().unwrap_or(&existing.label);
        let options = input.options.as_ref().unwrap_or(&spec.options);
        validate_field_definition(&existing.name, label, &existing.field_type, options)?;
    }

    let field = CustomFieldRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("CustomField", id)))?;

    tracing::info!(field_id = id, user_id = admin.user_id, "Custom field updated");

    Ok(Json(DataResponse { data: field }))
}

/// DELETE /api/v1/custom-fields/{id}
///
/// Also removes every stored value for the field.
pub async fn delete_custom_field(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CustomFieldRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("CustomField", id)));
    }

    tracing::info!(field_id = id, user_id = admin.user_id, "Custom field deleted");

    Ok(StatusCode::NO_CONTENT)
}
