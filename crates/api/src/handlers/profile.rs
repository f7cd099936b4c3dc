//! Handlers for talent profiles, their skills and their regions.
//!
//! Public profiles are visible to every authenticated caller; private ones
//! only to their owner and admins. Only the owner (or an admin) edits.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use castline_core::error::CoreError;
use castline_core::profile::{validate_profile_attributes, Availability};
use castline_core::types::DbId;
use castline_core::validation::{optional_non_empty, require_non_empty};
use castline_db::models::profile::{
    CreateProfile, ProfileDetail, ProfileSearchParams, SetProfileRegions, SetProfileSkills,
    UpdateProfile,
};
use castline_db::repositories::ProfileRepo;

use crate::access::{can_view_profile, profile_for_owner};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/profiles
///
/// Talent search filtered by `?region_id=&skill_id=&availability=`.
pub async fn search_profiles(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ProfileSearchParams>,
) -> AppResult<impl IntoResponse> {
    let availability = params
        .availability
        .as_deref()
        .map(Availability::parse)
        .transpose()?
        .map(|a| a.as_str().to_string());
    let params = ProfileSearchParams {
        availability,
        ..params
    };

    let profiles = ProfileRepo::search(&state.pool, &params, auth.is_admin()).await?;
    Ok(Json(DataResponse { data: profiles }))
}

/// POST /api/v1/profiles
///
/// Each user has at most one profile. Non-admins may only create their own.
pub async fn create_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProfile>,
) -> AppResult<impl IntoResponse> {
    if !auth.is_admin() && input.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot create a profile for another user".into(),
        )));
    }
    require_non_empty(&input.display_name, "display_name")?;
    validate_profile_attributes(
        input.height_cm,
        input.availability.as_deref(),
        input.bio.as_deref(),
    )?;

    let profile = ProfileRepo::create(&state.pool, &input).await?;

    tracing::info!(profile_id = profile.id, user_id = auth.user_id, "Profile created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: profile })))
}

/// GET /api/v1/profiles/{id}
///
/// The profile with its skills and regions.
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let profile = ProfileRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|p| can_view_profile(&auth, p))
        .ok_or(AppError::Core(CoreError::not_found("Profile", id)))?;

    let skills = ProfileRepo::list_skills(&state.pool, id).await?;
    let regions = ProfileRepo::list_regions(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: ProfileDetail {
            profile,
            skills,
            regions,
        },
    }))
}

/// PUT /api/v1/profiles/{id}
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    profile_for_owner(&state.pool, &auth, id).await?;
    optional_non_empty(input.display_name.as_deref(), "display_name")?;
    validate_profile_attributes(
        input.height_cm,
        input.availability.as_deref(),
        input.bio.as_deref(),
    )?;

    let profile = ProfileRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Profile", id)))?;

    tracing::info!(profile_id = id, user_id = auth.user_id, "Profile updated");

    Ok(Json(DataResponse { data: profile }))
}

/// DELETE /api/v1/profiles/{id}
///
/// Refused while an external actor record still points at the profile.
pub async fn delete_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    profile_for_owner(&state.pool, &auth, id).await?;

    ProfileRepo::delete(&state.pool, id).await?;

    tracing::info!(profile_id = id, user_id = auth.user_id, "Profile deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/profiles/{id}/skills
///
/// Replace the profile's skill set.
pub async fn set_skills(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetProfileSkills>,
) -> AppResult<impl IntoResponse> {
    profile_for_owner(&state.pool, &auth, id).await?;

    let skills = ProfileRepo::set_skills(&state.pool, id, &input.skill_ids).await?;

    tracing::info!(
        profile_id = id,
        skill_count = skills.len(),
        user_id = auth.user_id,
        "Profile skills replaced"
    );

    Ok(Json(DataResponse { data: skills }))
}

/// PUT /api/v1/profiles/{id}/regions
///
/// Replace the profile's regions.
pub async fn set_regions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetProfileRegions>,
) -> AppResult<impl IntoResponse> {
    profile_for_owner(&state.pool, &auth, id).await?;

    let regions = ProfileRepo::set_regions(&state.pool, id, &input.region_ids).await?;

    tracing::info!(
        profile_id = id,
        region_count = regions.len(),
        user_id = auth.user_id,
        "Profile regions replaced"
    );

    Ok(Json(DataResponse { data: regions }))
}
