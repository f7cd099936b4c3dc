//! Handlers for casting calls and the applications made to them.
//!
//! Studio members manage their calls and review applications. Profile
//! owners browse open calls, apply, and withdraw their own applications.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use castline_core::casting::{
    ensure_accepting_applications, ensure_can_withdraw, ensure_review_transition,
};
use castline_core::error::CoreError;
use castline_core::types::DbId;
use castline_core::validation::{optional_non_empty, require_non_empty};
use castline_db::models::application::{CreateApplication, UpdateApplicationStatus};
use castline_db::models::casting_call::{
    CastingCall, CreateCastingCall, OpenCallParams, UpdateCastingCall,
};
use castline_db::models::status::{ApplicationStatus, CastingCallStatus, StatusId};
use castline_db::repositories::{ApplicationRepo, CastingCallRepo, ProjectRepo};
use sqlx::PgPool;

use crate::access::{ensure_member_of, profile_for_owner};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_call(pool: &PgPool, id: DbId) -> AppResult<CastingCall> {
    CastingCallRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("CastingCall", id)))
}

async fn call_for_member(pool: &PgPool, auth: &AuthUser, id: DbId) -> AppResult<CastingCall> {
    let call = find_call(pool, id).await?;
    ensure_member_of(pool, auth, call.studio_id).await?;
    Ok(call)
}

fn validate_status_id(status_id: Option<StatusId>) -> Result<(), CoreError> {
    if let Some(id) = status_id {
        CastingCallStatus::from_id(id)
            .map_err(|_| CoreError::Validation(format!("unknown casting call status id {id}")))?;
    }
    Ok(())
}

/// A call may only reference a project of its own studio.
async fn ensure_project_in_studio(
    pool: &PgPool,
    project_id: Option<DbId>,
    studio_id: DbId,
) -> AppResult<()> {
    if let Some(project_id) = project_id {
        let owner = ProjectRepo::find_by_id(pool, project_id)
            .await?
            .map(|p| p.studio_id);
        if owner != Some(studio_id) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "project {project_id} does not belong to studio {studio_id}"
            ))));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Casting calls
// ---------------------------------------------------------------------------

/// GET /api/v1/studios/{studio_id}/casting-calls
pub async fn list_studio_calls(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(studio_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_member_of(&state.pool, &auth, studio_id).await?;
    let calls = CastingCallRepo::list_by_studio(&state.pool, studio_id).await?;
    Ok(Json(DataResponse { data: calls }))
}

/// POST /api/v1/studios/{studio_id}/casting-calls
pub async fn create_call(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(studio_id): Path<DbId>,
    Json(input): Json<CreateCastingCall>,
) -> AppResult<impl IntoResponse> {
    ensure_member_of(&state.pool, &auth, studio_id).await?;
    require_non_empty(&input.title, "title")?;
    validate_status_id(input.status_id)?;
    ensure_project_in_studio(&state.pool, input.project_id, studio_id).await?;

    let call = CastingCallRepo::create(&state.pool, studio_id, &input).await?;

    tracing::info!(
        casting_call_id = call.id,
        studio_id,
        user_id = auth.user_id,
        "Casting call created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: call })))
}

/// GET /api/v1/casting-calls
///
/// Open calls across all studios, optionally filtered by `?region_id=`.
pub async fn list_open_calls(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<OpenCallParams>,
) -> AppResult<impl IntoResponse> {
    let calls = CastingCallRepo::list_open(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: calls }))
}

/// GET /api/v1/casting-calls/{id}
///
/// Open calls are visible to everyone; drafts and closed calls only to the
/// studio.
pub async fn get_call(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let call = find_call(&state.pool, id).await?;
    if call.status_id != CastingCallStatus::Open.id() {
        ensure_member_of(&state.pool, &auth, call.studio_id).await?;
    }
    Ok(Json(DataResponse { data: call }))
}

/// PUT /api/v1/casting-calls/{id}
pub async fn update_call(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCastingCall>,
) -> AppResult<impl IntoResponse> {
    let existing = call_for_member(&state.pool, &auth, id).await?;
    optional_non_empty(input.title.as_deref(), "title")?;
    validate_status_id(input.status_id)?;
    ensure_project_in_studio(&state.pool, input.project_id, existing.studio_id).await?;

    let call = CastingCallRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("CastingCall", id)))?;

    tracing::info!(casting_call_id = id, user_id = auth.user_id, "Casting call updated");

    Ok(Json(DataResponse { data: call }))
}

/// DELETE /api/v1/casting-calls/{id}
pub async fn delete_call(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    call_for_member(&state.pool, &auth, id).await?;

    CastingCallRepo::delete(&state.pool, id).await?;

    tracing::info!(casting_call_id = id, user_id = auth.user_id, "Casting call deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Applications
// ---------------------------------------------------------------------------

/// GET /api/v1/casting-calls/{id}/applications
pub async fn list_applications(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    call_for_member(&state.pool, &auth, id).await?;
    let applications = ApplicationRepo::list_by_call(&state.pool, id).await?;
    Ok(Json(DataResponse { data: applications }))
}

/// POST /api/v1/casting-calls/{id}/applications
///
/// Apply with one of the caller's profiles. One application per profile
/// per call.
pub async fn apply(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateApplication>,
) -> AppResult<impl IntoResponse> {
    profile_for_owner(&state.pool, &auth, input.profile_id).await?;
    let call = find_call(&state.pool, id).await?;
    ensure_accepting_applications(
        CastingCallStatus::from_id(call.status_id)?,
        call.deadline,
        chrono::Utc::now(),
    )?;

    let application = ApplicationRepo::create(
        &state.pool,
        id,
        input.profile_id,
        input.cover_note.as_deref(),
    )
    .await?;

    tracing::info!(
        application_id = application.id,
        casting_call_id = id,
        profile_id = input.profile_id,
        user_id = auth.user_id,
        "Application submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

/// PATCH /api/v1/applications/{id}
///
/// Reviewers (studio members) move applications through review; the
/// applicant may only withdraw.
pub async fn update_application(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateApplicationStatus>,
) -> AppResult<impl IntoResponse> {
    let application = ApplicationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Application", id)))?;
    let current = ApplicationStatus::from_id(application.status_id)?;
    let next = ApplicationStatus::from_name(&input.status)?;

    if next == ApplicationStatus::Withdrawn {
        profile_for_owner(&state.pool, &auth, application.profile_id).await?;
        ensure_can_withdraw(current)?;
    } else {
        call_for_member(&state.pool, &auth, application.casting_call_id).await?;
        ensure_review_transition(current, next)?;
    }

    let updated = ApplicationRepo::set_status(&state.pool, id, current.id(), next.id())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Application status changed concurrently".into(),
            ))
        })?;

    tracing::info!(
        application_id = id,
        status = next.name(),
        user_id = auth.user_id,
        "Application status changed"
    );

    Ok(Json(DataResponse { data: updated }))
}

/// GET /api/v1/profiles/{id}/applications
pub async fn list_profile_applications(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(profile_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    profile_for_owner(&state.pool, &auth, profile_id).await?;
    let applications = ApplicationRepo::list_by_profile(&state.pool, profile_id).await?;
    Ok(Json(DataResponse { data: applications }))
}
