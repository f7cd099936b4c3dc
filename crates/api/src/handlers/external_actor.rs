//! Handlers for a studio's external actors: contacts who are not platform
//! users yet.
//!
//! Covers CRUD, CSV import, invitation and conversion into a user with a
//! profile. All endpoints require studio membership.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use castline_core::error::CoreError;
use castline_core::external_actor::{ensure_transition, parse_actor_csv};
use castline_core::types::DbId;
use castline_core::validation::{
    normalize_email, optional_non_empty, require_non_empty, validate_email,
};
use castline_db::models::external_actor::{
    ConvertExternalActor, ConvertOutcome, CreateExternalActor, ExternalActor,
    ImportExternalActors, ImportSummary, UpdateExternalActor,
};
use castline_db::models::status::ExternalActorStatus;
use castline_db::repositories::ExternalActorRepo;
use sqlx::PgPool;

use crate::access::ensure_member_of;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ActorListParams;
use crate::response::DataResponse;
use crate::state::AppState;

async fn actor_for_member(pool: &PgPool, auth: &AuthUser, id: DbId) -> AppResult<ExternalActor> {
    let actor = ExternalActorRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("ExternalActor", id)))?;
    ensure_member_of(pool, auth, actor.studio_id).await?;
    Ok(actor)
}

fn clean_email(email: Option<&str>) -> Result<Option<String>, CoreError> {
    match email.map(str::trim).filter(|e| !e.is_empty()) {
        Some(email) => {
            validate_email(email, "email")?;
            Ok(Some(normalize_email(email)))
        }
        None => Ok(None),
    }
}

/// GET /api/v1/studios/{studio_id}/external-actors
pub async fn list_actors(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(studio_id): Path<DbId>,
    Query(params): Query<ActorListParams>,
) -> AppResult<impl IntoResponse> {
    ensure_member_of(&state.pool, &auth, studio_id).await?;
    let status_id = params
        .status
        .as_deref()
        .map(ExternalActorStatus::from_name)
        .transpose()?
        .map(ExternalActorStatus::id);

    let actors = ExternalActorRepo::list_by_studio(&state.pool, studio_id, status_id).await?;
    Ok(Json(DataResponse { data: actors }))
}

/// POST /api/v1/studios/{studio_id}/external-actors
pub async fn create_actor(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(studio_id): Path<DbId>,
    Json(input): Json<CreateExternalActor>,
) -> AppResult<impl IntoResponse> {
    ensure_member_of(&state.pool, &auth, studio_id).await?;
    require_non_empty(&input.first_name, "first_name")?;
    let input = CreateExternalActor {
        email: clean_email(input.email.as_deref())?,
        ..input
    };

    let actor = ExternalActorRepo::create(&state.pool, studio_id, &input).await?;

    tracing::info!(
        external_actor_id = actor.id,
        studio_id,
        user_id = auth.user_id,
        "External actor created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: actor })))
}

/// POST /api/v1/studios/{studio_id}/external-actors/import
///
/// Import actors from CSV text. Malformed rows are reported, rows whose
/// email already exists in the studio are skipped, the rest are created.
pub async fn import_actors(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(studio_id): Path<DbId>,
    Json(input): Json<ImportExternalActors>,
) -> AppResult<impl IntoResponse> {
    ensure_member_of(&state.pool, &auth, studio_id).await?;

    let parsed = parse_actor_csv(&input.csv)?;
    let created = ExternalActorRepo::create_many(&state.pool, studio_id, &parsed.actors).await?;
    let summary = ImportSummary {
        skipped_existing: parsed.actors.len() - created.len(),
        created,
        errors: parsed.errors,
    };

    tracing::info!(
        studio_id,
        created = summary.created.len(),
        skipped = summary.skipped_existing,
        rejected = summary.errors.len(),
        user_id = auth.user_id,
        "External actors imported"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: summary })))
}

/// GET /api/v1/external-actors/{id}
pub async fn get_actor(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let actor = actor_for_member(&state.pool, &auth, id).await?;
    Ok(Json(DataResponse { data: actor }))
}

/// PUT /api/v1/external-actors/{id}
pub async fn update_actor(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateExternalActor>,
) -> AppResult<impl IntoResponse> {
    actor_for_member(&state.pool, &auth, id).await?;
    optional_non_empty(input.first_name.as_deref(), "first_name")?;
    let input = UpdateExternalActor {
        email: clean_email(input.email.as_deref())?,
        ..input
    };

    let actor = ExternalActorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("ExternalActor", id)))?;

    tracing::info!(external_actor_id = id, user_id = auth.user_id, "External actor updated");

    Ok(Json(DataResponse { data: actor }))
}

/// DELETE /api/v1/external-actors/{id}
pub async fn delete_actor(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    actor_for_member(&state.pool, &auth, id).await?;

    ExternalActorRepo::delete(&state.pool, id).await?;

    tracing::info!(external_actor_id = id, user_id = auth.user_id, "External actor deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/external-actors/{id}/invite
///
/// Record that the actor was invited to join. Re-inviting refreshes
/// `invited_at`; converted actors cannot be invited.
pub async fn invite_actor(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let actor = actor_for_member(&state.pool, &auth, id).await?;
    if actor.email.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "External actor has no email to invite".into(),
        )));
    }
    ensure_transition(
        ExternalActorStatus::from_id(actor.status_id)?,
        ExternalActorStatus::Invited,
    )?;

    let actor = ExternalActorRepo::mark_invited(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict("External actor is already converted".into()))
        })?;

    tracing::info!(external_actor_id = id, user_id = auth.user_id, "External actor invited");

    Ok(Json(DataResponse { data: actor }))
}

/// POST /api/v1/external-actors/{id}/convert
///
/// Turn the actor into a platform user with a profile. An existing user
/// with the same email is reused only when the caller is an admin.
pub async fn convert_actor(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ConvertExternalActor>,
) -> AppResult<impl IntoResponse> {
    let actor = actor_for_member(&state.pool, &auth, id).await?;
    ensure_transition(
        ExternalActorStatus::from_id(actor.status_id)?,
        ExternalActorStatus::Converted,
    )?;

    let email = clean_email(input.email.as_deref().or(actor.email.as_deref()))?.ok_or_else(
        || AppError::Core(CoreError::Validation("email is required to convert".into())),
    )?;
    let display_name = match input.display_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => match actor.last_name.as_deref() {
            Some(last) => format!("{} {last}", actor.first_name),
            None => actor.first_name.clone(),
        },
    };

    // Only admins may attach an actor to an account that already exists.
    let outcome =
        ExternalActorRepo::convert(&state.pool, id, &email, &display_name, auth.is_admin())
            .await?;
    let conversion = match outcome {
        ConvertOutcome::Converted(conversion) => conversion,
        ConvertOutcome::NotConvertible => {
            return Err(AppError::Core(CoreError::Conflict(
                "External actor is already converted".into(),
            )))
        }
        ConvertOutcome::EmailInUse => {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "{email} already belongs to an account; ask an admin to link it"
            ))))
        }
    };

    tracing::info!(
        external_actor_id = id,
        converted_user_id = conversion.user_id,
        profile_id = conversion.profile_id,
        created_user = conversion.created_user,
        user_id = auth.user_id,
        "External actor converted"
    );

    Ok(Json(DataResponse { data: conversion }))
}
