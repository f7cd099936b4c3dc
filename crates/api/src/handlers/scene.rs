//! Handlers for scenes and what is attached to them: talent requirements,
//! cast profiles and cast external actors.
//!
//! Every endpoint requires membership of the studio that owns the scene's
//! project.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use castline_core::error::CoreError;
use castline_core::profile::validate_height_range;
use castline_core::types::DbId;
use castline_core::validation::{optional_non_empty, require_non_empty};
use castline_db::models::scene::{
    AddSceneExternalActor, AddSceneTalent, CreateScene, CreateTalentRequirement, Scene,
    TalentRequirement, UpdateScene, UpdateTalentRequirement,
};
use castline_db::repositories::{
    ExternalActorRepo, SceneExternalActorRepo, SceneRepo, SceneTalentRepo, TalentRequirementRepo,
};
use sqlx::PgPool;

use super::project::project_for_member;
use crate::access::ensure_member_of;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn scene_for_member(pool: &PgPool, auth: &AuthUser, id: DbId) -> AppResult<Scene> {
    let scene = SceneRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Scene", id)))?;
    let studio_id = SceneRepo::find_studio_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Scene", id)))?;
    ensure_member_of(pool, auth, studio_id).await?;
    Ok(scene)
}

async fn requirement_for_member(
    pool: &PgPool,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<TalentRequirement> {
    let requirement = TalentRequirementRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("TalentRequirement", id)))?;
    scene_for_member(pool, auth, requirement.scene_id).await?;
    Ok(requirement)
}

fn validate_quantity(quantity: Option<i32>) -> Result<(), CoreError> {
    match quantity {
        Some(q) if q < 1 => Err(CoreError::Validation(format!(
            "quantity must be at least 1, got {q}"
        ))),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Scenes
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{project_id}/scenes
pub async fn list_scenes(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    project_for_member(&state.pool, &auth, project_id).await?;
    let scenes = SceneRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: scenes }))
}

/// POST /api/v1/projects/{project_id}/scenes
pub async fn create_scene(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateScene>,
) -> AppResult<impl IntoResponse> {
    project_for_member(&state.pool, &auth, project_id).await?;
    require_non_empty(&input.name, "name")?;

    let scene = SceneRepo::create(&state.pool, project_id, &input).await?;

    tracing::info!(
        scene_id = scene.id,
        project_id,
        user_id = auth.user_id,
        "Scene created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: scene })))
}

/// GET /api/v1/scenes/{id}
pub async fn get_scene(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let scene = scene_for_member(&state.pool, &auth, id).await?;
    Ok(Json(DataResponse { data: scene }))
}

/// PUT /api/v1/scenes/{id}
pub async fn update_scene(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateScene>,
) -> AppResult<impl IntoResponse> {
    scene_for_member(&state.pool, &auth, id).await?;
    optional_non_empty(input.name.as_deref(), "name")?;

    let scene = SceneRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Scene", id)))?;

    tracing::info!(scene_id = id, user_id = auth.user_id, "Scene updated");

    Ok(Json(DataResponse { data: scene }))
}

/// DELETE /api/v1/scenes/{id}
pub async fn delete_scene(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    scene_for_member(&state.pool, &auth, id).await?;

    SceneRepo::delete(&state.pool, id).await?;

    tracing::info!(scene_id = id, user_id = auth.user_id, "Scene deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Talent requirements
// ---------------------------------------------------------------------------

/// GET /api/v1/scenes/{scene_id}/requirements
pub async fn list_requirements(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(scene_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    scene_for_member(&state.pool, &auth, scene_id).await?;
    let requirements = TalentRequirementRepo::list_by_scene(&state.pool, scene_id).await?;
    Ok(Json(DataResponse { data: requirements }))
}

/// POST /api/v1/scenes/{scene_id}/requirements
pub async fn create_requirement(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(scene_id): Path<DbId>,
    Json(input): Json<CreateTalentRequirement>,
) -> AppResult<impl IntoResponse> {
    scene_for_member(&state.pool, &auth, scene_id).await?;
    require_non_empty(&input.role_name, "role_name")?;
    validate_quantity(input.quantity)?;
    validate_height_range(input.min_height_cm, input.max_height_cm)?;

    let requirement = TalentRequirementRepo::create(&state.pool, scene_id, &input).await?;

    tracing::info!(
        requirement_id = requirement.id,
        scene_id,
        user_id = auth.user_id,
        "Talent requirement created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: requirement })))
}

/// PUT /api/v1/requirements/{id}
pub async fn update_requirement(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTalentRequirement>,
) -> AppResult<impl IntoResponse> {
    let existing = requirement_for_member(&state.pool, &auth, id).await?;
    optional_non_empty(input.role_name.as_deref(), "role_name")?;
    validate_quantity(input.quantity)?;
    validate_height_range(
        input.min_height_cm.or(existing.min_height_cm),
        input.max_height_cm.or(existing.max_height_cm),
    )?;

    let requirement = TalentRequirementRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("TalentRequirement", id)))?;

    tracing::info!(requirement_id = id, user_id = auth.user_id, "Talent requirement updated");

    Ok(Json(DataResponse { data: requirement }))
}

/// DELETE /api/v1/requirements/{id}
pub async fn delete_requirement(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    requirement_for_member(&state.pool, &auth, id).await?;

    TalentRequirementRepo::delete(&state.pool, id).await?;

    tracing::info!(requirement_id = id, user_id = auth.user_id, "Talent requirement deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Cast profiles
// ---------------------------------------------------------------------------

/// GET /api/v1/scenes/{scene_id}/talent
pub async fn list_talent(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(scene_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    scene_for_member(&state.pool, &auth, scene_id).await?;
    let talent = SceneTalentRepo::list_by_scene(&state.pool, scene_id).await?;
    Ok(Json(DataResponse { data: talent }))
}

/// POST /api/v1/scenes/{scene_id}/talent
///
/// Cast a profile, optionally against one of the scene's requirements.
pub async fn add_talent(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(scene_id): Path<DbId>,
    Json(input): Json<AddSceneTalent>,
) -> AppResult<impl IntoResponse> {
    scene_for_member(&state.pool, &auth, scene_id).await?;
    if let Some(requirement_id) = input.talent_requirement_id {
        let requirement = TalentRequirementRepo::find_by_id(&state.pool, requirement_id).await?;
        if requirement.map(|r| r.scene_id) != Some(scene_id) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "talent requirement {requirement_id} does not belong to scene {scene_id}"
            ))));
        }
    }

    let talent = SceneTalentRepo::add(&state.pool, scene_id, &input).await?;

    tracing::info!(
        scene_id,
        profile_id = input.profile_id,
        user_id = auth.user_id,
        "Talent cast"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: talent })))
}

/// DELETE /api/v1/scenes/{scene_id}/talent/{profile_id}
pub async fn remove_talent(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((scene_id, profile_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    scene_for_member(&state.pool, &auth, scene_id).await?;

    if !SceneTalentRepo::remove(&state.pool, scene_id, profile_id).await? {
        return Err(AppError::Core(CoreError::not_found("SceneTalent", profile_id)));
    }

    tracing::info!(scene_id, profile_id, user_id = auth.user_id, "Talent uncast");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Cast external actors
// ---------------------------------------------------------------------------

/// GET /api/v1/scenes/{scene_id}/external-actors
pub async fn list_scene_actors(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(scene_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    scene_for_member(&state.pool, &auth, scene_id).await?;
    let actors = SceneExternalActorRepo::list_by_scene(&state.pool, scene_id).await?;
    Ok(Json(DataResponse { data: actors }))
}

/// POST /api/v1/scenes/{scene_id}/external-actors
///
/// The actor must belong to the same studio as the scene.
pub async fn add_scene_actor(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(scene_id): Path<DbId>,
    Json(input): Json<AddSceneExternalActor>,
) -> AppResult<impl IntoResponse> {
    scene_for_member(&state.pool, &auth, scene_id).await?;
    let scene_studio = SceneRepo::find_studio_id(&state.pool, scene_id).await?;
    let actor_studio = ExternalActorRepo::find_by_id(&state.pool, input.external_actor_id)
        .await?
        .map(|a| a.studio_id);
    if actor_studio.is_none() || actor_studio != scene_studio {
        return Err(AppError::Core(CoreError::Validation(format!(
            "external actor {} does not belong to this studio",
            input.external_actor_id
        ))));
    }

    let cast = SceneExternalActorRepo::add(&state.pool, scene_id, &input).await?;

    tracing::info!(
        scene_id,
        external_actor_id = input.external_actor_id,
        user_id = auth.user_id,
        "External actor cast"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: cast })))
}

/// DELETE /api/v1/scenes/{scene_id}/external-actors/{actor_id}
pub async fn remove_scene_actor(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((scene_id, actor_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    scene_for_member(&state.pool, &auth, scene_id).await?;

    if !SceneExternalActorRepo::remove(&state.pool, scene_id, actor_id).await? {
        return Err(AppError::Core(CoreError::not_found("SceneExternalActor", actor_id)));
    }

    tracing::info!(
        scene_id,
        external_actor_id = actor_id,
        user_id = auth.user_id,
        "External actor uncast"
    );

    Ok(StatusCode::NO_CONTENT)
}
