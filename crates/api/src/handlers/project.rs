//! Handlers for studio projects.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use castline_core::error::CoreError;
use castline_core::types::DbId;
use castline_core::validation::{optional_non_empty, require_non_empty};
use castline_db::models::project::{CreateProject, Project, UpdateProject};
use castline_db::models::status::ProjectStatus;
use castline_db::repositories::ProjectRepo;
use sqlx::PgPool;

use crate::access::ensure_member_of;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a project and require studio membership.
pub(crate) async fn project_for_member(
    pool: &PgPool,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Project", id)))?;
    ensure_member_of(pool, auth, project.studio_id).await?;
    Ok(project)
}

/// GET /api/v1/studios/{studio_id}/projects
pub async fn list_projects(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(studio_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_member_of(&state.pool, &auth, studio_id).await?;
    let projects = ProjectRepo::list_by_studio(&state.pool, studio_id).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// POST /api/v1/studios/{studio_id}/projects
pub async fn create_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(studio_id): Path<DbId>,
    Json(input): Json<CreateProject>,
) -> AppResult<impl IntoResponse> {
    ensure_member_of(&state.pool, &auth, studio_id).await?;
    require_non_empty(&input.name, "name")?;
    if let Some(status_id) = input.status_id {
        ProjectStatus::from_id(status_id).map_err(|_| invalid_status(status_id))?;
    }
    input.schedule().validate()?;

    let project = ProjectRepo::create(&state.pool, studio_id, &input).await?;

    tracing::info!(
        project_id = project.id,
        studio_id,
        user_id = auth.user_id,
        "Project created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{id}
pub async fn get_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = project_for_member(&state.pool, &auth, id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
pub async fn update_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<impl IntoResponse> {
    let existing = project_for_member(&state.pool, &auth, id).await?;
    optional_non_empty(input.name.as_deref(), "name")?;
    if let Some(status_id) = input.status_id {
        ProjectStatus::from_id(status_id).map_err(|_| invalid_status(status_id))?;
    }
    existing.schedule_after(&input).validate()?;

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Project", id)))?;

    tracing::info!(project_id = id, user_id = auth.user_id, "Project updated");

    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    project_for_member(&state.pool, &auth, id).await?;

    ProjectRepo::delete(&state.pool, id).await?;

    tracing::info!(project_id = id, user_id = auth.user_id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}

fn invalid_status(status_id: i16) -> CoreError {
    CoreError::Validation(format!("unknown project status id {status_id}"))
}
