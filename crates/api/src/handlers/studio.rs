//! Handlers for studios.
//!
//! A studio belongs to exactly one tenant. Members of that tenant (and
//! admins) manage it; every authenticated caller can browse studios.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use castline_core::error::CoreError;
use castline_core::types::DbId;
use castline_core::validation::{optional_non_empty, require_non_empty, validate_email};
use castline_db::models::studio::{CreateStudio, UpdateStudio};
use castline_db::repositories::{StudioRepo, UserRepo};

use crate::access::studio_for_member;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/studios
pub async fn list_studios(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let studios = StudioRepo::list(&state.pool, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: studios }))
}

/// POST /api/v1/studios
///
/// Admins may create a studio for any tenant; other callers only for
/// their own tenant.
pub async fn create_studio(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateStudio>,
) -> AppResult<impl IntoResponse> {
    if !auth.is_admin() {
        let own_tenant = UserRepo::find_by_id(&state.pool, auth.user_id)
            .await?
            .and_then(|u| u.tenant_id);
        if own_tenant != Some(input.tenant_id) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Cannot create a studio for another tenant".into(),
            )));
        }
    }
    require_non_empty(&input.name, "name")?;
    if let Some(email) = input.contact_email.as_deref() {
        validate_email(email, "contact_email")?;
    }

    let studio = StudioRepo::create(&state.pool, &input).await?;

    tracing::info!(studio_id = studio.id, user_id = auth.user_id, "Studio created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: studio })))
}

/// GET /api/v1/studios/{id}
pub async fn get_studio(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let studio = StudioRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Studio", id)))?;
    Ok(Json(DataResponse { data: studio }))
}

/// PUT /api/v1/studios/{id}
pub async fn update_studio(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStudio>,
) -> AppResult<impl IntoResponse> {
    studio_for_member(&state.pool, &auth, id).await?;
    optional_non_empty(input.name.as_deref(), "name")?;
    if let Some(email) = input.contact_email.as_deref() {
        validate_email(email, "contact_email")?;
    }

    let studio = StudioRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Studio", id)))?;

    tracing::info!(studio_id = id, user_id = auth.user_id, "Studio updated");

    Ok(Json(DataResponse { data: studio }))
}

/// DELETE /api/v1/studios/{id}
///
/// Cascades to the studio's projects, calls, actors, questionnaires and codes.
pub async fn delete_studio(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    studio_for_member(&state.pool, &auth, id).await?;

    StudioRepo::delete(&state.pool, id).await?;

    tracing::info!(studio_id = id, user_id = auth.user_id, "Studio deleted");

    Ok(StatusCode::NO_CONTENT)
}
