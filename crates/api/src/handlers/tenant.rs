//! Handlers for tenants. Admin only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use castline_core::error::CoreError;
use castline_core::types::DbId;
use castline_core::validation::{optional_non_empty, require_non_empty, validate_slug};
use castline_db::models::tenant::{CreateTenant, UpdateTenant};
use castline_db::repositories::TenantRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tenants
pub async fn list_tenants(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let tenants = TenantRepo::list(&state.pool, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: tenants }))
}

/// POST /api/v1/tenants
pub async fn create_tenant(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTenant>,
) -> AppResult<impl IntoResponse> {
    require_non_empty(&input.name, "name")?;
    validate_slug(&input.slug, "slug")?;

    let tenant = TenantRepo::create(&state.pool, &input).await?;

    tracing::info!(tenant_id = tenant.id, user_id = admin.user_id, "Tenant created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: tenant })))
}

/// GET /api/v1/tenants/{id}
pub async fn get_tenant(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tenant = TenantRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Tenant", id)))?;
    Ok(Json(DataResponse { data: tenant }))
}

/// PUT /api/v1/tenants/{id}
pub async fn update_tenant(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTenant>,
) -> AppResult<impl IntoResponse> {
    optional_non_empty(input.name.as_deref(), "name")?;
    if let Some(slug) = input.slug.as_deref() {
        validate_slug(slug, "slug")?;
    }

    let tenant = TenantRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Tenant", id)))?;

    tracing::info!(tenant_id = id, user_id = admin.user_id, "Tenant updated");

    Ok(Json(DataResponse { data: tenant }))
}

/// DELETE /api/v1/tenants/{id}
///
/// Removes the tenant's studio and everything under it.
pub async fn delete_tenant(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TenantRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Tenant", id)));
    }

    tracing::info!(tenant_id = id, user_id = admin.user_id, "Tenant deleted");

    Ok(StatusCode::NO_CONTENT)
}
