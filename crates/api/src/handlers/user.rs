//! Handlers for users and the current-user endpoint.
//!
//! Admins manage every account. Other callers may read and edit their own
//! account but cannot change their role, tenant or active flag.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use castline_core::error::CoreError;
use castline_core::roles::is_valid_role;
use castline_core::types::DbId;
use castline_core::validation::{normalize_email, validate_email};
use castline_db::models::user::{CreateUser, CurrentUser, UpdateUser};
use castline_db::repositories::{ProfileRepo, StudioRepo, UserRepo};

use crate::access::ensure_self_or_admin;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::UserListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/me
///
/// The caller's account, their profile (if any) and the studio of their
/// tenant (if any).
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("User", auth.user_id)))?;

    let profile = ProfileRepo::find_by_user(&state.pool, user.id).await?;
    let studio_id = match user.tenant_id {
        Some(tenant_id) => StudioRepo::find_by_tenant(&state.pool, tenant_id)
            .await?
            .map(|s| s.id),
        None => None,
    };

    Ok(Json(DataResponse {
        data: CurrentUser {
            user,
            profile,
            studio_id,
        },
    }))
}

/// GET /api/v1/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> AppResult<impl IntoResponse> {
    let users =
        UserRepo::list(&state.pool, params.tenant_id, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: users }))
}

/// POST /api/v1/users
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<impl IntoResponse> {
    validate_email(&input.email, "email")?;
    if let Some(role) = input.role.as_deref() {
        validate_role(role)?;
    }
    let input = CreateUser {
        email: normalize_email(&input.email),
        ..input
    };

    let user = UserRepo::create(&state.pool, &input).await?;

    tracing::info!(user_id = user.id, admin_id = admin.user_id, "User created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_self_or_admin(&auth, id)?;

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("User", id)))?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/users/{id}
pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    ensure_self_or_admin(&auth, id)?;
    if !auth.is_admin()
        && (input.role.is_some() || input.is_active.is_some() || input.tenant_id.is_some())
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only admins can change role, tenant or active state".into(),
        )));
    }
    if let Some(email) = input.email.as_deref() {
        validate_email(email, "email")?;
    }
    if let Some(role) = input.role.as_deref() {
        validate_role(role)?;
    }
    let input = UpdateUser {
        email: input.email.as_deref().map(normalize_email),
        ..input
    };

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("User", id)))?;

    tracing::info!(target_user_id = id, user_id = auth.user_id, "User updated");

    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("User", id)));
    }

    tracing::info!(target_user_id = id, user_id = admin.user_id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

fn validate_role(role: &str) -> Result<(), CoreError> {
    if is_valid_role(role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("unknown role '{role}'")))
    }
}
