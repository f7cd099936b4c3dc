//! User entity model and DTOs.

use castline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::profile::Profile;
use crate::models::status::StatusId;

/// A user row joined with its role name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub tenant_id: Option<DbId>,
    pub role_id: StatusId,
    pub role: String,
    pub email: String,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a user. `role` defaults to `user`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: Option<String>,
    pub tenant_id: Option<DbId>,
    pub role: Option<String>,
    pub image_url: Option<String>,
}

/// DTO for updating a user. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub tenant_id: Option<DbId>,
    pub role: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// The caller's own account, as returned by `GET /me`.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    #[serde(flatten)]
    pub user: User,
    pub profile: Option<Profile>,
    pub studio_id: Option<DbId>,
}
