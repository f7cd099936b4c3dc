//! Casting call entity model and DTOs.

use castline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from the `casting_calls` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CastingCall {
    pub id: DbId,
    pub studio_id: DbId,
    pub project_id: Option<DbId>,
    pub region_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub role_name: Option<String>,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub compensation: Option<String>,
    pub status_id: StatusId,
    pub deadline: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCastingCall {
    pub project_id: Option<DbId>,
    pub region_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub role_name: Option<String>,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub compensation: Option<String>,
    /// Defaults to 1 (Draft) if omitted.
    pub status_id: Option<StatusId>,
    pub deadline: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCastingCall {
    pub project_id: Option<DbId>,
    pub region_id: Option<DbId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub role_name: Option<String>,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub compensation: Option<String>,
    pub status_id: Option<StatusId>,
    pub deadline: Option<Timestamp>,
}

/// Filters for the public listing of open casting calls.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenCallParams {
    pub region_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
