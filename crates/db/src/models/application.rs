//! Casting call application model and DTOs.

use castline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from the `applications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Application {
    pub id: DbId,
    pub casting_call_id: DbId,
    pub profile_id: DbId,
    pub status_id: StatusId,
    pub cover_note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for applying to a casting call.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApplication {
    pub profile_id: DbId,
    pub cover_note: Option<String>,
}

/// Request body for `PATCH /applications/{id}`. `status` is a status name.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateApplicationStatus {
    pub status: String,
}
