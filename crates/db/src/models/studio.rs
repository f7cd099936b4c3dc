//! Studio entity model and DTOs.

use castline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `studios` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Studio {
    pub id: DbId,
    pub tenant_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub logo_url: Option<String>,
    pub location: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a studio. Each tenant owns at most one.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudio {
    pub tenant_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub logo_url: Option<String>,
    pub location: Option<String>,
}

/// DTO for updating a studio. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStudio {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub logo_url: Option<String>,
    pub location: Option<String>,
}
