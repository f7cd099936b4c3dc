//! Casting code model and DTOs.

use castline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `casting_codes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CastingCode {
    pub id: DbId,
    pub studio_id: DbId,
    pub casting_call_id: Option<DbId>,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub expires_at: Option<Timestamp>,
    pub max_submissions: Option<i32>,
    pub survey: serde_json::Value,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for issuing a code. A random code is generated when `code` is absent.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCastingCode {
    pub casting_call_id: Option<DbId>,
    pub code: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub expires_at: Option<Timestamp>,
    pub max_submissions: Option<i32>,
    pub survey: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCastingCode {
    pub casting_call_id: Option<DbId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub expires_at: Option<Timestamp>,
    pub max_submissions: Option<i32>,
    pub survey: Option<serde_json::Value>,
}

/// Shareable link for a code; clients render `url` as a QR image.
#[derive(Debug, Clone, Serialize)]
pub struct CastingCodeLink {
    pub code: String,
    pub url: String,
}

/// What unauthenticated talent see when they open a code.
#[derive(Debug, Clone, Serialize)]
pub struct PublicCastingCode {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub studio_name: String,
    pub casting_call_title: Option<String>,
    pub expires_at: Option<Timestamp>,
    pub survey: serde_json::Value,
    pub accepting_submissions: bool,
}
