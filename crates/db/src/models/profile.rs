//! Talent profile model and DTOs.

use castline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::region::Region;
use crate::models::skill::Skill;

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub user_id: DbId,
    pub display_name: String,
    pub bio: Option<String>,
    pub height_cm: Option<i32>,
    pub ethnicity: Option<String>,
    pub gender: Option<String>,
    pub availability: String,
    pub location: Option<String>,
    pub headshot_url: Option<String>,
    pub is_public: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a profile. `availability` defaults to `available`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfile {
    pub user_id: DbId,
    pub display_name: String,
    pub bio: Option<String>,
    pub height_cm: Option<i32>,
    pub ethnicity: Option<String>,
    pub gender: Option<String>,
    pub availability: Option<String>,
    pub location: Option<String>,
    pub headshot_url: Option<String>,
    pub is_public: Option<bool>,
}

/// DTO for updating a profile. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub height_cm: Option<i32>,
    pub ethnicity: Option<String>,
    pub gender: Option<String>,
    pub availability: Option<String>,
    pub location: Option<String>,
    pub headshot_url: Option<String>,
    pub is_public: Option<bool>,
}

/// Filters for talent search (`GET /profiles`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileSearchParams {
    pub region_id: Option<DbId>,
    pub skill_id: Option<DbId>,
    pub availability: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A profile with its skills and regions, returned by detail endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileDetail {
    #[serde(flatten)]
    pub profile: Profile,
    pub skills: Vec<Skill>,
    pub regions: Vec<Region>,
}

/// Request body for `PUT /profiles/{id}/skills`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetProfileSkills {
    pub skill_ids: Vec<DbId>,
}

/// Request body for `PUT /profiles/{id}/regions`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetProfileRegions {
    pub region_ids: Vec<DbId>,
}
