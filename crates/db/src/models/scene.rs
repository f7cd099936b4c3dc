//! Scene model plus the talent attached to a scene.

use castline_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `scenes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scene {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub scene_number: Option<i32>,
    pub location: Option<String>,
    pub shoot_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateScene {
    pub name: String,
    pub description: Option<String>,
    pub scene_number: Option<i32>,
    pub location: Option<String>,
    pub shoot_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateScene {
    pub name: Option<String>,
    pub description: Option<String>,
    pub scene_number: Option<i32>,
    pub location: Option<String>,
    pub shoot_date: Option<NaiveDate>,
}

/// A row from the `talent_requirements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TalentRequirement {
    pub id: DbId,
    pub scene_id: DbId,
    pub role_name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub gender: Option<String>,
    pub min_height_cm: Option<i32>,
    pub max_height_cm: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTalentRequirement {
    pub role_name: String,
    pub description: Option<String>,
    /// Defaults to 1.
    pub quantity: Option<i32>,
    pub gender: Option<String>,
    pub min_height_cm: Option<i32>,
    pub max_height_cm: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTalentRequirement {
    pub role_name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub gender: Option<String>,
    pub min_height_cm: Option<i32>,
    pub max_height_cm: Option<i32>,
}

/// A platform profile confirmed for a scene.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SceneTalent {
    pub id: DbId,
    pub scene_id: DbId,
    pub profile_id: DbId,
    pub talent_requirement_id: Option<DbId>,
    pub role_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddSceneTalent {
    pub profile_id: DbId,
    pub talent_requirement_id: Option<DbId>,
    pub role_name: Option<String>,
    pub notes: Option<String>,
}

/// A studio-managed external actor confirmed for a scene.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SceneExternalActor {
    pub id: DbId,
    pub scene_id: DbId,
    pub external_actor_id: DbId,
    pub role_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddSceneExternalActor {
    pub external_actor_id: DbId,
    pub role_name: Option<String>,
    pub notes: Option<String>,
}
