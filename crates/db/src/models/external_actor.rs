//! External actor model and DTOs.

use castline_core::external_actor::RowError;
use castline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from the `external_actors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExternalActor {
    pub id: DbId,
    pub studio_id: DbId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub status_id: StatusId,
    pub invited_at: Option<Timestamp>,
    pub converted_at: Option<Timestamp>,
    pub converted_profile_id: Option<DbId>,
    pub converted_to_user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding an actor to a studio's roster.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExternalActor {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// DTO for editing an actor's contact details. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExternalActor {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Request body for `POST /studios/{id}/external-actors/import`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportExternalActors {
    pub csv: String,
}

/// Outcome of a CSV import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub created: Vec<ExternalActor>,
    /// Valid rows whose email already exists in the studio.
    pub skipped_existing: usize,
    pub errors: Vec<RowError>,
}

/// Request body for `POST /external-actors/{id}/convert`.
///
/// `email` is required when the actor has none on file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConvertExternalActor {
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Result of converting an external actor into a platform account.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub actor: ExternalActor,
    pub user_id: DbId,
    pub profile_id: DbId,
    /// `false` when the actor's email already belonged to a user.
    pub created_user: bool,
}

/// What [`crate::repositories::ExternalActorRepo::convert`] did.
#[derive(Debug, Clone)]
pub enum ConvertOutcome {
    Converted(Conversion),
    /// The actor is missing or was converted earlier.
    NotConvertible,
    /// The email belongs to an existing account and reuse was not allowed.
    EmailInUse,
}
