//! Questionnaire invitation model and DTOs.

use castline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from the `questionnaire_invitations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invitation {
    pub id: DbId,
    pub questionnaire_id: DbId,
    pub profile_id: DbId,
    pub status_id: StatusId,
    pub message: Option<String>,
    pub responded_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /questionnaires/{id}/invitations`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvitations {
    pub profile_ids: Vec<DbId>,
    pub message: Option<String>,
}

/// Outcome of a bulk invite: rows created and profiles already invited.
#[derive(Debug, Clone, Serialize)]
pub struct InvitationBatch {
    pub created: Vec<Invitation>,
    pub already_invited: Vec<DbId>,
}
