//! Repository for the `questionnaire_invitations` table.

use castline_core::status::InvitationStatus;
use castline_core::types::DbId;
use sqlx::PgPool;

use crate::models::invitation::Invitation;

const COLUMNS: &str = "id, questionnaire_id, profile_id, status_id, message, responded_at, \
    created_at, updated_at";

pub struct InvitationRepo;

impl InvitationRepo {
    /// Invite many profiles at once.
    ///
    /// Pairs that already have an invitation are skipped, so the returned
    /// list only holds the new rows.
    pub async fn create_many(
        pool: &PgPool,
        questionnaire_id: DbId,
        profile_ids: &[DbId],
        message: Option<&str>,
    ) -> Result<Vec<Invitation>, sqlx::Error> {
        let query = format!(
            "INSERT INTO questionnaire_invitations (questionnaire_id, profile_id, message)
             SELECT DISTINCT $1::BIGINT, profile_id, $3::TEXT
             FROM UNNEST($2::BIGINT[]) AS t (profile_id)
             ON CONFLICT ON CONSTRAINT uq_questionnaire_invitations_questionnaire_profile
             DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(questionnaire_id)
            .bind(profile_ids)
            .bind(message)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Invitation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM questionnaire_invitations WHERE id = $1");
        sqlx::query_as::<_, Invitation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_questionnaire(
        pool: &PgPool,
        questionnaire_id: DbId,
    ) -> Result<Vec<Invitation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questionnaire_invitations
             WHERE questionnaire_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(questionnaire_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_profile(
        pool: &PgPool,
        profile_id: DbId,
    ) -> Result<Vec<Invitation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questionnaire_invitations
             WHERE profile_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(profile_id)
            .fetch_all(pool)
            .await
    }

    /// Decline a pending invitation. Returns `None` if it is no longer pending.
    pub async fn decline(pool: &PgPool, id: DbId) -> Result<Option<Invitation>, sqlx::Error> {
        let query = format!(
            "UPDATE questionnaire_invitations SET status_id = $2, responded_at = NOW()
             WHERE id = $1 AND status_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invitation>(&query)
            .bind(id)
            .bind(InvitationStatus::Declined.id())
            .bind(InvitationStatus::Pending.id())
            .fetch_optional(pool)
            .await
    }
}
