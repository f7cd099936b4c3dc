//! Repository for the `applications` table.

use castline_core::status::StatusId;
use castline_core::types::DbId;
use sqlx::PgPool;

use crate::models::application::Application;

const COLUMNS: &str =
    "id, casting_call_id, profile_id, status_id, cover_note, created_at, updated_at";

pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Record an application. A second application by the same profile
    /// violates `uq_applications_call_profile`.
    pub async fn create(
        pool: &PgPool,
        casting_call_id: DbId,
        profile_id: DbId,
        cover_note: Option<&str>,
    ) -> Result<Application, sqlx::Error> {
        let query = format!(
            "INSERT INTO applications (casting_call_id, profile_id, cover_note)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(casting_call_id)
            .bind(profile_id)
            .bind(cover_note)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_call(
        pool: &PgPool,
        casting_call_id: DbId,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications WHERE casting_call_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(casting_call_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_profile(
        pool: &PgPool,
        profile_id: DbId,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications WHERE profile_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(profile_id)
            .fetch_all(pool)
            .await
    }

    /// Move an application to `next`, but only if it is still in `expected`.
    ///
    /// Returns `None` when a concurrent change got there first.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        expected: StatusId,
        next: StatusId,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET status_id = $3
             WHERE id = $1 AND status_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(expected)
            .bind(next)
            .fetch_optional(pool)
            .await
    }
}
