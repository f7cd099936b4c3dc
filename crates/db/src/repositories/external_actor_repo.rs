//! Repository for the `external_actors` table.

use castline_core::external_actor::ParsedActor;
use castline_core::status::{ExternalActorStatus, StatusId};
use castline_core::types::DbId;
use sqlx::PgPool;

use crate::models::external_actor::{
    Conversion, ConvertOutcome, CreateExternalActor, ExternalActor, UpdateExternalActor,
};

const COLUMNS: &str = "id, studio_id, first_name, last_name, email, phone, notes, status_id, \
    invited_at, converted_at, converted_profile_id, converted_to_user_id, created_at, updated_at";

/// Provides CRUD and lifecycle operations for studio-managed actors.
pub struct ExternalActorRepo;

impl ExternalActorRepo {
    pub async fn create(
        pool: &PgPool,
        studio_id: DbId,
        input: &CreateExternalActor,
    ) -> Result<ExternalActor, sqlx::Error> {
        let query = format!(
            "INSERT INTO external_actors (studio_id, first_name, last_name, email, phone, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ExternalActor>(&query)
            .bind(studio_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Insert imported actors in one transaction.
    ///
    /// Rows whose email already exists in the studio are skipped; only the
    /// newly inserted rows are returned.
    pub async fn create_many(
        pool: &PgPool,
        studio_id: DbId,
        actors: &[ParsedActor],
    ) -> Result<Vec<ExternalActor>, sqlx::Error> {
        let query = format!(
            "INSERT INTO external_actors (studio_id, first_name, last_name, email, phone, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (studio_id, email) WHERE email IS NOT NULL DO NOTHING
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(actors.len());
        for actor in actors {
            let row = sqlx::query_as::<_, ExternalActor>(&query)
                .bind(studio_id)
                .bind(&actor.first_name)
                .bind(&actor.last_name)
                .bind(&actor.email)
                .bind(&actor.phone)
                .bind(&actor.notes)
                .fetch_optional(&mut *tx)
                .await?;
            created.extend(row);
        }
        tx.commit().await?;

        Ok(created)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ExternalActor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM external_actors WHERE id = $1");
        sqlx::query_as::<_, ExternalActor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a studio's actors, optionally filtered by status.
    pub async fn list_by_studio(
        pool: &PgPool,
        studio_id: DbId,
        status_id: Option<StatusId>,
    ) -> Result<Vec<ExternalActor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM external_actors
             WHERE studio_id = $1 AND ($2::SMALLINT IS NULL OR status_id = $2)
             ORDER BY last_name NULLS LAST, first_name, id"
        );
        sqlx::query_as::<_, ExternalActor>(&query)
            .bind(studio_id)
            .bind(status_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateExternalActor,
    ) -> Result<Option<ExternalActor>, sqlx::Error> {
        let query = format!(
            "UPDATE external_actors SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                notes = COALESCE($6, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ExternalActor>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM external_actors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark an actor as invited (again). Converted actors are left untouched
    /// and yield `None`.
    pub async fn mark_invited(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ExternalActor>, sqlx::Error> {
        let query = format!(
            "UPDATE external_actors SET status_id = $2, invited_at = NOW()
             WHERE id = $1 AND status_id <> $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ExternalActor>(&query)
            .bind(id)
            .bind(ExternalActorStatus::Invited.id())
            .bind(ExternalActorStatus::Converted.id())
            .fetch_optional(pool)
            .await
    }

    /// Convert an actor into a platform user with a profile.
    ///
    /// Runs in one transaction: lock the actor, create the user for `email`
    /// (or reuse an existing one when `reuse_existing_user` is set), reuse or
    /// create that user's profile, then record the linkage. Nothing is
    /// written unless the outcome is [`ConvertOutcome::Converted`].
    pub async fn convert(
        pool: &PgPool,
        id: DbId,
        email: &str,
        display_name: &str,
        reuse_existing_user: bool,
    ) -> Result<ConvertOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM external_actors WHERE id = $1 AND status_id <> $2 FOR UPDATE",
        )
        .bind(id)
        .bind(ExternalActorStatus::Converted.id())
        .fetch_optional(&mut *tx)
        .await?;
        if locked.is_none() {
            tx.rollback().await?;
            return Ok(ConvertOutcome::NotConvertible);
        }

        let existing_user: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&mut *tx)
                .await?;
        let (user_id, created_user) = match existing_user {
            Some(_) if !reuse_existing_user => {
                tx.rollback().await?;
                return Ok(ConvertOutcome::EmailInUse);
            }
            Some((user_id,)) => (user_id, false),
            None => {
                let (user_id,): (DbId,) = sqlx::query_as(
                    "INSERT INTO users (email, name) VALUES ($1, $2) RETURNING id",
                )
                .bind(email)
                .bind(display_name)
                .fetch_one(&mut *tx)
                .await?;
                (user_id, true)
            }
        };

        let existing_profile: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        let profile_id = match existing_profile {
            Some((profile_id,)) => profile_id,
            None => {
                let (profile_id,): (DbId,) = sqlx::query_as(
                    "INSERT INTO profiles (user_id, display_name) VALUES ($1, $2) RETURNING id",
                )
                .bind(user_id)
                .bind(display_name)
                .fetch_one(&mut *tx)
                .await?;
                profile_id
            }
        };

        let query = format!(
            "UPDATE external_actors SET
                status_id = $2,
                converted_at = NOW(),
                converted_profile_id = $3,
                converted_to_user_id = $4,
                email = COALESCE(email, $5)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let actor = sqlx::query_as::<_, ExternalActor>(&query)
            .bind(id)
            .bind(ExternalActorStatus::Converted.id())
            .bind(profile_id)
            .bind(user_id)
            .bind(email)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(ConvertOutcome::Converted(Conversion {
            actor,
            user_id,
            profile_id,
            created_user,
        }))
    }
}
