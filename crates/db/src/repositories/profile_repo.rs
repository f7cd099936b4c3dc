//! Repository for the `profiles` table and its skill/region links.

use castline_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use castline_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::{CreateProfile, Profile, ProfileSearchParams, UpdateProfile};
use crate::models::region::Region;
use crate::models::skill::Skill;

const COLUMNS: &str = "id, user_id, display_name, bio, height_cm, ethnicity, gender, \
    availability, location, headshot_url, is_public, created_at, updated_at";

/// Provides CRUD and search operations for talent profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn create(pool: &PgPool, input: &CreateProfile) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles
                (user_id, display_name, bio, height_cm, ethnicity, gender,
                 availability, location, headshot_url, is_public)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'available'), $8, $9, COALESCE($10, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(input.user_id)
            .bind(&input.display_name)
            .bind(&input.bio)
            .bind(input.height_cm)
            .bind(&input.ethnicity)
            .bind(&input.gender)
            .bind(&input.availability)
            .bind(&input.location)
            .bind(&input.headshot_url)
            .bind(input.is_public)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Talent search. Private profiles are only included for privileged callers.
    pub async fn search(
        pool: &PgPool,
        params: &ProfileSearchParams,
        include_private: bool,
    ) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profiles
             WHERE (is_public OR $1)
               AND ($2::BIGINT IS NULL OR EXISTS (
                    SELECT 1 FROM profile_regions pr
                    WHERE pr.profile_id = profiles.id AND pr.region_id = $2))
               AND ($3::BIGINT IS NULL OR EXISTS (
                    SELECT 1 FROM profile_skills ps
                    WHERE ps.profile_id = profiles.id AND ps.skill_id = $3))
               AND ($4::TEXT IS NULL OR availability = $4)
             ORDER BY display_name, id
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(include_private)
            .bind(params.region_id)
            .bind(params.skill_id)
            .bind(&params.availability)
            .bind(clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                display_name = COALESCE($2, display_name),
                bio = COALESCE($3, bio),
                height_cm = COALESCE($4, height_cm),
                ethnicity = COALESCE($5, ethnicity),
                gender = COALESCE($6, gender),
                availability = COALESCE($7, availability),
                location = COALESCE($8, location),
                headshot_url = COALESCE($9, headshot_url),
                is_public = COALESCE($10, is_public)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&input.display_name)
            .bind(&input.bio)
            .bind(input.height_cm)
            .bind(&input.ethnicity)
            .bind(&input.gender)
            .bind(&input.availability)
            .bind(&input.location)
            .bind(&input.headshot_url)
            .bind(input.is_public)
            .fetch_optional(pool)
            .await
    }

    /// Delete a profile. Blocked while an external actor conversion points at it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the profile's skills with `skill_ids` in one transaction.
    pub async fn set_skills(
        pool: &PgPool,
        profile_id: DbId,
        skill_ids: &[DbId],
    ) -> Result<Vec<Skill>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM profile_skills WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO profile_skills (profile_id, skill_id)
             SELECT DISTINCT $1::BIGINT, skill_id FROM UNNEST($2::BIGINT[]) AS t (skill_id)",
        )
        .bind(profile_id)
        .bind(skill_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Self::list_skills(pool, profile_id).await
    }

    /// Replace the profile's regions with `region_ids` in one transaction.
    pub async fn set_regions(
        pool: &PgPool,
        profile_id: DbId,
        region_ids: &[DbId],
    ) -> Result<Vec<Region>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM profile_regions WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO profile_regions (profile_id, region_id)
             SELECT DISTINCT $1::BIGINT, region_id FROM UNNEST($2::BIGINT[]) AS t (region_id)",
        )
        .bind(profile_id)
        .bind(region_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Self::list_regions(pool, profile_id).await
    }

    pub async fn list_skills(pool: &PgPool, profile_id: DbId) -> Result<Vec<Skill>, sqlx::Error> {
        sqlx::query_as::<_, Skill>(
            "SELECT s.id, s.name, s.category, s.created_at, s.updated_at
             FROM skills s
             JOIN profile_skills ps ON ps.skill_id = s.id
             WHERE ps.profile_id = $1
             ORDER BY s.name",
        )
        .bind(profile_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_regions(
        pool: &PgPool,
        profile_id: DbId,
    ) -> Result<Vec<Region>, sqlx::Error> {
        sqlx::query_as::<_, Region>(
            "SELECT r.id, r.name, r.code, r.country, r.is_active, r.sort_order,
                    r.created_at, r.updated_at
             FROM regions r
             JOIN profile_regions pr ON pr.region_id = r.id
             WHERE pr.profile_id = $1
             ORDER BY r.sort_order, r.name",
        )
        .bind(profile_id)
        .fetch_all(pool)
        .await
    }
}
