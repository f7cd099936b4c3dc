//! Repositories for scenes and the talent attached to them.

use castline_core::types::DbId;
use sqlx::PgPool;

use crate::models::scene::{
    AddSceneExternalActor, AddSceneTalent, CreateScene, CreateTalentRequirement, Scene,
    SceneExternalActor, SceneTalent, TalentRequirement, UpdateScene, UpdateTalentRequirement,
};

const SCENE_COLUMNS: &str = "id, project_id, name, description, scene_number, location, \
    shoot_date, created_at, updated_at";

const REQUIREMENT_COLUMNS: &str = "id, scene_id, role_name, description, quantity, gender, \
    min_height_cm, max_height_cm, created_at, updated_at";

const TALENT_COLUMNS: &str =
    "id, scene_id, profile_id, talent_requirement_id, role_name, notes, created_at, updated_at";

const EXTERNAL_COLUMNS: &str =
    "id, scene_id, external_actor_id, role_name, notes, created_at, updated_at";

/// Provides CRUD operations for scenes.
pub struct SceneRepo;

impl SceneRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateScene,
    ) -> Result<Scene, sqlx::Error> {
        let query = format!(
            "INSERT INTO scenes (project_id, name, description, scene_number, location, shoot_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {SCENE_COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.scene_number)
            .bind(&input.location)
            .bind(input.shoot_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!("SELECT {SCENE_COLUMNS} FROM scenes WHERE id = $1");
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve the studio that owns a scene through its project.
    pub async fn find_studio_id(
        pool: &PgPool,
        scene_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT p.studio_id FROM scenes s JOIN projects p ON p.id = s.project_id
             WHERE s.id = $1",
        )
        .bind(scene_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// List a project's scenes in script order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Scene>, sqlx::Error> {
        let query = format!(
            "SELECT {SCENE_COLUMNS} FROM scenes WHERE project_id = $1
             ORDER BY scene_number NULLS LAST, id"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateScene,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!(
            "UPDATE scenes SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                scene_number = COALESCE($4, scene_number),
                location = COALESCE($5, location),
                shoot_date = COALESCE($6, shoot_date)
             WHERE id = $1
             RETURNING {SCENE_COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.scene_number)
            .bind(&input.location)
            .bind(input.shoot_date)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scenes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Provides CRUD operations for a scene's talent requirements.
pub struct TalentRequirementRepo;

impl TalentRequirementRepo {
    pub async fn create(
        pool: &PgPool,
        scene_id: DbId,
        input: &CreateTalentRequirement,
    ) -> Result<TalentRequirement, sqlx::Error> {
        let query = format!(
            "INSERT INTO talent_requirements
                (scene_id, role_name, description, quantity, gender, min_height_cm, max_height_cm)
             VALUES ($1, $2, $3, COALESCE($4, 1), $5, $6, $7)
             RETURNING {REQUIREMENT_COLUMNS}"
        );
        sqlx::query_as::<_, TalentRequirement>(&query)
            .bind(scene_id)
            .bind(&input.role_name)
            .bind(&input.description)
            .bind(input.quantity)
            .bind(&input.gender)
            .bind(input.min_height_cm)
            .bind(input.max_height_cm)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TalentRequirement>, sqlx::Error> {
        let query = format!("SELECT {REQUIREMENT_COLUMNS} FROM talent_requirements WHERE id = $1");
        sqlx::query_as::<_, TalentRequirement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_scene(
        pool: &PgPool,
        scene_id: DbId,
    ) -> Result<Vec<TalentRequirement>, sqlx::Error> {
        let query = format!(
            "SELECT {REQUIREMENT_COLUMNS} FROM talent_requirements WHERE scene_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, TalentRequirement>(&query)
            .bind(scene_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTalentRequirement,
    ) -> Result<Option<TalentRequirement>, sqlx::Error> {
        let query = format!(
            "UPDATE talent_requirements SET
                role_name = COALESCE($2, role_name),
                description = COALESCE($3, description),
                quantity = COALESCE($4, quantity),
                gender = COALESCE($5, gender),
                min_height_cm = COALESCE($6, min_height_cm),
                max_height_cm = COALESCE($7, max_height_cm)
             WHERE id = $1
             RETURNING {REQUIREMENT_COLUMNS}"
        );
        sqlx::query_as::<_, TalentRequirement>(&query)
            .bind(id)
            .bind(&input.role_name)
            .bind(&input.description)
            .bind(input.quantity)
            .bind(&input.gender)
            .bind(input.min_height_cm)
            .bind(input.max_height_cm)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM talent_requirements WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Platform profiles confirmed for a scene.
pub struct SceneTalentRepo;

impl SceneTalentRepo {
    pub async fn add(
        pool: &PgPool,
        scene_id: DbId,
        input: &AddSceneTalent,
    ) -> Result<SceneTalent, sqlx::Error> {
        let query = format!(
            "INSERT INTO scene_talents
                (scene_id, profile_id, talent_requirement_id, role_name, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {TALENT_COLUMNS}"
        );
        sqlx::query_as::<_, SceneTalent>(&query)
            .bind(scene_id)
            .bind(input.profile_id)
            .bind(input.talent_requirement_id)
            .bind(&input.role_name)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_scene(
        pool: &PgPool,
        scene_id: DbId,
    ) -> Result<Vec<SceneTalent>, sqlx::Error> {
        let query = format!(
            "SELECT {TALENT_COLUMNS} FROM scene_talents WHERE scene_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, SceneTalent>(&query)
            .bind(scene_id)
            .fetch_all(pool)
            .await
    }

    pub async fn remove(
        pool: &PgPool,
        scene_id: DbId,
        profile_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM scene_talents WHERE scene_id = $1 AND profile_id = $2")
                .bind(scene_id)
                .bind(profile_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// External actors confirmed for a scene.
pub struct SceneExternalActorRepo;

impl SceneExternalActorRepo {
    pub async fn add(
        pool: &PgPool,
        scene_id: DbId,
        input: &AddSceneExternalActor,
    ) -> Result<SceneExternalActor, sqlx::Error> {
        let query = format!(
            "INSERT INTO scene_external_actors (scene_id, external_actor_id, role_name, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {EXTERNAL_COLUMNS}"
        );
        sqlx::query_as::<_, SceneExternalActor>(&query)
            .bind(scene_id)
            .bind(input.external_actor_id)
            .bind(&input.role_name)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_scene(
        pool: &PgPool,
        scene_id: DbId,
    ) -> Result<Vec<SceneExternalActor>, sqlx::Error> {
        let query = format!(
            "SELECT {EXTERNAL_COLUMNS} FROM scene_external_actors WHERE scene_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, SceneExternalActor>(&query)
            .bind(scene_id)
            .fetch_all(pool)
            .await
    }

    pub async fn remove(
        pool: &PgPool,
        scene_id: DbId,
        external_actor_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM scene_external_actors WHERE scene_id = $1 AND external_actor_id = $2",
        )
        .bind(scene_id)
        .bind(external_actor_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
