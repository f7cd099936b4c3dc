//! Repository for the `skills` table.

use sqlx::PgPool;

use crate::models::skill::{CreateSkill, Skill};

const COLUMNS: &str = "id, name, category, created_at, updated_at";

pub struct SkillRepo;

impl SkillRepo {
    pub async fn create(pool: &PgPool, input: &CreateSkill) -> Result<Skill, sqlx::Error> {
        let query = format!(
            "INSERT INTO skills (name, category) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(&input.name)
            .bind(&input.category)
            .fetch_one(pool)
            .await
    }

    /// List all skills grouped by category.
    pub async fn list(pool: &PgPool) -> Result<Vec<Skill>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM skills ORDER BY category NULLS LAST, name"
        );
        sqlx::query_as::<_, Skill>(&query).fetch_all(pool).await
    }
}
