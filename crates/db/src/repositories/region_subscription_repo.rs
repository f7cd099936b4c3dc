//! Repositories for region add-on plans, users' region subscriptions and
//! multi-region discount tiers.

use castline_core::region_pricing::{apply_discount, discount_for_region_count, DiscountTier};
use castline_core::status::SubscriptionStatus;
use castline_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::region_subscription::{
    CreateMultiRegionDiscount, CreateRegionPlan, MultiRegionDiscount, RegionPlan,
    RegionSubscription, UpdateRegionPlan,
};

const PLAN_COLUMNS: &str = "id, region_id, name, price_cents, currency, billing_interval, \
    is_active, created_at, updated_at";

const COLUMNS: &str = "id, user_id, subscription_id, region_plan_id, region_id, status_id, \
    discount_percent, price_cents, created_at, updated_at";

const DISCOUNT_COLUMNS: &str =
    "id, min_regions, discount_percent, is_active, created_at, updated_at";

/// Provides CRUD operations for region add-on plans.
pub struct RegionPlanRepo;

impl RegionPlanRepo {
    pub async fn list_by_region(
        pool: &PgPool,
        region_id: DbId,
    ) -> Result<Vec<RegionPlan>, sqlx::Error> {
        let query = format!(
            "SELECT {PLAN_COLUMNS} FROM region_subscription_plans
             WHERE region_id = $1 ORDER BY price_cents, id"
        );
        sqlx::query_as::<_, RegionPlan>(&query)
            .bind(region_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<RegionPlan>, sqlx::Error> {
        let query = format!("SELECT {PLAN_COLUMNS} FROM region_subscription_plans WHERE id = $1");
        sqlx::query_as::<_, RegionPlan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several plans by id. Unknown ids are silently absent.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<RegionPlan>, sqlx::Error> {
        let query = format!(
            "SELECT {PLAN_COLUMNS} FROM region_subscription_plans
             WHERE id = ANY($1) ORDER BY id"
        );
        sqlx::query_as::<_, RegionPlan>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        region_id: DbId,
        input: &CreateRegionPlan,
    ) -> Result<RegionPlan, sqlx::Error> {
        let query = format!(
            "INSERT INTO region_subscription_plans
                (region_id, name, price_cents, currency, billing_interval)
             VALUES ($1, $2, $3, COALESCE($4, 'usd'), COALESCE($5, 'month'))
             RETURNING {PLAN_COLUMNS}"
        );
        sqlx::query_as::<_, RegionPlan>(&query)
            .bind(region_id)
            .bind(input.name.trim())
            .bind(input.price_cents)
            .bind(&input.currency)
            .bind(&input.billing_interval)
            .fetch_one(pool)
            .await
    }

    /// Update a plan. Existing subscriptions keep their stored price until
    /// the next reprice.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRegionPlan,
    ) -> Result<Option<RegionPlan>, sqlx::Error> {
        let query = format!(
            "UPDATE region_subscription_plans SET
                name = COALESCE($2, name),
                price_cents = COALESCE($3, price_cents),
                currency = COALESCE($4, currency),
                billing_interval = COALESCE($5, billing_interval),
                is_active = COALESCE($6, is_active)
             WHERE id = $1
             RETURNING {PLAN_COLUMNS}"
        );
        sqlx::query_as::<_, RegionPlan>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.price_cents)
            .bind(&input.currency)
            .bind(&input.billing_interval)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a plan. Fails with a foreign key violation while subscribed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM region_subscription_plans WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Provides operations for users' region subscriptions.
pub struct RegionSubscriptionRepo;

impl RegionSubscriptionRepo {
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<RegionSubscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_region_subscriptions
             WHERE user_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, RegionSubscription>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RegionSubscription>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_region_subscriptions WHERE id = $1");
        sqlx::query_as::<_, RegionSubscription>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Subscribe a user to a region plan and reprice all their regions.
    ///
    /// A canceled subscription for the same region is reactivated on the new
    /// plan. Returns `None` when the user already holds a live subscription
    /// for the region.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        subscription_id: DbId,
        plan: &RegionPlan,
    ) -> Result<Option<RegionSubscription>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let inserted: Option<(DbId,)> = sqlx::query_as(
            "INSERT INTO user_region_subscriptions
                (user_id, subscription_id, region_plan_id, region_id, status_id, price_cents)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (user_id, region_id) DO UPDATE SET
                subscription_id = EXCLUDED.subscription_id,
                region_plan_id = EXCLUDED.region_plan_id,
                status_id = EXCLUDED.status_id,
                discount_percent = 0,
                price_cents = EXCLUDED.price_cents
             WHERE user_region_subscriptions.status_id = $7
             RETURNING id",
        )
        .bind(user_id)
        .bind(subscription_id)
        .bind(plan.id)
        .bind(plan.region_id)
        .bind(SubscriptionStatus::Active.id())
        .bind(plan.price_cents)
        .bind(SubscriptionStatus::Canceled.id())
        .fetch_optional(&mut *tx)
        .await?;

        let Some((id,)) = inserted else {
            return Ok(None);
        };

        reprice_in(&mut tx, user_id).await?;

        let query = format!("SELECT {COLUMNS} FROM user_region_subscriptions WHERE id = $1");
        let created = sqlx::query_as::<_, RegionSubscription>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(created))
    }

    /// Remove a region subscription and reprice the user's remaining regions.
    ///
    /// Returns the owning user's id, or `None` if nothing was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted: Option<(DbId,)> =
            sqlx::query_as("DELETE FROM user_region_subscriptions WHERE id = $1 RETURNING user_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((user_id,)) = deleted else {
            return Ok(None);
        };

        reprice_in(&mut tx, user_id).await?;
        tx.commit().await?;
        Ok(Some(user_id))
    }

    /// Recompute the discount and price of every live region subscription
    /// a user holds, returning the refreshed list.
    pub async fn reprice_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<RegionSubscription>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        reprice_in(&mut tx, user_id).await?;
        tx.commit().await?;
        Self::list_by_user(pool, user_id).await
    }
}

async fn reprice_in(conn: &mut PgConnection, user_id: DbId) -> Result<(), sqlx::Error> {
    // Serialise concurrent reprices for the same user.
    sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    let live: Vec<(DbId, i64)> = sqlx::query_as(
        "SELECT s.id, p.price_cents
         FROM user_region_subscriptions s
         JOIN region_subscription_plans p ON p.id = s.region_plan_id
         WHERE s.user_id = $1 AND s.status_id <> $2",
    )
    .bind(user_id)
    .bind(SubscriptionStatus::Canceled.id())
    .fetch_all(&mut *conn)
    .await?;

    let tiers = load_tiers(&mut *conn).await?;
    let region_count = live.len() as i32;
    let discount_percent = discount_for_region_count(&tiers, region_count);

    for (id, list_price) in live {
        sqlx::query(
            "UPDATE user_region_subscriptions SET discount_percent = $2, price_cents = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(discount_percent)
        .bind(apply_discount(list_price, discount_percent))
        .execute(&mut *conn)
        .await?;
    }

    tracing::debug!(user_id, region_count, discount_percent, "Region prices recomputed");
    Ok(())
}

async fn load_tiers(conn: &mut PgConnection) -> Result<Vec<DiscountTier>, sqlx::Error> {
    let query = format!("SELECT {DISCOUNT_COLUMNS} FROM multi_region_discounts");
    let rows = sqlx::query_as::<_, MultiRegionDiscount>(&query)
        .fetch_all(conn)
        .await?;
    Ok(rows.iter().map(MultiRegionDiscount::tier).collect())
}

/// Provides CRUD operations for multi-region discount tiers.
pub struct MultiRegionDiscountRepo;

impl MultiRegionDiscountRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<MultiRegionDiscount>, sqlx::Error> {
        let query = format!(
            "SELECT {DISCOUNT_COLUMNS} FROM multi_region_discounts ORDER BY min_regions"
        );
        sqlx::query_as::<_, MultiRegionDiscount>(&query)
            .fetch_all(pool)
            .await
    }

    /// Tiers in the shape the pricing functions expect.
    pub async fn list_tiers(pool: &PgPool) -> Result<Vec<DiscountTier>, sqlx::Error> {
        Ok(Self::list(pool)
            .await?
            .iter()
            .map(MultiRegionDiscount::tier)
            .collect())
    }

    pub async fn create(
        pool: &PgPool,
        input: &CreateMultiRegionDiscount,
    ) -> Result<MultiRegionDiscount, sqlx::Error> {
        let query = format!(
            "INSERT INTO multi_region_discounts (min_regions, discount_percent, is_active)
             VALUES ($1, $2, COALESCE($3, TRUE))
             RETURNING {DISCOUNT_COLUMNS}"
        );
        sqlx::query_as::<_, MultiRegionDiscount>(&query)
            .bind(input.min_regions)
            .bind(input.discount_percent)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM multi_region_discounts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
