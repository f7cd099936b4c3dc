//! Repositories for subscription plans, plan features and main subscriptions.

use castline_core::status::{StatusId, SubscriptionStatus};
use castline_core::types::DbId;
use sqlx::PgPool;

use crate::models::subscription::{
    CreateSubscriptionFeature, CreateSubscriptionPlan, SaveSubscription, Subscription,
    SubscriptionFeature, SubscriptionPlan, UpdateSubscriptionPlan,
};

const PLAN_COLUMNS: &str = "id, name, description, price_cents, currency, billing_interval, \
    is_active, sort_order, stripe_price_id, created_at, updated_at";

const FEATURE_COLUMNS: &str =
    "id, plan_id, feature_key, description, is_enabled, created_at, updated_at";

const COLUMNS: &str = "id, user_id, plan_id, status_id, current_period_start, \
    current_period_end, cancel_at_period_end, stripe_customer_id, stripe_subscription_id, \
    created_at, updated_at";

/// Provides CRUD operations for subscription plans.
pub struct SubscriptionPlanRepo;

impl SubscriptionPlanRepo {
    pub async fn list(
        pool: &PgPool,
        include_inactive: bool,
    ) -> Result<Vec<SubscriptionPlan>, sqlx::Error> {
        let query = format!(
            "SELECT {PLAN_COLUMNS} FROM subscription_plans
             WHERE $1 OR is_active
             ORDER BY sort_order, price_cents, id"
        );
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SubscriptionPlan>, sqlx::Error> {
        let query = format!("SELECT {PLAN_COLUMNS} FROM subscription_plans WHERE id = $1");
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        input: &CreateSubscriptionPlan,
    ) -> Result<SubscriptionPlan, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscription_plans
                (name, description, price_cents, currency, billing_interval, sort_order,
                 stripe_price_id)
             VALUES ($1, $2, $3, COALESCE($4, 'usd'), COALESCE($5, 'month'), COALESCE($6, 0), $7)
             RETURNING {PLAN_COLUMNS}"
        );
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(&input.currency)
            .bind(&input.billing_interval)
            .bind(input.sort_order)
            .bind(&input.stripe_price_id)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSubscriptionPlan,
    ) -> Result<Option<SubscriptionPlan>, sqlx::Error> {
        let query = format!(
            "UPDATE subscription_plans SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price_cents = COALESCE($4, price_cents),
                currency = COALESCE($5, currency),
                billing_interval = COALESCE($6, billing_interval),
                is_active = COALESCE($7, is_active),
                sort_order = COALESCE($8, sort_order),
                stripe_price_id = COALESCE($9, stripe_price_id)
             WHERE id = $1
             RETURNING {PLAN_COLUMNS}"
        );
        sqlx::query_as::<_, SubscriptionPlan>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(&input.currency)
            .bind(&input.billing_interval)
            .bind(input.is_active)
            .bind(input.sort_order)
            .bind(&input.stripe_price_id)
            .fetch_optional(pool)
            .await
    }
}

/// Provides operations for the features attached to a plan.
pub struct SubscriptionFeatureRepo;

impl SubscriptionFeatureRepo {
    pub async fn list_by_plan(
        pool: &PgPool,
        plan_id: DbId,
    ) -> Result<Vec<SubscriptionFeature>, sqlx::Error> {
        let query = format!(
            "SELECT {FEATURE_COLUMNS} FROM subscription_features
             WHERE plan_id = $1 ORDER BY feature_key"
        );
        sqlx::query_as::<_, SubscriptionFeature>(&query)
            .bind(plan_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        plan_id: DbId,
        input: &CreateSubscriptionFeature,
    ) -> Result<SubscriptionFeature, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscription_features (plan_id, feature_key, description, is_enabled)
             VALUES ($1, $2, $3, COALESCE($4, TRUE))
             RETURNING {FEATURE_COLUMNS}"
        );
        sqlx::query_as::<_, SubscriptionFeature>(&query)
            .bind(plan_id)
            .bind(input.feature_key.trim())
            .bind(&input.description)
            .bind(input.is_enabled)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subscription_features WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Provides operations for users' main subscriptions.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscriptions WHERE user_id = $1");
        sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create the user's subscription or update it in place.
    ///
    /// Moving to a status that does not grant access also cancels every
    /// region add-on hanging off the subscription.
    pub async fn save(
        pool: &PgPool,
        user_id: DbId,
        status: SubscriptionStatus,
        input: &SaveSubscription,
    ) -> Result<Subscription, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO subscriptions
                (user_id, plan_id, status_id, current_period_end, cancel_at_period_end,
                 stripe_customer_id, stripe_subscription_id)
             VALUES ($1, $2, $3, $4, COALESCE($5, FALSE), $6, $7)
             ON CONFLICT (user_id) DO UPDATE SET
                plan_id = EXCLUDED.plan_id,
                status_id = EXCLUDED.status_id,
                current_period_end = COALESCE($4, subscriptions.current_period_end),
                cancel_at_period_end = COALESCE($5, subscriptions.cancel_at_period_end),
                stripe_customer_id = COALESCE($6, subscriptions.stripe_customer_id),
                stripe_subscription_id = COALESCE($7, subscriptions.stripe_subscription_id)
             RETURNING {COLUMNS}"
        );
        let subscription = sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .bind(input.plan_id)
            .bind(status.id())
            .bind(input.current_period_end)
            .bind(input.cancel_at_period_end)
            .bind(&input.stripe_customer_id)
            .bind(&input.stripe_subscription_id)
            .fetch_one(&mut *tx)
            .await?;

        if !status.is_live() {
            set_region_status(&mut tx, subscription.id, status.id()).await?;
        }

        tx.commit().await?;
        Ok(subscription)
    }

    /// Cancel the user's subscription together with its region add-ons.
    pub async fn cancel(pool: &PgPool, user_id: DbId) -> Result<Option<Subscription>, sqlx::Error> {
        let canceled = SubscriptionStatus::Canceled.id();
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE subscriptions SET status_id = $2, cancel_at_period_end = FALSE
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        let subscription = sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .bind(canceled)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(subscription) = &subscription {
            set_region_status(&mut tx, subscription.id, canceled).await?;
        }

        tx.commit().await?;
        Ok(subscription)
    }
}

async fn set_region_status(
    conn: &mut sqlx::PgConnection,
    subscription_id: DbId,
    status_id: StatusId,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE user_region_subscriptions SET status_id = $2
         WHERE subscription_id = $1 AND status_id <> $2",
    )
    .bind(subscription_id)
    .bind(status_id)
    .execute(conn)
    .await?;
    Ok(())
}
