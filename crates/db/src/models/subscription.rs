//! Subscription plans, plan features and users' main subscriptions.

use castline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from the `subscription_plans` table. Prices are in minor units.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubscriptionPlan {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    pub billing_interval: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub stripe_price_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubscriptionPlan {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: Option<String>,
    pub billing_interval: Option<String>,
    pub sort_order: Option<i32>,
    pub stripe_price_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubscriptionPlan {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub billing_interval: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
    pub stripe_price_id: Option<String>,
}

/// A row from the `subscription_features` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubscriptionFeature {
    pub id: DbId,
    pub plan_id: DbId,
    pub feature_key: String,
    pub description: Option<String>,
    pub is_enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubscriptionFeature {
    pub feature_key: String,
    pub description: Option<String>,
    pub is_enabled: Option<bool>,
}

/// A row from the `subscriptions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub user_id: DbId,
    pub plan_id: DbId,
    pub status_id: StatusId,
    pub current_period_start: Timestamp,
    pub current_period_end: Option<Timestamp>,
    pub cancel_at_period_end: bool,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `PUT /users/{id}/subscription`.
///
/// Creates the main subscription or switches its plan. `status` is a
/// status name and defaults to `active`.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveSubscription {
    pub plan_id: DbId,
    pub status: Option<String>,
    pub current_period_end: Option<Timestamp>,
    pub cancel_at_period_end: Option<bool>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
}
