//! Region add-on plans, users' region subscriptions and discount tiers.

use castline_core::region_pricing::DiscountTier;
use castline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from the `region_subscription_plans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RegionPlan {
    pub id: DbId,
    pub region_id: DbId,
    pub name: String,
    pub price_cents: i64,
    pub currency: String,
    pub billing_interval: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRegionPlan {
    pub name: String,
    pub price_cents: i64,
    pub currency: Option<String>,
    pub billing_interval: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRegionPlan {
    pub name: Option<String>,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub billing_interval: Option<String>,
    pub is_active: Option<bool>,
}

/// A row from the `user_region_subscriptions` table.
///
/// `price_cents` is the plan price after the multi-region discount.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RegionSubscription {
    pub id: DbId,
    pub user_id: DbId,
    pub subscription_id: DbId,
    pub region_plan_id: DbId,
    pub region_id: DbId,
    pub status_id: StatusId,
    pub discount_percent: i32,
    pub price_cents: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /users/{id}/region-subscriptions`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRegionSubscription {
    pub region_plan_id: DbId,
}

/// Request body for `POST /region-subscriptions/quote`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    pub region_plan_ids: Vec<DbId>,
}

/// A row from the `multi_region_discounts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MultiRegionDiscount {
    pub id: DbId,
    pub min_regions: i32,
    pub discount_percent: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MultiRegionDiscount {
    pub fn tier(&self) -> DiscountTier {
        DiscountTier {
            min_regions: self.min_regions,
            discount_percent: self.discount_percent,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMultiRegionDiscount {
    pub min_regions: i32,
    pub discount_percent: i32,
    pub is_active: Option<bool>,
}
