//! Handlers for subscription plans, users' main subscriptions and the
//! per-region add-ons priced with multi-region discounts.

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use castline_core::error::CoreError;
use castline_core::region_pricing::{quote, validate_tier, RegionPrice};
use castline_core::types::DbId;
use castline_core::validation::{
    optional_non_empty, require_non_empty, validate_billing_interval, validate_price_cents,
};
use castline_db::models::region_subscription::{
    CreateMultiRegionDiscount, CreateRegionPlan, CreateRegionSubscription, QuoteRequest,
    UpdateRegionPlan,
};
use castline_db::models::status::SubscriptionStatus;
use castline_db::models::subscription::{
    CreateSubscriptionFeature, CreateSubscriptionPlan, SaveSubscription, UpdateSubscriptionPlan,
};
use castline_db::repositories::{
    MultiRegionDiscountRepo, RegionPlanRepo, RegionRepo, RegionSubscriptionRepo,
    SubscriptionFeatureRepo, SubscriptionPlanRepo, SubscriptionRepo,
};

use crate::access::ensure_self_or_admin;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Validate the optional price fields shared by main and region plans.
fn validate_pricing(
    price_cents: Option<i64>,
    currency: Option<&str>,
    billing_interval: Option<&str>,
) -> AppResult<()> {
    if let Some(price) = price_cents {
        validate_price_cents(price, "price_cents")?;
    }
    if let Some(currency) = currency {
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "currency must be a lowercase ISO 4217 code, got '{currency}'"
            ))));
        }
    }
    if let Some(interval) = billing_interval {
        validate_billing_interval(interval)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Subscription plans
// ---------------------------------------------------------------------------

/// GET /api/v1/subscription-plans
pub async fn list_plans(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let plans = SubscriptionPlanRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: plans }))
}

/// POST /api/v1/subscription-plans
pub async fn create_plan(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateSubscriptionPlan>,
) -> AppResult<impl IntoResponse> {
    require_non_empty(&input.name, "name")?;
    validate_pricing(
        Some(input.price_cents),
        input.currency.as_deref(),
        input.billing_interval.as_deref(),
    )?;

    let plan = SubscriptionPlanRepo::create(&state.pool, &input).await?;

    tracing::info!(plan_id = plan.id, user_id = admin.user_id, "Subscription plan created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: plan })))
}

/// GET /api/v1/subscription-plans/{id}
pub async fn get_plan(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let plan = SubscriptionPlanRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("SubscriptionPlan", id)))?;
    Ok(Json(DataResponse { data: plan }))
}

/// PUT /api/v1/subscription-plans/{id}
pub async fn update_plan(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSubscriptionPlan>,
) -> AppResult<impl IntoResponse> {
    optional_non_empty(input.name.as_deref(), "name")?;
    validate_pricing(
        input.price_cents,
        input.currency.as_deref(),
        input.billing_interval.as_deref(),
    )?;

    let plan = SubscriptionPlanRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("SubscriptionPlan", id)))?;

    tracing::info!(plan_id = id, user_id = admin.user_id, "Subscription plan updated");

    Ok(Json(DataResponse { data: plan }))
}

/// GET /api/v1/subscription-plans/{id}/features
pub async fn list_features(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(plan_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let features = SubscriptionFeatureRepo::list_by_plan(&state.pool, plan_id).await?;
    Ok(Json(DataResponse { data: features }))
}

/// POST /api/v1/subscription-plans/{id}/features
pub async fn create_feature(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(plan_id): Path<DbId>,
    Json(input): Json<CreateSubscriptionFeature>,
) -> AppResult<impl IntoResponse> {
    require_non_empty(&input.feature_key, "feature_key")?;

    let feature = SubscriptionFeatureRepo::create(&state.pool, plan_id, &input).await?;

    tracing::info!(
        feature_id = feature.id,
        plan_id,
        user_id = admin.user_id,
        "Subscription feature created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: feature })))
}

/// DELETE /api/v1/subscription-features/{id}
pub async fn delete_feature(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !SubscriptionFeatureRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("SubscriptionFeature", id)));
    }

    tracing::info!(feature_id = id, user_id = admin.user_id, "Subscription feature deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Main subscriptions
// ---------------------------------------------------------------------------

/// GET /api/v1/users/{id}/subscription
pub async fn get_subscription(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_self_or_admin(&auth, user_id)?;

    let subscription = SubscriptionRepo::find_by_user(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} has no subscription")))?;
    Ok(Json(DataResponse { data: subscription }))
}

/// PUT /api/v1/users/{id}/subscription
///
/// Creates the main subscription or switches its plan and status. Only
/// active plans can be subscribed to.
pub async fn save_subscription(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<SaveSubscription>,
) -> AppResult<impl IntoResponse> {
    ensure_self_or_admin(&auth, user_id)?;

    let status = match input.status.as_deref() {
        Some(name) => SubscriptionStatus::from_name(name)?,
        None => SubscriptionStatus::Active,
    };
    SubscriptionPlanRepo::find_by_id(&state.pool, input.plan_id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| {
            CoreError::Validation(format!("Plan {} is not an active plan", input.plan_id))
        })?;

    let subscription = SubscriptionRepo::save(&state.pool, user_id, status, &input).await?;

    tracing::info!(
        subscription_id = subscription.id,
        plan_id = subscription.plan_id,
        status = status.name(),
        user_id = auth.user_id,
        "Subscription saved"
    );

    Ok(Json(DataResponse { data: subscription }))
}

/// DELETE /api/v1/users/{id}/subscription
///
/// Cancels the subscription and every region add-on attached to it.
pub async fn cancel_subscription(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_self_or_admin(&auth, user_id)?;

    let subscription = SubscriptionRepo::cancel(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} has no subscription")))?;

    tracing::info!(
        subscription_id = subscription.id,
        user_id = auth.user_id,
        "Subscription canceled"
    );

    Ok(Json(DataResponse { data: subscription }))
}

// ---------------------------------------------------------------------------
// Region plans
// ---------------------------------------------------------------------------

/// GET /api/v1/regions/{id}/plans
pub async fn list_region_plans(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(region_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let plans = RegionPlanRepo::list_by_region(&state.pool, region_id).await?;
    Ok(Json(DataResponse { data: plans }))
}

/// POST /api/v1/regions/{id}/plans
pub async fn create_region_plan(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(region_id): Path<DbId>,
    Json(input): Json<CreateRegionPlan>,
) -> AppResult<impl IntoResponse> {
    require_non_empty(&input.name, "name")?;
    validate_pricing(
        Some(input.price_cents),
        input.currency.as_deref(),
        input.billing_interval.as_deref(),
    )?;
    RegionRepo::find_by_id(&state.pool, region_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Region", region_id)))?;

    let plan = RegionPlanRepo::create(&state.pool, region_id, &input).await?;

    tracing::info!(
        region_plan_id = plan.id,
        region_id,
        user_id = admin.user_id,
        "Region plan created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: plan })))
}

/// PUT /api/v1/region-plans/{id}
///
/// Price changes apply to new subscriptions and the next reprice.
pub async fn update_region_plan(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRegionPlan>,
) -> AppResult<impl IntoResponse> {
    optional_non_empty(input.name.as_deref(), "name")?;
    validate_pricing(
        input.price_cents,
        input.currency.as_deref(),
        input.billing_interval.as_deref(),
    )?;

    let plan = RegionPlanRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("RegionPlan", id)))?;

    tracing::info!(region_plan_id = id, user_id = admin.user_id, "Region plan updated");

    Ok(Json(DataResponse { data: plan }))
}

/// DELETE /api/v1/region-plans/{id}
///
/// Refused while subscriptions still reference the plan.
pub async fn delete_region_plan(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !RegionPlanRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("RegionPlan", id)));
    }

    tracing::info!(region_plan_id = id, user_id = admin.user_id, "Region plan deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Region subscriptions
// ---------------------------------------------------------------------------

/// GET /api/v1/users/{id}/region-subscriptions
pub async fn list_region_subscriptions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_self_or_admin(&auth, user_id)?;

    let subscriptions = RegionSubscriptionRepo::list_by_user(&state.pool, user_id).await?;
    Ok(Json(DataResponse {
        data: subscriptions,
    }))
}

/// POST /api/v1/users/{id}/region-subscriptions
///
/// Requires a live main subscription and an active region plan. All of
/// the user's live regions are repriced with the new region count.
pub async fn create_region_subscription(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<CreateRegionSubscription>,
) -> AppResult<impl IntoResponse> {
    ensure_self_or_admin(&auth, user_id)?;

    let main = SubscriptionRepo::find_by_user(&state.pool, user_id)
        .await?
        .filter(|s| SubscriptionStatus::from_id(s.status_id).is_ok_and(|st| st.is_live()))
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "A live main subscription is required before adding regions".into(),
            ))
        })?;

    let plan = RegionPlanRepo::find_by_id(&state.pool, input.region_plan_id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Region plan {} is not an active plan",
                input.region_plan_id
            ))
        })?;

    let subscription = RegionSubscriptionRepo::create(&state.pool, user_id, main.id, &plan)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Already subscribed to region {}",
                plan.region_id
            )))
        })?;

    tracing::info!(
        region_subscription_id = subscription.id,
        region_id = subscription.region_id,
        discount_percent = subscription.discount_percent,
        user_id = auth.user_id,
        "Region subscription created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: subscription })))
}

/// DELETE /api/v1/region-subscriptions/{id}
pub async fn delete_region_subscription(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let existing = RegionSubscriptionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("RegionSubscription", id)))?;
    ensure_self_or_admin(&auth, existing.user_id)?;

    RegionSubscriptionRepo::delete(&state.pool, id).await?;

    tracing::info!(
        region_subscription_id = id,
        owner_id = existing.user_id,
        user_id = auth.user_id,
        "Region subscription deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/region-subscriptions/quote
///
/// Prices a prospective set of region plans without storing anything.
pub async fn quote_regions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<QuoteRequest>,
) -> AppResult<impl IntoResponse> {
    if input.region_plan_ids.is_empty() {
        return Err(AppError::BadRequest(
            "region_plan_ids must not be empty".into(),
        ));
    }
    let requested: HashSet<DbId> = input.region_plan_ids.iter().copied().collect();
    if requested.len() != input.region_plan_ids.len() {
        return Err(AppError::BadRequest(
            "region_plan_ids must not repeat a plan".into(),
        ));
    }

    let ids: Vec<DbId> = requested.into_iter().collect();
    let plans = RegionPlanRepo::find_many(&state.pool, &ids).await?;
    if let Some(missing) = ids
        .iter()
        .find(|id| !plans.iter().any(|p| p.id == **id && p.is_active))
    {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Region plan {missing} is not an active plan"
        ))));
    }
    let regions: HashSet<DbId> = plans.iter().map(|p| p.region_id).collect();
    if regions.len() != plans.len() {
        return Err(AppError::Core(CoreError::Validation(
            "Only one plan per region can be quoted".into(),
        )));
    }

    let prices: Vec<RegionPrice> = plans
        .iter()
        .map(|p| RegionPrice {
            region_plan_id: p.id,
            price_cents: p.price_cents,
        })
        .collect();
    let tiers = MultiRegionDiscountRepo::list_tiers(&state.pool).await?;

    Ok(Json(DataResponse {
        data: quote(&prices, &tiers),
    }))
}

// ---------------------------------------------------------------------------
// Multi-region discounts
// ---------------------------------------------------------------------------

/// GET /api/v1/multi-region-discounts
pub async fn list_discounts(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let discounts = MultiRegionDiscountRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: discounts }))
}

/// POST /api/v1/multi-region-discounts
pub async fn create_discount(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateMultiRegionDiscount>,
) -> AppResult<impl IntoResponse> {
    validate_tier(input.min_regions, input.discount_percent)?;

    let discount = MultiRegionDiscountRepo::create(&state.pool, &input).await?;

    tracing::info!(
        discount_id = discount.id,
        min_regions = discount.min_regions,
        discount_percent = discount.discount_percent,
        user_id = admin.user_id,
        "Multi-region discount created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: discount })))
}

/// DELETE /api/v1/multi-region-discounts/{id}
pub async fn delete_discount(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !MultiRegionDiscountRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("MultiRegionDiscount", id)));
    }

    tracing::info!(discount_id = id, user_id = admin.user_id, "Multi-region discount deleted");

    Ok(StatusCode::NO_CONTENT)
}
