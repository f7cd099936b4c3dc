//! Route definitions for subscription plans, region plans and discounts.
//!
//! Per-user subscription routes are nested under `/users`.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::billing;
use crate::state::AppState;

/// Routes mounted at `/subscription-plans`.
///
/// ```text
/// GET    /                                  -> list_plans
/// POST   /                                  -> create_plan (admin)
/// GET    /{id}                              -> get_plan
/// PUT    /{id}                              -> update_plan (admin)
/// GET    /{id}/features                     -> list_features
/// POST   /{id}/features                     -> create_feature (admin)
/// ```
pub fn plan_router() -> Router<AppState> {
    Router::new()
        .route("/", get(billing::list_plans).post(billing::create_plan))
        .route("/{id}", get(billing::get_plan).put(billing::update_plan))
        .route(
            "/{id}/features",
            get(billing::list_features).post(billing::create_feature),
        )
}

/// Routes mounted at `/subscription-features` (admin).
///
/// ```text
/// DELETE /{id}                              -> delete_feature
/// ```
pub fn feature_router() -> Router<AppState> {
    Router::new().route("/{id}", delete(billing::delete_feature))
}

/// Routes mounted at `/region-plans` (admin).
///
/// ```text
/// PUT    /{id}                              -> update_region_plan
/// DELETE /{id}                              -> delete_region_plan
/// ```
pub fn region_plan_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(billing::update_region_plan).delete(billing::delete_region_plan),
    )
}

/// Routes mounted at `/region-subscriptions`.
///
/// ```text
/// POST   /quote                             -> quote_regions
/// DELETE /{id}                              -> delete_region_subscription
/// ```
pub fn region_subscription_router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(billing::quote_regions))
        .route("/{id}", delete(billing::delete_region_subscription))
}

/// Routes mounted at `/multi-region-discounts`.
///
/// ```text
/// GET    /                                  -> list_discounts
/// POST   /                                  -> create_discount (admin)
/// DELETE /{id}                              -> delete_discount (admin)
/// ```
pub fn discount_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(billing::list_discounts).post(billing::create_discount),
        )
        .route("/{id}", delete(billing::delete_discount))
}
