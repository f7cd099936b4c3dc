//! Route definitions for `/users`, including each user's subscriptions.

use axum::routing::get;
use axum::Router;

use crate::handlers::{billing, user};
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                                  -> list_users (admin)
/// POST   /                                  -> create_user (admin)
/// GET    /{id}                              -> get_user
/// PUT    /{id}                              -> update_user
/// DELETE /{id}                              -> delete_user (admin)
///
/// GET    /{id}/subscription                 -> get_subscription
/// PUT    /{id}/subscription                 -> save_subscription
/// DELETE /{id}/subscription                 -> cancel_subscription
/// GET    /{id}/region-subscriptions         -> list_region_subscriptions
/// POST   /{id}/region-subscriptions         -> create_region_subscription
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list_users).post(user::create_user))
        .route(
            "/{id}",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        .route(
            "/{id}/subscription",
            get(billing::get_subscription)
                .put(billing::save_subscription)
                .delete(billing::cancel_subscription),
        )
        .route(
            "/{id}/region-subscriptions",
            get(billing::list_region_subscriptions).post(billing::create_region_subscription),
        )
}
