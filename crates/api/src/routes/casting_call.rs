//! Route definitions for `/casting-calls` and `/applications`.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::casting_call;
use crate::state::AppState;

/// Routes mounted at `/casting-calls`.
///
/// ```text
/// GET    /                                  -> list_open_calls
/// GET    /{id}                              -> get_call
/// PUT    /{id}                              -> update_call
/// DELETE /{id}                              -> delete_call
/// GET    /{id}/applications                 -> list_applications
/// POST   /{id}/applications                 -> apply
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(casting_call::list_open_calls))
        .route(
            "/{id}",
            get(casting_call::get_call)
                .put(casting_call::update_call)
                .delete(casting_call::delete_call),
        )
        .route(
            "/{id}/applications",
            get(casting_call::list_applications).post(casting_call::apply),
        )
}

/// Routes mounted at `/applications`.
///
/// ```text
/// PATCH  /{id}                              -> update_application
/// ```
pub fn application_router() -> Router<AppState> {
    Router::new().route("/{id}", patch(casting_call::update_application))
}
