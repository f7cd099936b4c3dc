//! Route definitions for casting codes, their submissions and the public
//! submission endpoints.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::casting_code;
use crate::state::AppState;

/// Routes mounted at `/casting-codes`.
///
/// ```text
/// GET    /{id}                              -> get_code
/// PUT    /{id}                              -> update_code
/// DELETE /{id}                              -> delete_code
/// GET    /{id}/link                         -> get_link
/// GET    /{id}/submissions                  -> list_submissions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(casting_code::get_code)
                .put(casting_code::update_code)
                .delete(casting_code::delete_code),
        )
        .route("/{id}/link", get(casting_code::get_link))
        .route("/{id}/submissions", get(casting_code::list_submissions))
}

/// Routes mounted at `/submissions`.
///
/// ```text
/// PATCH  /{id}                              -> update_submission
/// POST   /{id}/import                       -> import_submission
/// ```
pub fn submission_router() -> Router<AppState> {
    Router::new()
        .route("/{id}", patch(casting_code::update_submission))
        .route("/{id}/import", post(casting_code::import_submission))
}

/// Routes mounted at `/public/casting-codes`. No token required.
///
/// ```text
/// GET    /{code}                            -> public_code
/// POST   /{code}/submissions                -> public_submit
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/{code}", get(casting_code::public_code))
        .route("/{code}/submissions", post(casting_code::public_submit))
}
