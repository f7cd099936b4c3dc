//! Route definitions for `/external-actors`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::external_actor;
use crate::state::AppState;

/// Routes mounted at `/external-actors`.
///
/// ```text
/// GET    /{id}                              -> get_actor
/// PUT    /{id}                              -> update_actor
/// DELETE /{id}                              -> delete_actor
/// POST   /{id}/invite                       -> invite_actor
/// POST   /{id}/convert                      -> convert_actor
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(external_actor::get_actor)
                .put(external_actor::update_actor)
                .delete(external_actor::delete_actor),
        )
        .route("/{id}/invite", post(external_actor::invite_actor))
        .route("/{id}/convert", post(external_actor::convert_actor))
}
