//! Route definitions for `/scenes` and `/requirements`.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::scene;
use crate::state::AppState;

/// Routes mounted at `/scenes`.
///
/// ```text
/// GET    /{id}                              -> get_scene
/// PUT    /{id}                              -> update_scene
/// DELETE /{id}                              -> delete_scene
///
/// GET    /{id}/requirements                 -> list_requirements
/// POST   /{id}/requirements                 -> create_requirement
/// GET    /{id}/talent                       -> list_talent
/// POST   /{id}/talent                       -> add_talent
/// DELETE /{id}/talent/{profile_id}          -> remove_talent
/// GET    /{id}/external-actors              -> list_scene_actors
/// POST   /{id}/external-actors              -> add_scene_actor
/// DELETE /{id}/external-actors/{actor_id}   -> remove_scene_actor
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(scene::get_scene)
                .put(scene::update_scene)
                .delete(scene::delete_scene),
        )
        .route(
            "/{id}/requirements",
            get(scene::list_requirements).post(scene::create_requirement),
        )
        .route(
            "/{id}/talent",
            get(scene::list_talent).post(scene::add_talent),
        )
        .route("/{id}/talent/{profile_id}", delete(scene::remove_talent))
        .route(
            "/{id}/external-actors",
            get(scene::list_scene_actors).post(scene::add_scene_actor),
        )
        .route(
            "/{id}/external-actors/{actor_id}",
            delete(scene::remove_scene_actor),
        )
}

/// Routes mounted at `/requirements`.
///
/// ```text
/// PUT    /{id}                              -> update_requirement
/// DELETE /{id}                              -> delete_requirement
/// ```
pub fn requirement_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(scene::update_requirement).delete(scene::delete_requirement),
    )
}
