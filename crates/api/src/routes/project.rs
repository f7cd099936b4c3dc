//! Route definitions for `/projects`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{project, scene};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /{id}                              -> get_project
/// PUT    /{id}                              -> update_project
/// DELETE /{id}                              -> delete_project
/// GET    /{id}/scenes                       -> list_scenes
/// POST   /{id}/scenes                       -> create_scene
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(project::get_project)
                .put(project::update_project)
                .delete(project::delete_project),
        )
        .route(
            "/{id}/scenes",
            get(scene::list_scenes).post(scene::create_scene),
        )
}
