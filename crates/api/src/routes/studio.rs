//! Route definitions for `/studios`.
//!
//! Studio-scoped collections (projects, casting calls, external actors,
//! questionnaires, casting codes) are created and listed here; the
//! individual records live under their own top-level prefixes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{
    casting_call, casting_code, external_actor, field_value, project, questionnaire, studio,
};
use crate::state::AppState;

/// Routes mounted at `/studios`.
///
/// ```text
/// GET    /                                  -> list_studios
/// POST   /                                  -> create_studio
/// GET    /{id}                              -> get_studio
/// PUT    /{id}                              -> update_studio
/// DELETE /{id}                              -> delete_studio
///
/// GET    /{id}/field-values                 -> list_studio_values
/// PUT    /{id}/field-values                 -> set_studio_values
/// GET    /{id}/projects                     -> list_projects
/// POST   /{id}/projects                     -> create_project
/// GET    /{id}/casting-calls                -> list_studio_calls
/// POST   /{id}/casting-calls                -> create_call
/// GET    /{id}/external-actors              -> list_actors
/// POST   /{id}/external-actors              -> create_actor
/// POST   /{id}/external-actors/import       -> import_actors
/// GET    /{id}/questionnaires               -> list_questionnaires
/// POST   /{id}/questionnaires               -> create_questionnaire
/// GET    /{id}/casting-codes                -> list_codes
/// POST   /{id}/casting-codes                -> create_code
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(studio::list_studios).post(studio::create_studio))
        .route(
            "/{id}",
            get(studio::get_studio)
                .put(studio::update_studio)
                .delete(studio::delete_studio),
        )
        .route(
            "/{id}/field-values",
            get(field_value::list_studio_values).put(field_value::set_studio_values),
        )
        .route(
            "/{id}/projects",
            get(project::list_projects).post(project::create_project),
        )
        .route(
            "/{id}/casting-calls",
            get(casting_call::list_studio_calls).post(casting_call::create_call),
        )
        .route(
            "/{id}/external-actors",
            get(external_actor::list_actors).post(external_actor::create_actor),
        )
        .route(
            "/{id}/external-actors/import",
            post(external_actor::import_actors),
        )
        .route(
            "/{id}/questionnaires",
            get(questionnaire::list_questionnaires).post(questionnaire::create_questionnaire),
        )
        .route(
            "/{id}/casting-codes",
            get(casting_code::list_codes).post(casting_code::create_code),
        )
}
