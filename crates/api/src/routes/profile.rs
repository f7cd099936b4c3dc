//! Route definitions for `/profiles`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{casting_call, field_value, profile, questionnaire};
use crate::state::AppState;

/// Routes mounted at `/profiles`.
///
/// ```text
/// GET    /                                  -> search_profiles
/// POST   /                                  -> create_profile
/// GET    /{id}                              -> get_profile
/// PUT    /{id}                              -> update_profile
/// DELETE /{id}                              -> delete_profile
///
/// PUT    /{id}/skills                       -> set_skills
/// PUT    /{id}/regions                      -> set_regions
/// GET    /{id}/field-values                 -> list_profile_values
/// PUT    /{id}/field-values                 -> set_profile_values
/// GET    /{id}/applications                 -> list_profile_applications
/// GET    /{id}/invitations                  -> list_profile_invitations
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(profile::search_profiles).post(profile::create_profile),
        )
        .route(
            "/{id}",
            get(profile::get_profile)
                .put(profile::update_profile)
                .delete(profile::delete_profile),
        )
        .route("/{id}/skills", put(profile::set_skills))
        .route("/{id}/regions", put(profile::set_regions))
        .route(
            "/{id}/field-values",
            get(field_value::list_profile_values).put(field_value::set_profile_values),
        )
        .route(
            "/{id}/applications",
            get(casting_call::list_profile_applications),
        )
        .route(
            "/{id}/invitations",
            get(questionnaire::list_profile_invitations),
        )
}
