//! Route definitions for `/questionnaires` and `/invitations`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::questionnaire;
use crate::state::AppState;

/// Routes mounted at `/questionnaires`.
///
/// ```text
/// GET    /{id}                              -> get_questionnaire
/// PUT    /{id}                              -> update_questionnaire
/// DELETE /{id}                              -> delete_questionnaire
/// GET    /{id}/invitations                  -> list_invitations
/// POST   /{id}/invitations                  -> invite_profiles
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(questionnaire::get_questionnaire)
                .put(questionnaire::update_questionnaire)
                .delete(questionnaire::delete_questionnaire),
        )
        .route(
            "/{id}/invitations",
            get(questionnaire::list_invitations).post(questionnaire::invite_profiles),
        )
}

/// Routes mounted at `/invitations`.
///
/// ```text
/// GET    /{id}/response                     -> get_response
/// POST   /{id}/response                     -> submit_response
/// POST   /{id}/decline                      -> decline_invitation
/// ```
pub fn invitation_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/response",
            get(questionnaire::get_response).post(questionnaire::submit_response),
        )
        .route("/{id}/decline", post(questionnaire::decline_invitation))
}
