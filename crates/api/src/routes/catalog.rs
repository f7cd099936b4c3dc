//! Route definitions for the platform catalogs.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{billing, catalog};
use crate::state::AppState;

/// Routes mounted at `/skills`.
///
/// ```text
/// GET    /                                  -> list_skills
/// POST   /                                  -> create_skill (admin)
/// ```
pub fn skill_router() -> Router<AppState> {
    Router::new().route("/", get(catalog::list_skills).post(catalog::create_skill))
}

/// Routes mounted at `/regions`.
///
/// ```text
/// GET    /                                  -> list_regions
/// POST   /                                  -> create_region (admin)
/// GET    /{id}                              -> get_region
/// PUT    /{id}                              -> update_region (admin)
/// DELETE /{id}                              -> delete_region (admin)
/// GET    /{id}/locations                    -> list_locations
/// POST   /{id}/locations                    -> create_location (admin)
/// GET    /{id}/plans                        -> list_region_plans
/// POST   /{id}/plans                        -> create_region_plan (admin)
/// ```
pub fn region_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(catalog::list_regions).post(catalog::create_region),
        )
        .route(
            "/{id}",
            get(catalog::get_region)
                .put(catalog::update_region)
                .delete(catalog::delete_region),
        )
        .route(
            "/{id}/locations",
            get(catalog::list_locations).post(catalog::create_location),
        )
        .route(
            "/{id}/plans",
            get(billing::list_region_plans).post(billing::create_region_plan),
        )
}

/// Routes mounted at `/locations` (admin).
///
/// ```text
/// PUT    /{id}                              -> update_location
/// DELETE /{id}                              -> delete_location
/// ```
pub fn location_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(catalog::update_location).delete(catalog::delete_location),
    )
}

/// Routes mounted at `/custom-fields`.
///
/// ```text
/// GET    /                                  -> list_custom_fields
/// POST   /                                  -> create_custom_field (admin)
/// PUT    /{id}                              -> update_custom_field (admin)
/// DELETE /{id}                              -> delete_custom_field (admin)
/// ```
pub fn custom_field_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(catalog::list_custom_fields).post(catalog::create_custom_field),
        )
        .route(
            "/{id}",
            put(catalog::update_custom_field).delete(catalog::delete_custom_field),
        )
}
