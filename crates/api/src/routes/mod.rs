pub mod admin;
pub mod billing;
pub mod casting_call;
pub mod casting_code;
pub mod catalog;
pub mod external_actor;
pub mod health;
pub mod profile;
pub mod project;
pub mod questionnaire;
pub mod scene;
pub mod studio;
pub mod tenant;
pub mod user;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /me                                              current user
/// /admin/stats                                     platform counts (admin)
/// /tenants, /tenants/{id}                          tenant CRUD (admin)
/// /users, /users/{id}                              user CRUD
/// /users/{id}/subscription                         main subscription
/// /users/{id}/region-subscriptions                 region add-ons
///
/// /studios, /studios/{id}                          studio CRUD
/// /studios/{id}/field-values                       studio custom fields
/// /studios/{id}/projects                           list, create
/// /studios/{id}/casting-calls                      list, create
/// /studios/{id}/external-actors                    list, create, import
/// /studios/{id}/questionnaires                     list, create
/// /studios/{id}/casting-codes                      list, create
///
/// /projects/{id}                                   get, update, delete
/// /projects/{id}/scenes                            list, create
/// /scenes/{id}                                     get, update, delete
/// /scenes/{id}/requirements                        list, create
/// /scenes/{id}/talent                              list, add, remove
/// /scenes/{id}/external-actors                     list, add, remove
/// /requirements/{id}                               update, delete
///
/// /casting-calls                                   open calls
/// /casting-calls/{id}                              get, update, delete
/// /casting-calls/{id}/applications                 list, apply
/// /applications/{id}                               status change
///
/// /external-actors/{id}                            get, update, delete
/// /external-actors/{id}/invite|convert             onboarding
///
/// /questionnaires/{id}                             get, update, delete
/// /questionnaires/{id}/invitations                 list, invite
/// /invitations/{id}/response                       get, submit
/// /invitations/{id}/decline                        decline
///
/// /profiles, /profiles/{id}                        search, CRUD
/// /profiles/{id}/skills|regions|field-values       attributes
/// /profiles/{id}/applications|invitations          talent inbox
///
/// /skills, /regions, /locations, /custom-fields    catalogs
/// /regions/{id}/locations|plans                    per-region catalogs
///
/// /subscription-plans, /subscription-features      plan catalog
/// /region-plans/{id}                               update, delete (admin)
/// /region-subscriptions/quote                      price a region set
/// /region-subscriptions/{id}                       delete
/// /multi-region-discounts                          discount tiers
///
/// /casting-codes/{id}                              get, update, delete
/// /casting-codes/{id}/link|submissions             share link, inbox
/// /submissions/{id}                                status change
/// /submissions/{id}/import                         import as external actor
/// /public/casting-codes/{code}                     view, submit (no auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::user::me))
        .nest("/admin", admin::router())
        .nest("/tenants", tenant::router())
        .nest("/users", user::router())
        // Studio workspace.
        .nest("/studios", studio::router())
        .nest("/projects", project::router())
        .nest("/scenes", scene::router())
        .nest("/requirements", scene::requirement_router())
        .nest("/casting-calls", casting_call::router())
        .nest("/applications", casting_call::application_router())
        .nest("/external-actors", external_actor::router())
        .nest("/questionnaires", questionnaire::router())
        .nest("/invitations", questionnaire::invitation_router())
        // Talent side.
        .nest("/profiles", profile::router())
        // Catalogs.
        .nest("/skills", catalog::skill_router())
        .nest("/regions", catalog::region_router())
        .nest("/locations", catalog::location_router())
        .nest("/custom-fields", catalog::custom_field_router())
        // Billing.
        .nest("/subscription-plans", billing::plan_router())
        .nest("/subscription-features", billing::feature_router())
        .nest("/region-plans", billing::region_plan_router())
        .nest("/region-subscriptions", billing::region_subscription_router())
        .nest("/multi-region-discounts", billing::discount_router())
        // Casting codes.
        .nest("/casting-codes", casting_code::router())
        .nest("/submissions", casting_code::submission_router())
        .nest("/public/casting-codes", casting_code::public_router())
}
