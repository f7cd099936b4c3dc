//! Route definitions for `/tenants` (admin only).

use axum::routing::get;
use axum::Router;

use crate::handlers::tenant;
use crate::state::AppState;

/// Routes mounted at `/tenants`.
///
/// ```text
/// GET    /                                  -> list_tenants
/// POST   /                                  -> create_tenant
/// GET    /{id}                              -> get_tenant
/// PUT    /{id}                              -> update_tenant
/// DELETE /{id}                              -> delete_tenant
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tenant::list_tenants).post(tenant::create_tenant))
        .route(
            "/{id}",
            get(tenant::get_tenant)
                .put(tenant::update_tenant)
                .delete(tenant::delete_tenant),
        )
}
