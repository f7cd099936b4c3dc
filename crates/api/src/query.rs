//! Shared query parameter types for API handlers.

use castline_core::types::DbId;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the repository layer via `clamp_limit` /
/// `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for list endpoints that support an `include_inactive` flag.
///
/// Used by regions and subscription plans.
#[derive(Debug, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// `?status=` filter for external actor listings.
#[derive(Debug, Deserialize)]
pub struct ActorListParams {
    pub status: Option<String>,
}

/// `?tenant_id=&limit=&offset=` for the admin user listing.
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    pub tenant_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
