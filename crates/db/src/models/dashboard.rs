//! Platform-wide counters for the admin dashboard.

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlatformStats {
    pub tenants: i64,
    pub users: i64,
    pub studios: i64,
    pub profiles: i64,
    pub projects: i64,
    pub open_casting_calls: i64,
    pub applications: i64,
    pub external_actors: i64,
    pub live_subscriptions: i64,
    pub region_subscriptions: i64,
    pub casting_code_submissions: i64,
}
