//! Platform-wide counters for the admin dashboard.

use castline_core::status::{CastingCallStatus, SubscriptionStatus};
use sqlx::PgPool;

use crate::models::dashboard::PlatformStats;

pub struct DashboardRepo;

impl DashboardRepo {
    pub async fn stats(pool: &PgPool) -> Result<PlatformStats, sqlx::Error> {
        sqlx::query_as::<_, PlatformStats>(
            "SELECT
                (SELECT COUNT(*) FROM tenants) AS tenants,
                (SELECT COUNT(*) FROM users) AS users,
                (SELECT COUNT(*) FROM studios) AS studios,
                (SELECT COUNT(*) FROM profiles) AS profiles,
                (SELECT COUNT(*) FROM projects) AS projects,
                (SELECT COUNT(*) FROM casting_calls WHERE status_id = $1) AS open_casting_calls,
                (SELECT COUNT(*) FROM applications) AS applications,
                (SELECT COUNT(*) FROM external_actors) AS external_actors,
                (SELECT COUNT(*) FROM subscriptions WHERE status_id <> $2) AS live_subscriptions,
                (SELECT COUNT(*) FROM user_region_subscriptions WHERE status_id <> $2)
                    AS region_subscriptions,
                (SELECT COUNT(*) FROM casting_code_submissions) AS casting_code_submissions",
        )
        .bind(CastingCallStatus::Open.id())
        .bind(SubscriptionStatus::Canceled.id())
        .fetch_one(pool)
        .await
    }
}
