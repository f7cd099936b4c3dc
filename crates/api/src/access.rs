//! Ownership and membership checks shared by handlers.
//!
//! Admins pass every check. A studio member is a user whose `tenant_id`
//! matches the studio's tenant; a profile owner is the user the profile
//! belongs to.

use castline_core::error::CoreError;
use castline_core::types::DbId;
use castline_db::models::profile::Profile;
use castline_db::models::studio::Studio;
use castline_db::repositories::{ProfileRepo, StudioRepo, UserRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// Load a studio and require the caller to be an admin or one of its members.
pub async fn studio_for_member(
    pool: &PgPool,
    auth: &AuthUser,
    studio_id: DbId,
) -> AppResult<Studio> {
    let studio = StudioRepo::find_by_id(pool, studio_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Studio", studio_id)))?;
    ensure_studio_member(pool, auth, &studio).await?;
    Ok(studio)
}

/// Require the caller to be an admin or a member of `studio`'s tenant.
pub async fn ensure_studio_member(
    pool: &PgPool,
    auth: &AuthUser,
    studio: &Studio,
) -> AppResult<()> {
    if auth.is_admin() {
        return Ok(());
    }
    let tenant_id = UserRepo::find_by_id(pool, auth.user_id)
        .await?
        .filter(|u| u.is_active)
        .and_then(|u| u.tenant_id);
    if tenant_id == Some(studio.tenant_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Not a member of this studio".into(),
        )))
    }
}

/// Shorthand for handlers that only know the owning studio id.
pub async fn ensure_member_of(pool: &PgPool, auth: &AuthUser, studio_id: DbId) -> AppResult<()> {
    studio_for_member(pool, auth, studio_id).await.map(|_| ())
}

/// Load a profile and require the caller to own it (or be an admin).
pub async fn profile_for_owner(
    pool: &PgPool,
    auth: &AuthUser,
    profile_id: DbId,
) -> AppResult<Profile> {
    let profile = ProfileRepo::find_by_id(pool, profile_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("Profile", profile_id)))?;
    if auth.is_admin() || profile.user_id == auth.user_id {
        Ok(profile)
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Only the profile owner can do this".into(),
        )))
    }
}

/// Require the caller to be `user_id` or an admin.
pub fn ensure_self_or_admin(auth: &AuthUser, user_id: DbId) -> AppResult<()> {
    if auth.is_admin() || auth.user_id == user_id {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Cannot act on another user's account".into(),
        )))
    }
}

/// Whether the caller may see a profile that is not public.
pub fn can_view_profile(auth: &AuthUser, profile: &Profile) -> bool {
    profile.is_public || auth.is_admin() || profile.user_id == auth.user_id
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn profile(user_id: DbId, is_public: bool) -> Profile {
        Profile {
            id: 1,
            user_id,
            display_name: "Ada".into(),
            bio: None,
            height_cm: None,
            ethnicity: None,
            gender: None,
            availability: "available".into(),
            location: None,
            headshot_url: None,
            is_public,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn caller(user_id: DbId, role: &str) -> AuthUser {
        AuthUser {
            user_id,
            role: role.into(),
        }
    }

    #[test]
    fn self_or_admin() {
        assert!(ensure_self_or_admin(&caller(5, "user"), 5).is_ok());
        assert!(ensure_self_or_admin(&caller(5, "admin"), 9).is_ok());
        assert!(ensure_self_or_admin(&caller(5, "super_admin"), 9).is_ok());
        assert!(ensure_self_or_admin(&caller(5, "user"), 9).is_err());
    }

    #[test]
    fn private_profiles_are_hidden_from_strangers() {
        let private = profile(7, false);
        assert!(can_view_profile(&caller(7, "user"), &private));
        assert!(can_view_profile(&caller(1, "admin"), &private));
        assert!(!can_view_profile(&caller(8, "user"), &private));
        assert!(can_view_profile(&caller(8, "user"), &profile(7, true)));
    }
}
