//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000002_create_lookup_tables.sql`.

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

/// All assignable role names.
pub const ALL_ROLES: &[&str] = &[ROLE_USER, ROLE_ADMIN, ROLE_SUPER_ADMIN];

/// Whether the role carries platform administration rights.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_SUPER_ADMIN
}

pub fn is_super_admin(role: &str) -> bool {
    role == ROLE_SUPER_ADMIN
}

/// Whether `role` is a known role name.
pub fn is_valid_role(role: &str) -> bool {
    ALL_ROLES.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_roles() {
        assert!(is_admin(ROLE_ADMIN));
        assert!(is_admin(ROLE_SUPER_ADMIN));
        assert!(!is_admin(ROLE_USER));
        assert!(!is_admin("ADMIN"));
    }

    #[test]
    fn super_admin_only() {
        assert!(is_super_admin(ROLE_SUPER_ADMIN));
        assert!(!is_super_admin(ROLE_ADMIN));
    }

    #[test]
    fn valid_roles() {
        assert!(is_valid_role("user"));
        assert!(!is_valid_role("owner"));
    }
}
