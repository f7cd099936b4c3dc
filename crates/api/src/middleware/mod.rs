//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller from a Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires `admin` or `super_admin`.

pub mod auth;
pub mod rbac;
